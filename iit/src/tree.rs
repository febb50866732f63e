//! Shared tree core: sort, bottom-up augmentation, top-down scan
//! 共享树核心：排序、自底向上增强、自顶向下扫描

use std::marker::PhantomData;

use crate::{Geom, NRANK, Node, Pos, Rank, Span, max_pos};

/// Sorted node store plus the implied tree geometry
/// 有序节点存储及其隐含的树几何
///
/// Shared by the index variants via the node type parameter. Immutable
/// once constructed.
/// 通过节点类型参数在各索引变体间共享。构建后不可变。
#[derive(Clone, Debug)]
pub struct Tree<P: Pos, T: Span<P>, N: Node<P, T>> {
  /// Nodes sorted by `(beg, end)`
  /// 按 `(beg, end)` 排序的节点
  pub nodes: Vec<N>,
  pub geom: Geom,
  _marker: PhantomData<fn() -> (P, T)>,
}

impl<P: Pos, T: Span<P>, N: Node<P, T>> Tree<P, T, N> {
  /// Sort the nodes and run the bottom-up `inside_max_end` fill
  /// 对节点排序并执行自底向上的 `inside_max_end` 填充
  #[must_use]
  pub fn new(mut nodes: Vec<N>) -> Self {
    nodes.sort_unstable_by(|a, b| {
      a.beg()
        .cmp_pos(b.beg())
        .then_with(|| a.end().cmp_pos(b.end()))
    });
    let geom = Geom::new(nodes.len());
    let mut tree = Self {
      nodes,
      geom,
      _marker: PhantomData,
    };
    tree.augment();
    tree
  }

  /// Bottom-up `inside_max_end` fill with the right-border correction
  /// 自底向上填充 `inside_max_end`，并做右边界修正
  ///
  /// When the real node count is not `2^k - 1`, an internal node's right
  /// child can be imaginary while real nodes still live in the ranks under
  /// it. The path from the rightmost real leaf to the root traces that
  /// border; folding the running border value in wherever a right child is
  /// imaginary keeps the augmentation exact.
  /// 当真实节点数不是 `2^k - 1` 时，内部节点的右子可能是虚节点，而其下方的
  /// 秩仍可能有真实节点。最右真实叶子到根的路径即该边界；凡右子为虚节点处
  /// 并入累计的边界值，可保持增强值精确。
  fn augment(&mut self) {
    let n = self.nodes.len();
    if n == 0 {
      return;
    }
    let geom = self.geom;

    // One border rank per level, from the rightmost real leaf up to the
    // root. Some of these ranks may be imaginary.
    // 每层一个边界秩，自最右真实叶子直到根。其中部分秩可能是虚节点。
    let mut border = vec![geom.rightmost_real_leaf()];
    let mut top = border[0];
    while top != geom.root {
      top = geom.parent(top);
      border.push(top);
    }

    let mut border_ime = self.nodes[border[0]].inside_max_end();
    for lv in 1..=geom.root_level {
      // internal ranks at this level: 2^(lv-1) * (2k+1) - 1, k = 0, 1, ...
      // 该层内部节点的秩：2^(lv-1) * (2k+1) - 1，k = 0, 1, ...
      let half = 1usize << (lv - 1);
      let step = half << 2;
      let mut r = (half << 1) - 1;
      while r < n {
        let mut ime = max_pos(self.nodes[r].end(), self.nodes[geom.left(r)].inside_max_end());
        let right = geom.right(r);
        if right < n {
          ime = max_pos(ime, self.nodes[right].inside_max_end());
        } else {
          // right child is imaginary; fold in the last border observation
          // 右子为虚节点；并入最近一次的边界观测值
          ime = max_pos(ime, border_ime);
        }
        self.nodes[r].set_inside_max_end(ime);

        if r == border[lv] {
          border_ime = ime;
        }
        r += step;
      }
    }
  }

  /// Top-down overlap scan of `[qbeg, qend)` rooted at `subtree`
  /// 以 `subtree` 为根，自顶向下扫描与 `[qbeg, qend)` 重叠的项
  ///
  /// Appends matches to `out` in in-order rank order and returns the
  /// number of ranks visited. Recursion depth is bounded by the tree
  /// height.
  /// 按中序秩序将匹配项追加到 `out`，返回访问的秩数。递归深度以树高为界。
  pub fn scan(&self, subtree: Rank, qbeg: P, qend: P, out: &mut Vec<T>) -> usize
  where
    T: Clone,
  {
    let n = self.nodes.len();
    if subtree == NRANK || n == 0 {
      return 0;
    }
    debug_assert!(subtree < self.geom.full_size);
    if subtree >= n {
      // Imaginary rank: its right subtree is entirely imaginary, so only
      // the left branch can hold real nodes.
      // 虚秩：其右子树全为虚节点，只有左分支可能有真实节点。
      return 1 + self.scan(self.geom.left(subtree), qbeg, qend, out);
    }

    let mut cost = 1;
    let node = &self.nodes[subtree];
    if node.inside_max_end() > qbeg {
      // something in this subtree extends into or over the query
      // 子树内有区间延伸进查询范围
      cost += self.scan(self.geom.left(subtree), qbeg, qend, out);
      if node.beg() < qend {
        if node.end() > qbeg {
          out.push(node.item().clone());
        }
        cost += self.scan(self.geom.right(subtree), qbeg, qend, out);
      }
    }
    cost
  }
}
