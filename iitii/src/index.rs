//! Interpolation-indexed implicit interval tree
//! 带插值索引的隐式区间树

#![allow(clippy::cast_precision_loss)]

use std::{
  mem::size_of,
  sync::atomic::{AtomicU64, Ordering::Relaxed},
};

use iit::{Level, NRANK, Node, Pos, Rank, Span, Tree, max_pos};
use log::trace;

use crate::{IitiiNode, LeafModel, lm};

/// Models are trained on leaf offsets
/// 模型在叶子层偏移上训练
const TRAIN_LEVEL: Level = 0;

/// Implicit interval tree with a learned interpolation index
/// 带学习型插值索引的隐式区间树
///
/// The `beg` range of the indexed items is split into equal-width domains;
/// each domain gets a linear model regressing the leaf offset on `beg`.
/// A query asks its domain's model for a starting leaf, climbs only while
/// something outside the current subtree could still overlap, then scans
/// that subtree top-down. Domains whose model fits poorly stay absent and
/// fall back to a scan from the root.
/// 被索引项的 `beg` 范围被切分为等宽的域；每个域用一条线性模型将叶子偏移
/// 回归到 `beg` 上。查询先向所在域的模型询问起始叶子，仅当子树之外仍可能
/// 有重叠时继续爬升，然后对该子树自顶向下扫描。拟合不佳的域保持缺省，
/// 查询回退为从根扫描。
pub struct Iitii<P: Pos, T: Span<P>> {
  pub tree: Tree<P, T, IitiiNode<P, T>>,
  /// Domain count C
  /// 域数 C
  domains: usize,
  /// Equal width (in position units) of each domain
  /// 每个域的等宽（以位置为单位）
  domain_size: f64,
  min_beg: f64,
  /// One optional model per domain; `None` marks an unusable domain
  /// 每域一个可选模型；`None` 表示该域不可用
  models: Vec<Option<LeafModel>>,
  queries: AtomicU64,
  total_climb_cost: AtomicU64,
}

/// Index statistics
/// 索引统计信息
#[derive(Clone, Debug, Default)]
pub struct IitiiStats {
  pub domains: usize,
  /// Domains with an accepted model
  /// 拥有已接受模型的域数
  pub trained: usize,
  pub queries: u64,
  pub total_climb_cost: u64,
}

impl<P: Pos, T: Span<P>> Iitii<P, T> {
  #[must_use]
  pub fn builder() -> Builder<P, T> {
    Builder::new()
  }

  fn new(nodes: Vec<IitiiNode<P, T>>, domains: usize) -> Self {
    let domains = domains.max(1);
    let mut this = Self {
      tree: Tree::new(nodes),
      domains,
      domain_size: f64::MAX,
      min_beg: f64::MAX,
      models: vec![None; domains],
      queries: AtomicU64::new(0),
      total_climb_cost: AtomicU64::new(0),
    };
    let n = this.tree.nodes.len();
    if n > 0 {
      this.min_beg = this.tree.nodes[0].beg().as_f64();
      let max_beg = this.tree.nodes[n - 1].beg().as_f64();
      this.domain_size = 1.0 + (max_beg - this.min_beg) / domains as f64;
      this.fill_outside_max_end();
      this.train(TRAIN_LEVEL);
    }
    this
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.tree.nodes.len()
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.tree.nodes.is_empty()
  }

  /// Indexed items in `(beg, end)` order
  /// 按 `(beg, end)` 序的被索引项
  pub fn items(&self) -> impl Iterator<Item = &T> {
    self.tree.nodes.iter().map(|n| n.item())
  }

  #[inline]
  #[must_use]
  pub fn mem_usage(&self) -> usize {
    self.tree.nodes.len() * size_of::<IitiiNode<P, T>>()
      + self.models.len() * size_of::<Option<LeafModel>>()
  }

  /// Overlap queries served so far
  /// 迄今服务的重叠查询数
  #[inline]
  #[must_use]
  pub fn queries(&self) -> u64 {
    self.queries.load(Relaxed)
  }

  /// Climb steps accumulated over all queries
  /// 所有查询累计的爬升步数
  #[inline]
  #[must_use]
  pub fn total_climb_cost(&self) -> u64 {
    self.total_climb_cost.load(Relaxed)
  }

  #[must_use]
  pub fn avg_climb_cost(&self) -> f64 {
    self.total_climb_cost() as f64 / self.queries().max(1) as f64
  }

  #[must_use]
  pub fn stats(&self) -> IitiiStats {
    IitiiStats {
      domains: self.domains,
      trained: self.models.iter().flatten().count(),
      queries: self.queries(),
      total_climb_cost: self.total_climb_cost(),
    }
  }

  /// Domain owning a begin position
  /// 起点位置所属的域
  #[inline]
  fn which_domain(&self, beg: f64) -> usize {
    if beg < self.min_beg {
      return 0;
    }
    (((beg - self.min_beg) / self.domain_size) as usize).min(self.domains - 1)
  }

  /// Fill `outside_max_end` of every real node from the sorted array
  /// 基于有序数组填充每个真实节点的 `outside_max_end`
  fn fill_outside_max_end(&mut self) {
    let n = self.tree.nodes.len();
    let geom = self.tree.geom;

    // running max end over ranks 0..=i, consulted by the fill below
    // 秩 0..=i 上的运行最大 end，供下方填充查询
    let mut running_max_end = Vec::with_capacity(n);
    let mut run = P::NEG;
    for node in &self.tree.nodes {
      run = max_pos(run, node.end());
      running_max_end.push(run);
    }

    for r in 0..n {
      let leftmost = geom.leftmost(r);
      if leftmost == 0 {
        // every lower rank is inside the subtree
        // 更低的秩都在子树之内
        continue;
      }
      let beg = self.tree.nodes[r].beg();
      // Highest rank below the leftmost descendant whose beg is strictly
      // below this node's; walk left across beg ties.
      // 最左后代之下 beg 严格小于本节点的最高秩；遇 beg 相同继续左移。
      let mut leq = leftmost - 1;
      while self.tree.nodes[leq].beg() == beg {
        if leq == 0 {
          break;
        }
        leq -= 1;
      }
      if self.tree.nodes[leq].beg() < beg {
        self.tree.nodes[r].outside_max_end = running_max_end[leq];
      }
    }
  }

  /// Train one linear model per domain on the level's `(beg, offset)` points
  /// 在该层的 `(beg, offset)` 点上为每个域训练一条线性模型
  fn train(&mut self, lv: Level) {
    let n = self.tree.nodes.len();
    let mut points: Vec<Vec<(f64, f64)>> = vec![Vec::new(); self.domains];
    let step = 1usize << (lv + 1);
    let mut r = (1usize << lv) - 1;
    let mut ofs = 0usize;
    while r < n {
      debug_assert_eq!(self.tree.geom.level(r), lv);
      let beg = self.tree.nodes[r].beg().as_f64();
      points[self.which_domain(beg)].push((beg, ofs as f64));
      r += step;
      ofs += 1;
    }

    // Accept a model only if the regression succeeded and its mean
    // absolute residual stays within 2^(root_level/2). Past that, the
    // bottom-up search would start too far from the answers; the domain
    // stays absent and its queries scan from the root instead.
    // 仅当回归成功且平均绝对残差不超过 2^(root_level/2) 时接受模型。超出
    // 该界限时，自底向上搜索的起点离答案过远；该域保持缺省，其查询改为
    // 从根扫描。
    let budget = (1u64 << (self.tree.geom.root_level / 2)) as f64;
    for (which, pts) in points.iter().enumerate() {
      let Some((intercept, slope)) = lm::regress(pts) else {
        continue;
      };
      if !intercept.is_finite() || !slope.is_finite() {
        continue;
      }
      let residual = lm::mean_absolute_residual(pts, intercept, slope);
      if residual <= budget {
        self.models[which] = Some(LeafModel {
          intercept,
          slope,
          level: lv,
        });
      } else {
        trace!("domain {which}: residual {residual:.1} over budget {budget}, left untrained");
      }
    }
  }

  /// Leaf rank to start the climb at, or `NRANK` if the domain's model is
  /// absent
  /// 爬升起点叶子的秩；该域无模型时为 `NRANK`
  #[must_use]
  pub fn predict_leaf(&self, qbeg: P) -> Rank {
    let Some(model) = self.models[self.which_domain(qbeg.as_f64())] else {
      return NRANK;
    };
    debug_assert!(model.level <= self.tree.geom.root_level);

    let ofs_f = model.slope.mul_add(qbeg.as_f64(), model.intercept);
    let ofs = ofs_f.max(0.0).round() as usize;
    // rank on the model's level: 2^level * (2*ofs + 1) - 1, saturating so
    // off-scale predictions land beyond n below
    // 模型层上的秩：2^level * (2*ofs + 1) - 1，饱和运算使越界预测落到 n 之外
    let r = ofs
      .saturating_mul(2)
      .saturating_add(1)
      .saturating_mul(1 << model.level)
      .saturating_sub(1);

    if r < self.tree.nodes.len() {
      debug_assert_eq!(self.tree.geom.level(r), model.level);
      r
    } else {
      // off-scale high: start from the rightmost real leaf instead
      // 预测超出范围：改从最右真实叶子开始
      self.tree.geom.rightmost_real_leaf()
    }
  }

  /// Min `beg` over nodes outside the subtree with `beg` not below the
  /// subtree root's own; `NPOS` when no such node exists
  /// 子树之外 `beg` 不小于子树根的节点中的最小 `beg`；无此类节点时为 `NPOS`
  #[inline]
  #[must_use]
  pub fn outside_min_beg(&self, subtree: Rank) -> P {
    let nodes = &self.tree.nodes;
    let beg = nodes[subtree].beg();
    let leftmost = self.tree.geom.leftmost(subtree);
    if leftmost > 0 && nodes[leftmost - 1].beg() == beg {
      // left neighbors can share the subtree root's beg, and the bound
      // covers nodes with beg >= it
      // 左邻可能与子树根同 beg，而该界覆盖 beg 不小于它的节点
      return beg;
    }
    let rightmost = self.tree.geom.rightmost(subtree);
    if rightmost < nodes.len() - 1 {
      nodes[rightmost + 1].beg()
    } else {
      P::NPOS
    }
  }

  /// Predict a leaf for `qbeg` and climb until nothing outside the subtree
  /// can overlap `[qbeg, qend)`, or the root is reached
  /// 为 `qbeg` 预测叶子并爬升，直到子树之外不可能与 `[qbeg, qend)` 重叠，
  /// 或到达根
  ///
  /// `(subtree, climb steps)`; `None` when the domain has no model and the
  /// query must scan from the root.
  /// 返回（子树根，爬升步数）；该域无模型、查询须从根扫描时为 `None`。
  #[must_use]
  pub fn climb(&self, qbeg: P, qend: P) -> Option<(Rank, usize)> {
    let prediction = self.predict_leaf(qbeg);
    if prediction == NRANK {
      return None;
    }
    debug_assert_eq!(self.tree.geom.level(prediction), TRAIN_LEVEL);

    let n = self.tree.nodes.len();
    let root = self.tree.geom.root;
    let mut climb_cost = 0;
    let mut subtree = prediction;
    loop {
      if subtree == root {
        break;
      }
      // imaginary ranks always climb; otherwise stop once neither side
      // outside the subtree can still overlap
      // 虚秩必须继续爬升；否则当子树外两侧都不可能重叠时停止
      if subtree < n
        && self.tree.nodes[subtree].outside_max_end <= qbeg
        && self.outside_min_beg(subtree) >= qend
      {
        break;
      }
      subtree = self.tree.geom.parent(subtree);
      climb_cost += 1;
    }
    Some((subtree, climb_cost))
  }
}

impl<P: Pos, T: Span<P> + Clone> Iitii<P, T> {
  /// Overlap query appending into a caller buffer
  /// 重叠查询，结果追加到调用方缓冲区
  ///
  /// Clears `out` first; returns the number of tree ranks visited, climb
  /// steps included. An empty index visits zero ranks.
  /// 先清空 `out`；返回访问的树秩数（含爬升步数）。空索引访问零个秩。
  pub fn overlap_into(&self, qbeg: P, qend: P, out: &mut Vec<T>) -> usize {
    out.clear();
    if qbeg >= qend {
      // a degenerate window matches nothing
      // 退化窗口不匹配任何项
      return 0;
    }
    let Some((subtree, climb_cost)) = self.climb(qbeg, qend) else {
      // no model for this domain: top-down from the root
      // 该域无模型：从根自顶向下
      return self.tree.scan(self.tree.geom.root, qbeg, qend, out);
    };

    self.queries.fetch_add(1, Relaxed);
    self.total_climb_cost.fetch_add(climb_cost as u64, Relaxed);

    self.tree.scan(subtree, qbeg, qend, out) + climb_cost
  }

  /// Overlap query returning a fresh vec
  /// 重叠查询，返回新建向量
  #[must_use]
  pub fn overlap(&self, qbeg: P, qend: P) -> Vec<T> {
    let mut out = Vec::new();
    self.overlap_into(qbeg, qend, &mut out);
    out
  }
}

/// Accumulates items ahead of the one-shot build
/// 为一次性构建累积项
pub struct Builder<P: Pos, T: Span<P>> {
  nodes: Vec<IitiiNode<P, T>>,
}

impl<P: Pos, T: Span<P>> Builder<P, T> {
  #[must_use]
  pub fn new() -> Self {
    Self { nodes: Vec::new() }
  }

  /// Append one item
  /// 追加一个项
  pub fn add(&mut self, item: T) {
    self.nodes.push(IitiiNode::new(item));
  }

  /// Consume the accumulated items and construct the index
  /// 消费累积的项并构建索引
  ///
  /// `domains` is the model-domain count C, coerced to at least 1.
  /// `domains` 为模型域数 C，至少取 1。
  #[must_use]
  pub fn build(self, domains: usize) -> Iitii<P, T> {
    Iitii::new(self.nodes, domains)
  }
}

impl<P: Pos, T: Span<P>> Default for Builder<P, T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<P: Pos, T: Span<P>> Extend<T> for Builder<P, T> {
  fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
    self.nodes.extend(iter.into_iter().map(IitiiNode::new));
  }
}

impl<P: Pos, T: Span<P>> FromIterator<T> for Builder<P, T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut b = Self::new();
    b.extend(iter);
    b
  }
}
