//! Node record with the outside augmentation
//! 带外侧增强的节点记录

use iit::{Node, Pos, Span};

/// Interval tree node extended for the bottom-up search
/// 为自底向上搜索扩展的区间树节点
///
/// `outside_max_end` of node `n` is the max `end` over all nodes `m`
/// outside `n`'s subtree with `m.beg < n.beg`; `Pos::NEG` when no such
/// node exists. Its counterpart `outside_min_beg` needs no storage: it
/// falls out of rank offsets in the beg-sorted array.
/// 节点 `n` 的 `outside_max_end` 是其子树之外所有满足 `m.beg < n.beg` 的
/// 节点 `m` 的最大 `end`；无此类节点时为 `Pos::NEG`。与之对偶的
/// `outside_min_beg` 无需存储：可由 beg 有序数组中的秩偏移直接得出。
///
/// Once a climb reaches a node where `outside_max_end <= qbeg` and
/// `qend <= outside_min_beg`, nothing outside the subtree can overlap the
/// query, so the climb may stop.
/// 当爬升到达满足 `outside_max_end <= qbeg` 且 `qend <= outside_min_beg`
/// 的节点时，子树之外不可能再有重叠，爬升即可停止。
#[derive(Clone, Debug)]
pub struct IitiiNode<P: Pos, T: Span<P>> {
  pub item: T,
  pub inside_max_end: P,
  pub outside_max_end: P,
}

impl<P: Pos, T: Span<P>> Node<P, T> for IitiiNode<P, T> {
  #[inline]
  fn new(item: T) -> Self {
    let inside_max_end = item.end();
    Self {
      item,
      inside_max_end,
      outside_max_end: P::NEG,
    }
  }

  #[inline]
  fn item(&self) -> &T {
    &self.item
  }

  #[inline]
  fn inside_max_end(&self) -> P {
    self.inside_max_end
  }

  #[inline]
  fn set_inside_max_end(&mut self, ime: P) {
    self.inside_max_end = ime;
  }
}
