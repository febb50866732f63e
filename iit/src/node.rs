//! Node records stored by the tree
//! 树存储的节点记录

use crate::{Pos, Span};

/// Node record abstraction shared by index variants
/// 各索引变体共享的节点记录抽象
///
/// A variant's node wraps the payload plus its augmentation fields; the
/// tree core only needs the interval accessors and `inside_max_end`.
/// 变体节点包装负载及其增强字段；树核心只需要区间访问器和
/// `inside_max_end`。
pub trait Node<P: Pos, T: Span<P>> {
  /// Wrap an item, seeding `inside_max_end` with the item's own end
  /// 包装一个项，以其自身 end 初始化 `inside_max_end`
  fn new(item: T) -> Self;

  fn item(&self) -> &T;

  #[inline]
  fn beg(&self) -> P {
    self.item().beg()
  }

  #[inline]
  fn end(&self) -> P {
    self.item().end()
  }

  /// Max end over this node and its subtree
  /// 本节点及其子树的最大 end
  fn inside_max_end(&self) -> P;

  fn set_inside_max_end(&mut self, ime: P);
}

/// Plain implicit-interval-tree node
/// 普通隐式区间树节点
#[derive(Clone, Debug)]
pub struct IitNode<P: Pos, T: Span<P>> {
  pub item: T,
  pub inside_max_end: P,
}

impl<P: Pos, T: Span<P>> Node<P, T> for IitNode<P, T> {
  #[inline]
  fn new(item: T) -> Self {
    let inside_max_end = item.end();
    Self {
      item,
      inside_max_end,
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
