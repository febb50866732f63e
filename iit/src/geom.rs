//! Implicit tree rank geometry
//! 隐式树的秩几何
//!
//! Tree topology is encoded in the bit pattern of the array rank: a node's
//! level is the number of trailing one-bits of its rank, children sit at
//! rank ± 2^(level-1), the parent at rank ± 2^level depending on which
//! child side the rank is on. No per-node links are stored.
//! 树的拓扑编码在数组秩的位模式中：节点层级为秩的尾部 1 比特数，子节点位于
//! 秩 ± 2^(level-1)，父节点按左右子身份位于秩 ± 2^level。不存储任何指针。

/// Rank: node index in the sorted array and in the conceptual full tree
/// 秩：节点在有序数组及概念满树中的下标
pub type Rank = usize;

/// Level: depth counted from the leaves (leaves are level 0)
/// 层级：自叶子向上计数的深度（叶子为第 0 层）
pub type Level = usize;

/// Invalid-rank sentinel
/// 无效秩哨兵
pub const NRANK: Rank = usize::MAX;

/// Geometry of the conceptual complete binary tree over `n` real nodes
/// `n` 个真实节点对应的概念完全二叉树几何
///
/// Ranks below `n` are real; ranks in `[n, full_size)` are imaginary,
/// referenced by the arithmetic but never materialized.
/// 小于 `n` 的秩为真实节点；`[n, full_size)` 内的秩为虚节点，仅被秩运算
/// 引用，从不物化。
#[derive(Clone, Copy, Debug)]
pub struct Geom {
  /// Real node count
  /// 真实节点数
  pub n: usize,
  /// Size of the full tree, `2^(root_level+1) - 1`
  /// 满树规模，`2^(root_level+1) - 1`
  pub full_size: usize,
  pub root: Rank,
  pub root_level: Level,
}

impl Geom {
  /// Derive the geometry from the real node count
  /// 由真实节点数推导几何
  #[must_use]
  pub fn new(n: usize) -> Self {
    let mut root_level: Level = 0;
    while (1usize << (root_level + 1)) - 1 < n {
      root_level += 1;
    }
    Self {
      n,
      full_size: (1 << (root_level + 1)) - 1,
      root: (1 << root_level) - 1,
      root_level,
    }
  }

  /// Level of a rank: its count of trailing one-bits
  /// 秩的层级：尾部 1 比特数
  #[inline]
  #[must_use]
  pub fn level(&self, r: Rank) -> Level {
    debug_assert!(r < self.full_size);
    (!r).trailing_zeros() as Level
  }

  /// Parent rank, or `NRANK` on the root
  /// 父秩，根节点返回 `NRANK`
  #[inline]
  #[must_use]
  pub fn parent(&self, r: Rank) -> Rank {
    debug_assert!(r < self.full_size);
    if r == self.root {
      return NRANK;
    }
    let ofs = 1usize << self.level(r);
    if (r >> (self.level(r) + 1)) & 1 == 1 {
      // right child sits above its parent
      // 右子的秩大于父节点
      r - ofs
    } else {
      r + ofs
    }
  }

  /// Left child rank, or `NRANK` on a leaf
  /// 左子秩，叶子返回 `NRANK`
  #[inline]
  #[must_use]
  pub fn left(&self, r: Rank) -> Rank {
    let lv = self.level(r);
    if lv > 0 { r - (1 << (lv - 1)) } else { NRANK }
  }

  /// Right child rank, or `NRANK` on a leaf
  /// 右子秩，叶子返回 `NRANK`
  #[inline]
  #[must_use]
  pub fn right(&self, r: Rank) -> Rank {
    let lv = self.level(r);
    if lv > 0 { r + (1 << (lv - 1)) } else { NRANK }
  }

  /// Leftmost rank of the subtree rooted at `r`
  /// 以 `r` 为根的子树的最左秩
  #[inline]
  #[must_use]
  pub fn leftmost(&self, r: Rank) -> Rank {
    r - ((1 << self.level(r)) - 1)
  }

  /// Rightmost rank of the subtree rooted at `r` (may be imaginary)
  /// 以 `r` 为根的子树的最右秩（可能为虚节点）
  #[inline]
  #[must_use]
  pub fn rightmost(&self, r: Rank) -> Rank {
    r + ((1 << self.level(r)) - 1)
  }

  /// Rank of the rightmost real leaf
  /// 最右真实叶子的秩
  #[inline]
  #[must_use]
  pub fn rightmost_real_leaf(&self) -> Rank {
    debug_assert!(self.n > 0);
    self.n - (2 - self.n % 2)
  }
}
