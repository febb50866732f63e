#![cfg_attr(docsrs, feature(doc_cfg))]

//! Implicit interval tree
//! 隐式区间树
//!
//! A complete binary search tree over half-open intervals `[beg, end)`,
//! sorted by begin position and stored in one flat array. Tree topology
//! lives in the bit pattern of the array rank, so there are no per-node
//! pointers; each node additionally carries the max end of its subtree,
//! which lets the overlap scan prune whole subtrees.
//! 按起点排序、存于单个扁平数组的半开区间 `[beg, end)` 完全二叉搜索树。
//! 树的拓扑编码在数组秩的位模式中，节点不含指针；每个节点另携带其子树的
//! 最大 end，使重叠扫描得以剪去整棵子树。
//!
//! ## Usage / 使用方法
//!
//! ```rust
//! let mut b = iit::Builder::new();
//! b.add((12u32, 34u32));
//! b.add((0, 23));
//! b.add((34, 56));
//! let db = b.build();
//!
//! let mut hits = db.overlap(22, 25);
//! hits.sort_unstable();
//! assert_eq!(hits, vec![(0, 23), (12, 34)]);
//! ```

mod geom;
mod index;
mod node;
mod pos;
mod span;
mod tree;

pub use geom::{Geom, Level, NRANK, Rank};
pub use index::{Builder, Iit};
pub use node::{IitNode, Node};
pub use pos::{Pos, max_pos};
pub use span::Span;
pub use tree::Tree;
