#![cfg_attr(docsrs, feature(doc_cfg))]

//! Implicit interval tree with interpolation index
//! 带插值索引的隐式区间树
//!
//! Extends the [`iit`] layout with two ingredients: an `outside_max_end`
//! augmentation that proves when a bottom-up climb can stop, and one
//! linear model per position domain that predicts which leaf to start the
//! climb at. Large queries on large datasets thereby skip most of the
//! top-down descent; domains where the model fits poorly silently fall
//! back to the plain root scan.
//! 在 [`iit`] 布局之上增加两个要素：证明自底向上爬升何时可停的
//! `outside_max_end` 增强，以及为每个位置域预测爬升起始叶子的线性模型。
//! 大数据集上的查询由此跳过大部分自顶向下的下降；模型拟合不佳的域静默
//! 回退为普通的从根扫描。
//!
//! ## Usage / 使用方法
//!
//! ```rust
//! let mut b = iitii::Builder::new();
//! b.add((12u32, 34u32));
//! b.add((0, 23));
//! b.add((34, 56));
//! let db = b.build(10); // 10 model domains / 10 个模型域
//!
//! let mut hits = db.overlap(22, 25);
//! hits.sort_unstable();
//! assert_eq!(hits, vec![(0, 23), (12, 34)]);
//! ```

mod index;
mod lm;
mod node;

pub use iit::{Geom, Level, NRANK, Pos, Rank, Span};
pub use index::{Builder, Iitii, IitiiStats};
pub use lm::{LeafModel, mean_absolute_residual, regress};
pub use node::IitiiNode;
