//! Position type abstraction
//! 位置类型抽象

#![allow(clippy::cast_precision_loss, clippy::cast_lossless)]

use std::{cmp::Ordering, fmt::Debug};

/// Numeric position of an interval endpoint
/// 区间端点的数值位置
///
/// The maximum representable value is reserved as the invalid-position
/// sentinel; the minimum doubles as negative infinity for augmentation
/// fields. NaN positions are unsupported.
/// 最大可表示值保留作无效位置哨兵；最小值兼作增强字段的负无穷。
/// 不支持 NaN 位置。
pub trait Pos: Copy + Send + Sync + PartialOrd + Debug + 'static {
  /// Invalid-position sentinel (max representable value)
  /// 无效位置哨兵（最大可表示值）
  const NPOS: Self;

  /// Negative-infinity sentinel (min representable value)
  /// 负无穷哨兵（最小可表示值）
  const NEG: Self;

  /// Lossy widening used by the rank-prediction model
  /// 秩预测模型使用的有损转换
  fn as_f64(self) -> f64;

  /// Total order used for the build-time sort
  /// 构建时排序使用的全序
  fn cmp_pos(self, other: Self) -> Ordering;
}

/// Max of two positions under the total order
/// 全序下两个位置的较大者
#[inline]
pub fn max_pos<P: Pos>(a: P, b: P) -> P {
  if a.cmp_pos(b).is_lt() { b } else { a }
}

macro_rules! impl_pos_int {
  ($($t:ty),*) => {
    $(
      impl Pos for $t {
        const NPOS: Self = <$t>::MAX;
        const NEG: Self = <$t>::MIN;

        #[inline(always)]
        fn as_f64(self) -> f64 {
          self as f64
        }

        #[inline(always)]
        fn cmp_pos(self, other: Self) -> Ordering {
          Ord::cmp(&self, &other)
        }
      }
    )*
  };
}

macro_rules! impl_pos_float {
  ($($t:ty),*) => {
    $(
      impl Pos for $t {
        const NPOS: Self = <$t>::MAX;
        const NEG: Self = <$t>::MIN;

        #[inline(always)]
        fn as_f64(self) -> f64 {
          self as f64
        }

        #[inline(always)]
        fn cmp_pos(self, other: Self) -> Ordering {
          <$t>::total_cmp(&self, &other)
        }
      }
    )*
  };
}

impl_pos_int!(u8, i8, u16, i16, u32, i32, u64, i64, usize, isize);
impl_pos_float!(f32, f64);
