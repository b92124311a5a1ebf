//! Definitions and implementations for the traits that parameterise [`KdTree`](crate::KdTree):
//! the co-ordinate type ([`Axis`]), the stored item type ([`Content`]) and the type used
//! to index nodes internally ([`Index`]).
use az::Cast;
use num_traits::{PrimInt, Signed, Unsigned, Zero};
use std::fmt::Debug;

/// Axis trait.
///
/// Implemented by the signed integer types that can be used as point co-ordinates.
/// Each co-ordinate type is paired with a wider `Distance` type. Co-ordinates are
/// widened before they are subtracted and squared, so a squared distance over
/// `D` axes does not overflow for co-ordinates spanning the full range of the
/// narrower type (for `i64` this holds while `D * range^2` fits in an `i128`).
pub trait Axis: PrimInt + Signed + Default + Debug + Sync + Send {
    /// Type that distances between points of this co-ordinate type are measured in.
    type Distance: PrimInt + Signed + Default + Debug + Sync + Send + Cast<f64>;

    /// Widens a co-ordinate into the distance type.
    fn widen(self) -> Self::Distance;
}

macro_rules! impl_axis {
    ($($axis:ty => $dist:ty),+) => {
        $(
            impl Axis for $axis {
                type Distance = $dist;

                #[inline]
                fn widen(self) -> $dist {
                    <$dist>::from(self)
                }
            }
        )+
    };
}

impl_axis!(i8 => i32, i16 => i64, i32 => i128, i64 => i128);

/// Content trait.
///
/// Must be implemented by any type that you want to store alongside each point
/// in a [`KdTree`](crate::KdTree). Usually this is `usize`, holding the position of
/// the point in the source data, which is what
/// [`KdTree::from_points`](crate::KdTree::from_points) stores.
pub trait Content: PartialEq + Default + Clone + Copy + Ord + Debug + Sync + Send {}
impl<T: PartialEq + Default + Clone + Copy + Ord + Debug + Sync + Send> Content for T {}

/// Implemented on u16, u32 and usize so that they can be used internally to index
/// the node arena of a [`KdTree`](crate::KdTree).
///
/// The maximum value of the type is reserved to mark an absent child, so a tree
/// indexed by `u16` holds at most 65,535 points.
pub trait Index: PrimInt + Unsigned + Zero + Cast<usize> + Debug + Sync + Send {
    #[doc(hidden)]
    fn absent() -> Self;
    #[doc(hidden)]
    fn capacity() -> usize;
}

impl Index for u16 {
    fn absent() -> u16 {
        u16::MAX
    }
    fn capacity() -> usize {
        u16::MAX as usize
    }
}

impl Index for u32 {
    fn absent() -> u32 {
        u32::MAX
    }
    fn capacity() -> usize {
        u32::MAX as usize
    }
}

impl Index for usize {
    fn absent() -> usize {
        usize::MAX
    }
    fn capacity() -> usize {
        usize::MAX
    }
}
