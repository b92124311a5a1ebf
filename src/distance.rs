//! Contains a selection of distance metrics that can be chosen from to measure the distance
//! between two points stored inside the tree.

use num_traits::{Signed, Zero};

use crate::distance_metric::DistanceMetric;
use crate::types::Axis;

/// Returns the squared euclidean distance between two points.
///
/// Faster than Euclidean distance due to not needing a square root, but still
/// preserves the same distance ordering as with Euclidean distance.
///
/// # Examples
///
/// ```rust
/// use kdknn::distance::SquaredEuclidean;
/// use kdknn::distance_metric::DistanceMetric;
///
/// assert_eq!(0i128, SquaredEuclidean::dist(&[0i64, 0], &[0, 0]));
/// assert_eq!(1i128, SquaredEuclidean::dist(&[0i64, 0], &[1, 0]));
/// assert_eq!(2i128, SquaredEuclidean::dist(&[0i64, 0], &[1, 1]));
/// assert_eq!(25i128, SquaredEuclidean::dist(&[-1i64, -2], &[2, 2]));
/// ```
#[derive(Debug)]
pub struct SquaredEuclidean {}

impl<A: Axis> DistanceMetric<A> for SquaredEuclidean {
    #[inline]
    fn dist(a: &[A], b: &[A]) -> A::Distance {
        debug_assert_eq!(a.len(), b.len(), "points of differing dimension");
        a.iter()
            .zip(b.iter())
            .map(|(&a_val, &b_val)| {
                let diff = a_val.widen() - b_val.widen();
                diff * diff
            })
            .fold(A::Distance::zero(), std::ops::Add::add)
    }

    #[inline]
    fn dist1(a: A, b: A) -> A::Distance {
        let diff = a.widen() - b.widen();
        diff * diff
    }
}

/// Returns the Manhattan / "taxi cab" distance between two points.
///
/// # Examples
///
/// ```rust
/// use kdknn::distance::Manhattan;
/// use kdknn::distance_metric::DistanceMetric;
///
/// assert_eq!(0i64, Manhattan::dist(&[0i16, 0], &[0, 0]));
/// assert_eq!(1i64, Manhattan::dist(&[0i16, 0], &[1, 0]));
/// assert_eq!(7i64, Manhattan::dist(&[-1i16, -2], &[2, 2]));
/// ```
#[derive(Debug)]
pub struct Manhattan {}

impl<A: Axis> DistanceMetric<A> for Manhattan {
    #[inline]
    fn dist(a: &[A], b: &[A]) -> A::Distance {
        debug_assert_eq!(a.len(), b.len(), "points of differing dimension");
        a.iter()
            .zip(b.iter())
            .map(|(&a_val, &b_val)| (a_val.widen() - b_val.widen()).abs())
            .fold(A::Distance::zero(), std::ops::Add::add)
    }

    #[inline]
    fn dist1(a: A, b: A) -> A::Distance {
        (a.widen() - b.widen()).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case([0, 0, 0], [0, 0, 0], 0)]
    #[case([1, 2, 3], [1, 2, 3], 0)]
    #[case([1, 2, 3], [4, 6, 3], 25)]
    #[case([-5, 0, 5], [5, 0, -5], 200)]
    fn squared_euclidean_sums_squared_differences(
        #[case] a: [i32; 3],
        #[case] b: [i32; 3],
        #[case] expected: i128,
    ) {
        assert_eq!(SquaredEuclidean::dist(&a, &b), expected);
        assert_eq!(SquaredEuclidean::dist(&b, &a), expected);
    }

    #[rstest]
    #[case([0, 0, 0], [0, 0, 0], 0)]
    #[case([1, 2, 3], [4, 6, 3], 7)]
    #[case([-5, 0, 5], [5, 0, -5], 20)]
    fn manhattan_sums_absolute_differences(
        #[case] a: [i32; 3],
        #[case] b: [i32; 3],
        #[case] expected: i128,
    ) {
        assert_eq!(Manhattan::dist(&a, &b), expected);
    }

    #[test]
    fn single_axis_distance_is_the_squared_gap() {
        assert_eq!(<SquaredEuclidean as DistanceMetric<i64>>::dist1(3, -4), 49);
        assert_eq!(<Manhattan as DistanceMetric<i64>>::dist1(3, -4), 7);
    }

    #[test]
    fn does_not_overflow_at_the_extremes_of_i64() {
        let a = [i64::MIN];
        let b = [i64::MAX];
        let span = i64::MAX as i128 - i64::MIN as i128;

        assert_eq!(Manhattan::dist(&a, &b), span);
        assert_eq!(SquaredEuclidean::dist(&[i32::MIN, 0], &[i32::MAX, 0]), {
            let span = i32::MAX as i128 - i32::MIN as i128;
            span * span
        });
    }
}
