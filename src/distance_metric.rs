//! The trait that needs to be implemented by any distance metrics

use crate::types::Axis;

/// Trait that needs to be implemented by any potential distance
/// metric to be used within queries
pub trait DistanceMetric<A: Axis> {
    /// returns the distance between two D-dimensional points, as measured
    /// by a particular distance metric.
    ///
    /// Both slices must have the same length.
    fn dist(a: &[A], b: &[A]) -> A::Distance;

    /// returns the distance between two points along a single axis,
    /// as measured by a particular distance metric.
    ///
    /// (needs to be implemented as it is used by the NN query implementations
    /// to decide whether the far side of a split can hold anything closer
    /// than the current bound)
    fn dist1(a: A, b: A) -> A::Distance;
}
