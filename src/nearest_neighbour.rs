//! A result item returned by a query
use crate::types::{Axis, Content};
use std::cmp::Ordering;

/// Represents an entry in the results of a nearest neighbour query, with `distance` being the distance of this
/// particular point from the query point, `point` being a copy of the stored co-ordinates, and `item` being
/// the stored item that was found as part of the query.
#[derive(Debug, Clone)]
pub struct NearestNeighbour<A: Axis, T> {
    /// the distance of the found item from the query point according to the supplied distance metric
    pub distance: A::Distance,
    /// the co-ordinates of the found point, copied out of the tree
    pub point: Vec<A>,
    /// the stored item that was found in the query
    pub item: T,
}

impl<A: Axis, T: Content> Ord for NearestNeighbour<A, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance.cmp(&other.distance)
    }
}

impl<A: Axis, T: Content> PartialOrd for NearestNeighbour<A, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: Axis, T: Content> Eq for NearestNeighbour<A, T> {}

impl<A: Axis, T: Content> PartialEq for NearestNeighbour<A, T> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.item == other.item && self.point == other.point
    }
}

impl<A: Axis, T: Content> NearestNeighbour<A, T> {
    /// The true (not squared) euclidean distance, for results of a
    /// [`SquaredEuclidean`](crate::distance::SquaredEuclidean) query.
    pub fn euclidean_distance(&self) -> f64 {
        az::cast::<A::Distance, f64>(self.distance).sqrt()
    }
}

impl<A: Axis, T: Content> From<NearestNeighbour<A, T>> for (A::Distance, T) {
    fn from(elem: NearestNeighbour<A, T>) -> Self {
        (elem.distance, elem.item)
    }
}

#[cfg(test)]
mod tests {
    use crate::nearest_neighbour::NearestNeighbour;
    use std::cmp::Ordering;

    #[test]
    fn test_into_tuple() {
        let nn: (i128, usize) = NearestNeighbour::<i64, usize> {
            distance: 1,
            point: vec![1, 0],
            item: 1usize,
        }
        .into();

        assert_eq!(nn.0, 1);
        assert_eq!(nn.1, 1usize);
    }

    #[test]
    fn test_cmp_orders_by_distance_only() {
        let a = NearestNeighbour::<i64, usize> {
            distance: 1,
            point: vec![9, 9],
            item: 10,
        };
        let b = NearestNeighbour::<i64, usize> {
            distance: 2,
            point: vec![0, 0],
            item: 5,
        };

        assert_eq!(a.partial_cmp(&b).unwrap(), Ordering::Less);
        assert_eq!(b.cmp(&a), Ordering::Greater);
    }

    #[test]
    fn test_euclidean_distance() {
        let nn = NearestNeighbour::<i32, usize> {
            distance: 25,
            point: vec![3, 4],
            item: 0,
        };

        assert_eq!(nn.euclidean_distance(), 5.0);
    }
}
