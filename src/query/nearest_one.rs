use az::{Az, Cast};
use std::ops::Rem;

use crate::distance_metric::DistanceMetric;
use crate::kdtree::KdTree;
use crate::nearest_neighbour::NearestNeighbour;
use crate::types::{Axis, Content, Index};

#[cfg(feature = "tracing")]
use tracing::{span, Level};

impl<A: Axis, T: Content, IDX: Index> KdTree<A, T, IDX>
where
    usize: Cast<IDX>,
{
    /// Queries the tree to find the nearest point to `query`, using the specified
    /// distance metric.
    ///
    /// Returns `None` only if the tree is empty.
    ///
    /// Faster than querying for `nearest_n(query, 1)` due to not needing to
    /// maintain a result set. When several points are equally near, a node is
    /// preferred over equally near points found below it on the query's side
    /// of its split, and points on the far side of a split never displace an
    /// equally near candidate.
    ///
    /// # Panics
    ///
    /// Panics if `query` does not have [`dims`](KdTree::dims) co-ordinates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdknn::KdTree;
    /// use kdknn::distance::SquaredEuclidean;
    ///
    /// let mut tree: KdTree<i64> = KdTree::new(3);
    ///
    /// tree.add(&[1, 2, 5], 100);
    /// tree.add(&[2, 3, 6], 101);
    ///
    /// let nearest = tree.nearest_one::<SquaredEuclidean>(&[1, 2, 6]).unwrap();
    ///
    /// assert_eq!(nearest.distance, 1);
    /// assert_eq!(nearest.item, 100);
    /// assert_eq!(nearest.point, vec![1, 2, 5]);
    /// ```
    #[inline]
    pub fn nearest_one<D>(&self, query: &[A]) -> Option<NearestNeighbour<A, T>>
    where
        D: DistanceMetric<A>,
    {
        assert_eq!(
            query.len(),
            self.dims,
            "query has {} co-ordinates but the tree has {} dimensions",
            query.len(),
            self.dims
        );

        if self.is_empty() {
            return None;
        }

        #[cfg(feature = "tracing")]
        let span = span!(Level::TRACE, "nearest_one", size = self.size());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        self.nearest_one_search::<D>(query)
            .map(|(distance, node_idx)| self.neighbour_at(node_idx, distance))
    }

    // Depth-first search driven by an explicit stack, as trees built from
    // sorted input are as deep as they are large. Each frame is a node whose
    // near subtree is being searched (`best` is `None`) or whose far subtree
    // is being searched (`best` holds the node's result so far). `returned`
    // carries the result of the subtree that just finished.
    fn nearest_one_search<D>(&self, query: &[A]) -> Option<(A::Distance, usize)>
    where
        D: DistanceMetric<A>,
    {
        let mut stack: Vec<NearestOneFrame<A::Distance, IDX>> = Vec::new();
        let mut descend = Some((Self::root_index(), 0));
        let mut returned: Option<(A::Distance, usize)> = None;

        loop {
            if let Some((curr_node_idx, split_dim)) = descend.take() {
                if curr_node_idx == IDX::absent() {
                    returned = None;
                } else {
                    let node_idx = curr_node_idx.az::<usize>();
                    let node = &self.nodes[node_idx];
                    let node_point = self.point(node_idx);

                    let [closer_node_idx, further_node_idx] =
                        if query[split_dim] < node_point[split_dim] {
                            [node.left, node.right]
                        } else {
                            [node.right, node.left]
                        };

                    stack.push(NearestOneFrame {
                        node_idx,
                        split_dim,
                        further_node_idx,
                        best: None,
                    });
                    descend = Some((closer_node_idx, (split_dim + 1).rem(self.dims)));
                    continue;
                }
            }

            let Some(frame) = stack.last_mut() else {
                return returned;
            };

            match frame.best {
                None => {
                    let node_point = self.point(frame.node_idx);
                    let node_dist = D::dist(query, node_point);
                    let best = match returned {
                        Some(closer) if closer.0 < node_dist => closer,
                        _ => (node_dist, frame.node_idx),
                    };

                    let split_dim = frame.split_dim;
                    if D::dist1(query[split_dim], node_point[split_dim]) <= best.0 {
                        frame.best = Some(best);
                        descend = Some((frame.further_node_idx, (split_dim + 1).rem(self.dims)));
                    } else {
                        returned = Some(best);
                        stack.pop();
                    }
                }
                Some(best) => {
                    returned = match returned {
                        Some(further) if further.0 < best.0 => Some(further),
                        _ => Some(best),
                    };
                    stack.pop();
                }
            }
        }
    }
}

struct NearestOneFrame<D, IDX> {
    node_idx: usize,
    split_dim: usize,
    further_node_idx: IDX,
    best: Option<(D, usize)>,
}

#[cfg(test)]
mod tests {
    use crate::distance::{Manhattan, SquaredEuclidean};
    use crate::distance_metric::DistanceMetric;
    use crate::kdtree::KdTree;
    use rand::Rng;

    fn linear_search<D: DistanceMetric<i64>>(content: &[Vec<i64>], query_point: &[i64]) -> i128 {
        content
            .iter()
            .map(|p| D::dist(query_point, p))
            .min()
            .unwrap()
    }

    #[test]
    fn empty_tree_has_no_nearest_point() {
        let tree: KdTree<i64> = KdTree::new(2);

        assert!(tree.nearest_one::<SquaredEuclidean>(&[0, 0]).is_none());
    }

    #[test]
    fn single_point_is_always_the_nearest() {
        let tree: KdTree<i64> = KdTree::from_points(2, &[[7i64, -3]]);

        for query in [[7, -3], [0, 0], [-100, 100]] {
            let nearest = tree.nearest_one::<SquaredEuclidean>(&query).unwrap();
            assert_eq!(nearest.point, vec![7, -3]);
            assert_eq!(nearest.item, 0);
        }
    }

    #[test]
    fn can_query_nearest_one_item() {
        let content: Vec<Vec<i64>> = vec![
            vec![9, 0, 9, 0],
            vec![4, 5, 4, 51],
            vec![12, 3, 12, 3],
            vec![7, 2, 7, 22],
            vec![13, 4, 13, 4],
            vec![6, 3, 6, 33],
            vec![2, 7, 2, 7],
            vec![14, 5, 14, 5],
            vec![3, 6, 3, 6],
            vec![10, 1, 10, 1],
            vec![16, 7, 16, 7],
            vec![1, 8, 1, 8],
            vec![15, 6, 15, 6],
            vec![5, 4, 5, 44],
            vec![8, 1, 8, 15],
            vec![11, 2, 11, 2],
        ];
        let tree: KdTree<i64> = KdTree::from_points(4, &content);

        assert_eq!(tree.size(), 16);

        let nearest = tree
            .nearest_one::<SquaredEuclidean>(&[8, 5, 8, 5])
            .unwrap();
        assert_eq!(nearest.distance, 36);
        assert_eq!(nearest.item, 15);

        // seven points tie at a Manhattan distance of 12
        let nearest = tree.nearest_one::<Manhattan>(&[8, 5, 8, 5]).unwrap();
        assert_eq!(nearest.distance, 12);

        let mut rng = rand::rng();
        for _i in 0..1000 {
            let query_point: Vec<i64> = (0..4).map(|_| rng.random_range(-5..60)).collect();

            let expected = linear_search::<SquaredEuclidean>(&content, &query_point);
            let result = tree
                .nearest_one::<SquaredEuclidean>(&query_point)
                .unwrap();
            assert_eq!(result.distance, expected);

            let expected = linear_search::<Manhattan>(&content, &query_point);
            let result = tree.nearest_one::<Manhattan>(&query_point).unwrap();
            assert_eq!(result.distance, expected);
        }
    }

    #[test]
    fn can_query_nearest_one_item_large_scale() {
        const TREE_SIZE: usize = 20_000;
        const NUM_QUERIES: usize = 200;

        let mut rng = rand::rng();
        let content: Vec<Vec<i64>> = (0..TREE_SIZE)
            .map(|_| (0..3).map(|_| rng.random_range(-10_000..10_000)).collect())
            .collect();
        let tree: KdTree<i64> = KdTree::from_points(3, &content);

        for _ in 0..NUM_QUERIES {
            let query_point: Vec<i64> =
                (0..3).map(|_| rng.random_range(-12_000..12_000)).collect();
            let expected = linear_search::<SquaredEuclidean>(&content, &query_point);

            let result = tree
                .nearest_one::<SquaredEuclidean>(&query_point)
                .unwrap();

            assert_eq!(result.distance, expected);
            assert_eq!(result.point, content[result.item]);
        }
    }

    #[test]
    fn node_wins_a_tie_against_its_near_subtree() {
        let tree: KdTree<i64> = KdTree::from_points(2, &[[1i64, 2], [3, 4], [5, 1]]);

        let nearest = tree.nearest_one::<SquaredEuclidean>(&[2, 3]).unwrap();

        assert_eq!(nearest.distance, 2);
        assert_eq!(nearest.point, vec![1, 2]);
        assert!((nearest.euclidean_distance() - 2f64.sqrt()).abs() < f64::EPSILON);
    }

    #[test]
    fn far_subtree_never_wins_a_tie() {
        // the query falls right of the root, so [3, 0] is found first and
        // [-1, 0] sits in the far subtree at the same distance
        let tree: KdTree<i64> = KdTree::from_points(2, &[[0i64, 10], [3, 0], [-1, 0]]);

        let nearest = tree.nearest_one::<SquaredEuclidean>(&[1, 0]).unwrap();

        assert_eq!(nearest.distance, 4);
        assert_eq!(nearest.item, 1);
    }

    #[test]
    fn repeated_queries_give_identical_results() {
        let mut rng = rand::rng();
        let content: Vec<Vec<i64>> = (0..300)
            .map(|_| (0..2).map(|_| rng.random_range(-5..5)).collect())
            .collect();
        let tree: KdTree<i64> = KdTree::from_points(2, &content);

        let first = tree.nearest_one::<SquaredEuclidean>(&[1, 1]).unwrap();
        let second = tree.nearest_one::<SquaredEuclidean>(&[1, 1]).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "query has 3 co-ordinates but the tree has 2 dimensions")]
    fn querying_with_the_wrong_dimension_panics() {
        let tree: KdTree<i64> = KdTree::from_points(2, &[[1i64, 1]]);
        let _ = tree.nearest_one::<SquaredEuclidean>(&[1, 1, 1]);
    }

    #[test]
    fn sorted_input_is_searched_without_deep_recursion() {
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| {
                let content: Vec<Vec<i64>> = (0..20_000).map(|i| vec![i, 0]).collect();
                let tree: KdTree<i64> = KdTree::from_points(2, &content);
                assert_eq!(tree.depth(), 20_000);

                let nearest = tree.nearest_one::<SquaredEuclidean>(&[12_345, 3]).unwrap();
                (nearest.distance, nearest.item)
            })
            .unwrap();

        assert_eq!(handle.join().unwrap(), (9, 12_345));
    }
}
