use az::{Az, Cast};
use std::ops::Rem;

use crate::distance_metric::DistanceMetric;
use crate::kdtree::KdTree;
use crate::nearest_neighbour::NearestNeighbour;
use crate::result_collection::BoundedResultSet;
use crate::types::{Axis, Content, Index};

#[cfg(feature = "tracing")]
use tracing::{span, Level};

impl<A: Axis, T: Content, IDX: Index> KdTree<A, T, IDX>
where
    usize: Cast<IDX>,
{
    /// Finds the nearest `qty` points to `query`, using the specified
    /// distance metric, sorted by ascending distance.
    ///
    /// Returns `min(qty, size)` results; points at equal distance keep the
    /// order they hold in the underlying [`BoundedResultSet`].
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
    /// tree.add(&[1, 2, 5], 100);
    /// tree.add(&[2, 3, 6], 101);
    /// tree.add(&[9, 9, 9], 102);
    ///
    /// let nearest = tree.nearest_n::<SquaredEuclidean>(&[1, 2, 6], 2);
    ///
    /// assert_eq!(nearest.len(), 2);
    /// assert_eq!((nearest[0].distance, nearest[0].item), (1, 100));
    /// assert_eq!((nearest[1].distance, nearest[1].item), (2, 101));
    /// ```
    #[inline]
    pub fn nearest_n<D>(&self, query: &[A], qty: usize) -> Vec<NearestNeighbour<A, T>>
    where
        D: DistanceMetric<A>,
    {
        self.nearest_n_unsorted::<D>(query, qty).into_sorted_vec()
    }

    /// Finds the nearest `qty` points to `query`, returning the result set in
    /// the state the search left it, without ordering the entries.
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
    /// let tree: KdTree<i64> = KdTree::from_points(1, &[[0i64], [4], [-1], [2]]);
    ///
    /// let results = tree.nearest_n_unsorted::<SquaredEuclidean>(&[1], 3);
    ///
    /// assert_eq!(results.len(), 3);
    /// assert_eq!(results.worst_distance(), Some(4));
    /// ```
    pub fn nearest_n_unsorted<D>(&self, query: &[A], qty: usize) -> BoundedResultSet<A, T>
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

        #[cfg(feature = "tracing")]
        let span = span!(Level::TRACE, "nearest_n", qty, size = self.size());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let mut results = BoundedResultSet::with_capacity(qty);
        if qty > 0 && !self.is_empty() {
            self.nearest_n_search::<D>(query, &mut results);
        }

        results
    }

    // Depth-first search driven by an explicit stack: a node's near subtree
    // is searched first, then the node itself is offered, then its far
    // subtree is searched if it is still within reach.
    fn nearest_n_search<D>(&self, query: &[A], results: &mut BoundedResultSet<A, T>)
    where
        D: DistanceMetric<A>,
    {
        let mut pending = vec![NearestNStep::Descend {
            node_idx: Self::root_index(),
            split_dim: 0,
        }];

        while let Some(step) = pending.pop() {
            match step {
                NearestNStep::Descend {
                    node_idx,
                    split_dim,
                } => {
                    if node_idx == IDX::absent() {
                        continue;
                    }
                    let node_idx = node_idx.az::<usize>();
                    let node = &self.nodes[node_idx];
                    let node_point = self.point(node_idx);

                    let [closer_node_idx, further_node_idx] =
                        if query[split_dim] < node_point[split_dim] {
                            [node.left, node.right]
                        } else {
                            [node.right, node.left]
                        };

                    pending.push(NearestNStep::Visit {
                        node_idx,
                        split_dim,
                        further_node_idx,
                    });
                    pending.push(NearestNStep::Descend {
                        node_idx: closer_node_idx,
                        split_dim: (split_dim + 1).rem(self.dims),
                    });
                }
                NearestNStep::Visit {
                    node_idx,
                    split_dim,
                    further_node_idx,
                } => {
                    let node_point = self.point(node_idx);
                    let distance = D::dist(query, node_point);
                    if results.accepts(distance) {
                        results.offer(self.neighbour_at(node_idx, distance));
                    }

                    if results.within_reach(D::dist1(query[split_dim], node_point[split_dim])) {
                        pending.push(NearestNStep::Descend {
                            node_idx: further_node_idx,
                            split_dim: (split_dim + 1).rem(self.dims),
                        });
                    }
                }
            }
        }
    }
}

enum NearestNStep<IDX> {
    Descend {
        node_idx: IDX,
        split_dim: usize,
    },
    Visit {
        node_idx: usize,
        split_dim: usize,
        further_node_idx: IDX,
    },
}
