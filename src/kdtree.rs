//! Integer k-d tree, for points whose co-ordinates are signed integers and whose
//! dimension is only known at runtime.

use az::{Az, Cast};

use crate::nearest_neighbour::NearestNeighbour;
use crate::types::{Axis, Content, Index};

/// Integer k-d tree
///
/// Each node holds exactly one point. The splitting axis of a node is its depth
/// modulo the dimension of the tree: points whose co-ordinate on that axis is
/// strictly less than the node's go left, all others (ties included) go right.
///
/// Nodes live in an arena in insertion order, so the first point added is the
/// root. Co-ordinates are kept in one flat buffer, `dims` values per node.
///
/// * `A` - the co-ordinate type, see [`Axis`]
/// * `T` - the item stored alongside each point, see [`Content`]
/// * `IDX` - the type used to link nodes, see [`Index`]
#[derive(Clone, Debug, PartialEq)]
pub struct KdTree<A, T = usize, IDX = u32> {
    pub(crate) dims: usize,
    pub(crate) points: Vec<A>,
    pub(crate) items: Vec<T>,
    pub(crate) nodes: Vec<Node<IDX>>,
}

#[doc(hidden)]
#[derive(Clone, Debug, PartialEq)]
pub struct Node<IDX> {
    pub(crate) left: IDX,
    pub(crate) right: IDX,
}

impl<IDX: Index> Node<IDX> {
    pub(crate) fn new() -> Self {
        Self {
            left: IDX::absent(),
            right: IDX::absent(),
        }
    }
}

impl<A, T, IDX> KdTree<A, T, IDX>
where
    A: Axis,
    T: Content,
    IDX: Index,
    usize: Cast<IDX>,
{
    /// Creates a new, empty tree for points of `dims` dimensions.
    ///
    /// # Panics
    ///
    /// Panics if `dims` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdknn::KdTree;
    ///
    /// let mut tree: KdTree<i64> = KdTree::new(3);
    ///
    /// tree.add(&[1, 2, 5], 100);
    ///
    /// assert_eq!(tree.size(), 1);
    /// ```
    #[inline]
    pub fn new(dims: usize) -> Self {
        KdTree::with_capacity(dims, 0)
    }

    /// Creates a new, empty tree and reserves capacity for `capacity` points.
    ///
    /// # Panics
    ///
    /// Panics if `dims` is zero, or if `capacity` exceeds what `IDX` can address.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdknn::KdTree;
    ///
    /// let mut tree: KdTree<i32, usize, u16> = KdTree::with_capacity(2, 1_000);
    ///
    /// tree.add(&[1, 2], 7);
    ///
    /// assert_eq!(tree.size(), 1);
    /// ```
    #[inline]
    pub fn with_capacity(dims: usize, capacity: usize) -> Self {
        assert!(dims > 0, "a k-d tree needs at least one dimension");
        assert!(
            capacity <= <IDX as Index>::capacity(),
            "capacity {capacity} exceeds the node index range"
        );
        Self {
            dims,
            points: Vec::with_capacity(capacity.saturating_mul(dims)),
            items: Vec::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Returns the current number of points stored in the tree
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdknn::KdTree;
    ///
    /// let mut tree: KdTree<i64> = KdTree::new(3);
    ///
    /// tree.add(&[1, 2, 5], 100);
    /// tree.add(&[1, 2, 5], 101);
    ///
    /// assert_eq!(tree.size(), 2);
    /// ```
    #[inline]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The dimension of the points held in the tree.
    #[inline]
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Returns the number of nodes on the longest root-to-leaf path, or zero
    /// for an empty tree.
    ///
    /// Trees are never rebalanced, so this depends on insertion order: points
    /// added in sorted order produce a tree as deep as it is large.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdknn::KdTree;
    ///
    /// let balanced: KdTree<i64> = KdTree::from_points(1, &[[2i64], [1], [3]]);
    /// let degenerate: KdTree<i64> = KdTree::from_points(1, &[[1i64], [2], [3]]);
    ///
    /// assert_eq!(balanced.depth(), 2);
    /// assert_eq!(degenerate.depth(), 3);
    /// ```
    pub fn depth(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let mut deepest = 0;
        let mut stack = vec![(0usize, 1usize)];
        while let Some((node_idx, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[node_idx];
            for child in [node.left, node.right] {
                if child != IDX::absent() {
                    stack.push((child.az::<usize>(), depth + 1));
                }
            }
        }
        deepest
    }

    /// Iterate over all `(item, point)` tuples in insertion order.
    ///
    /// ```rust
    /// use kdknn::KdTree;
    ///
    /// let mut tree: KdTree<i64> = KdTree::new(3);
    /// tree.add(&[1, 2, 3], 10);
    /// tree.add(&[4, 5, 6], 11);
    ///
    /// let pairs: Vec<_> = tree.iter().collect();
    /// assert_eq!(pairs, vec![(10, &[1i64, 2, 3][..]), (11, &[4i64, 5, 6][..])]);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = (T, &[A])> + '_ {
        self.items
            .iter()
            .copied()
            .zip(self.points.chunks_exact(self.dims))
    }

    #[inline]
    pub(crate) fn point(&self, node_idx: usize) -> &[A] {
        &self.points[node_idx * self.dims..(node_idx + 1) * self.dims]
    }

    pub(crate) fn root_index() -> IDX {
        IDX::zero()
    }

    pub(crate) fn neighbour_at(
        &self,
        node_idx: usize,
        distance: A::Distance,
    ) -> NearestNeighbour<A, T> {
        NearestNeighbour {
            distance,
            point: self.point(node_idx).to_vec(),
            item: self.items[node_idx],
        }
    }
}

impl<A, IDX> KdTree<A, usize, IDX>
where
    A: Axis,
    IDX: Index,
    usize: Cast<IDX>,
{
    /// Builds a tree from a list of points, inserting them in order and
    /// storing each point's position in the list as its item.
    ///
    /// # Panics
    ///
    /// Panics if `dims` is zero or any point does not have `dims` co-ordinates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdknn::KdTree;
    ///
    /// let tree: KdTree<i64> = KdTree::from_points(2, &[vec![1i64, 2], vec![3, 4], vec![5, 1]]);
    ///
    /// assert_eq!(tree.size(), 3);
    /// assert_eq!(tree.iter().next(), Some((0, &[1i64, 2][..])));
    /// ```
    pub fn from_points<P: AsRef<[A]>>(dims: usize, points: &[P]) -> Self {
        let mut tree = KdTree::with_capacity(dims, points.len());
        points
            .iter()
            .enumerate()
            .for_each(|(idx, point)| tree.add(point.as_ref(), idx));

        tree
    }
}
