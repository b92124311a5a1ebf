use az::{Az, Cast};
use std::ops::Rem;

use crate::kdtree::{KdTree, Node};
use crate::types::{Axis, Content, Index};

impl<A: Axis, T: Content, IDX: Index> KdTree<A, T, IDX>
where
    usize: Cast<IDX>,
{
    /// Adds a point to the tree, along with the item to return for it.
    ///
    /// The point descends from the root, comparing the co-ordinate on axis
    /// `depth % dims` at each node: strictly less goes left, anything else goes
    /// right. It becomes a new leaf where it falls off the tree. Duplicate
    /// points are stored as separate entries.
    ///
    /// # Panics
    ///
    /// Panics if `point` does not have [`dims`](KdTree::dims) co-ordinates, or
    /// if the tree already holds as many points as `IDX` can address.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdknn::KdTree;
    ///
    /// let mut tree: KdTree<i64> = KdTree::new(2);
    ///
    /// tree.add(&[5, 5], 0);
    /// tree.add(&[5, 1], 1);
    /// tree.add(&[4, 9], 2);
    ///
    /// assert_eq!(tree.size(), 3);
    /// ```
    #[inline]
    pub fn add(&mut self, point: &[A], item: T) {
        assert_eq!(
            point.len(),
            self.dims,
            "point has {} co-ordinates but the tree has {} dimensions",
            point.len(),
            self.dims
        );
        assert!(
            self.nodes.len() < <IDX as Index>::capacity(),
            "tree is full: {} points is the most the node index type can address",
            self.nodes.len()
        );

        let new_idx: IDX = self.nodes.len().az::<IDX>();

        if !self.is_empty() {
            let mut curr_idx = KdTree::<A, T, IDX>::root_index();
            let mut split_dim = 0;

            loop {
                let node_point = self.point(curr_idx.az::<usize>());
                let go_left = point[split_dim] < node_point[split_dim];
                let node = &mut self.nodes[curr_idx.az::<usize>()];
                let child = if go_left {
                    &mut node.left
                } else {
                    &mut node.right
                };

                if *child == IDX::absent() {
                    *child = new_idx;
                    break;
                }
                curr_idx = *child;
                split_dim = (split_dim + 1).rem(self.dims);
            }
        }

        self.points.extend_from_slice(point);
        self.items.push(item);
        self.nodes.push(Node::new());
    }
}

#[cfg(test)]
mod tests {
    use crate::kdtree::KdTree;
    use rand::Rng;

    fn assert_partitioned(tree: &KdTree<i64>, node_idx: u32, split_dim: usize) {
        let node = &tree.nodes[node_idx as usize];
        let split_val = tree.point(node_idx as usize)[split_dim];
        let next_dim = (split_dim + 1) % tree.dims();

        for (child, goes_left) in [(node.left, true), (node.right, false)] {
            if child == u32::MAX {
                continue;
            }
            for idx in subtree(tree, child) {
                let val = tree.point(idx as usize)[split_dim];
                if goes_left {
                    assert!(val < split_val, "{val} should be left of {split_val}");
                } else {
                    assert!(val >= split_val, "{val} should be right of {split_val}");
                }
            }
            assert_partitioned(tree, child, next_dim);
        }
    }

    fn subtree(tree: &KdTree<i64>, root: u32) -> Vec<u32> {
        let mut found = vec![];
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            found.push(idx);
            let node = &tree.nodes[idx as usize];
            stack.extend([node.left, node.right].into_iter().filter(|&c| c != u32::MAX));
        }
        found
    }

    #[test]
    fn can_add_an_item() {
        let mut tree: KdTree<i64> = KdTree::new(4);

        tree.add(&[1, 2, 3, 4], 123);

        assert_eq!(tree.size(), 1);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn first_point_added_becomes_the_root() {
        let tree: KdTree<i64> = KdTree::from_points(2, &[[3i64, 3], [1, 8], [7, 0]]);

        assert_eq!(tree.point(0), &[3, 3]);
        assert_eq!(tree.nodes[0].left, 1);
        assert_eq!(tree.nodes[0].right, 2);
    }

    #[test]
    fn equal_split_values_go_right() {
        let tree: KdTree<i64> = KdTree::from_points(2, &[[5i64, 0], [5, 9], [5, -9]]);

        // [5, 9] ties with the root on x and goes right; [5, -9] also goes right,
        // then splits on y below [5, 9]
        assert_eq!(tree.nodes[0].left, u32::MAX);
        assert_eq!(tree.nodes[0].right, 1);
        assert_eq!(tree.nodes[1].left, 2);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn axis_cycles_with_depth() {
        let tree: KdTree<i64> =
            KdTree::from_points(3, &[[0i64, 0, 0], [1, 0, 0], [2, -1, 0], [3, 1, -1]]);

        // root splits on x, node 1 on y, node 2 on z
        assert_eq!(tree.nodes[0].right, 1);
        assert_eq!(tree.nodes[1].left, 2);
        assert_eq!(tree.nodes[1].right, 3);
        assert_eq!(tree.nodes[2].left, u32::MAX);
    }

    #[test]
    fn duplicates_are_kept() {
        let tree: KdTree<i64> = KdTree::from_points(2, &[[1i64, 1], [1, 1], [1, 1]]);

        assert_eq!(tree.size(), 3);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    #[should_panic(expected = "point has 3 co-ordinates but the tree has 2 dimensions")]
    fn adding_a_point_of_the_wrong_dimension_panics() {
        let mut tree: KdTree<i64> = KdTree::new(2);
        tree.add(&[1, 2, 3], 0);
    }

    #[test]
    fn random_trees_satisfy_the_partition_invariant() {
        let mut rng = rand::rng();
        for dims in 1..=4 {
            let points: Vec<Vec<i64>> = (0..500)
                .map(|_| (0..dims).map(|_| rng.random_range(-20..20)).collect())
                .collect();
            let tree: KdTree<i64> = KdTree::from_points(dims, &points);

            assert_eq!(tree.size(), 500);
            assert_partitioned(&tree, 0, 0);
        }
    }
}
