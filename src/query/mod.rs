//! Nearest-neighbour and k-nearest-neighbour queries over a [`KdTree`](crate::KdTree).

pub mod nearest_n;
pub mod nearest_one;
