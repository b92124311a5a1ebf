#![warn(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]

//! # kdknn
//!
//! A small k-d tree over points with signed integer co-ordinates, answering
//! exact nearest-neighbour and k-nearest-neighbour queries.
//!
//! The dimension of the points is chosen at runtime. Points are inserted one
//! at a time and never rebalanced, so the shape of the tree follows insertion
//! order. Distances are computed in a type wider than the co-ordinates, and
//! stay exact while `D * range^2` fits in it. For `i32` co-ordinates, whose
//! distances are `i128`, that holds for any practical dimension.
//!
//! ## Usage
//! ```rust
//! use kdknn::KdTree;
//! use kdknn::distance::SquaredEuclidean;
//!
//! let mut kdtree: KdTree<i64> = KdTree::new(2);
//!
//! kdtree.add(&[0, 0], 0);
//! kdtree.add(&[1, 1], 1);
//! kdtree.add(&[2, 2], 2);
//! kdtree.add(&[3, 3], 3);
//!
//! assert_eq!(kdtree.size(), 4);
//!
//! let nearest = kdtree.nearest_one::<SquaredEuclidean>(&[0, 0]).unwrap();
//! assert_eq!((nearest.distance, nearest.item), (0, 0));
//!
//! let neighbours: Vec<(i128, usize)> = kdtree
//!     .nearest_n::<SquaredEuclidean>(&[0, 0], 3)
//!     .into_iter()
//!     .map(Into::into)
//!     .collect();
//! assert_eq!(neighbours, vec![(0, 0), (2, 1), (8, 2)]);
//! ```
//!
//! ## Reading problems and writing reports
//!
//! The [`input`] and [`report`] modules implement the text formats used by
//! the `kdknn` binary: a whitespace-delimited problem description in, and a
//! ranked list of neighbours with their Euclidean distances out.
//!
//! ```rust
//! use kdknn::input::Problem;
//! use kdknn::report::write_report;
//!
//! let problem = Problem::parse("2 2 3\n2 3\n1 2\n3 4\n5 1\n").unwrap();
//! let tree = problem.build_tree();
//!
//! let mut out = Vec::new();
//! write_report(&mut out, &tree, &problem.query, problem.qty).unwrap();
//!
//! assert!(String::from_utf8(out).unwrap().ends_with("2 Nearest Point is {3-4} at Distance: 1.41421\n"));
//! ```

mod construction;
pub mod distance;
pub mod distance_metric;
pub mod input;
pub mod kdtree;
pub mod nearest_neighbour;
#[doc(hidden)]
pub mod query;
pub mod report;
pub mod result_collection;
pub mod types;

pub use crate::kdtree::KdTree;
pub use crate::nearest_neighbour::NearestNeighbour;
