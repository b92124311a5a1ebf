//! Reading a query problem from the whitespace-delimited text format:
//!
//! 1. the dimension `D` of every point
//! 2. the number of neighbours `k` to find
//! 3. the number of data points `n`
//! 4. `D` integers: the query point
//! 5. `n` rows of `D` integers: the data points, in insertion order
//!
//! Co-ordinates must fit an `i32`. Distances between them are computed in
//! `i128`, which holds the squared distance of any two such points exactly.
//! Any tokens after the last data point are ignored.

use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::{FromStr, SplitAsciiWhitespace};

use crate::kdtree::KdTree;

#[cfg(feature = "tracing")]
use tracing::{event, Level};

/// Identifies which value of the input a token was expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// the dimension of the points
    Dimension,
    /// the number of neighbours to find
    NeighbourCount,
    /// the number of data points
    PointCount,
    /// a co-ordinate of the query point
    QueryCoordinate {
        /// zero-based axis
        axis: usize,
    },
    /// a co-ordinate of a data point
    PointCoordinate {
        /// zero-based position of the point in the data
        point: usize,
        /// zero-based axis
        axis: usize,
    },
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Field::Dimension => write!(f, "the dimension"),
            Field::NeighbourCount => write!(f, "the number of neighbours"),
            Field::PointCount => write!(f, "the number of points"),
            Field::QueryCoordinate { axis } => {
                write!(f, "co-ordinate {} of the query point", axis + 1)
            }
            Field::PointCoordinate { point, axis } => {
                write!(f, "co-ordinate {} of point {}", axis + 1, point + 1)
            }
        }
    }
}

/// Errors raised while reading a query problem.
#[derive(Debug)]
pub enum InputError {
    /// the input file could not be read
    Io {
        /// the path that was being read
        path: PathBuf,
        /// the underlying error
        source: std::io::Error,
    },
    /// the input ended before a value it declares
    MissingToken {
        /// the value that was expected next
        expected: Field,
    },
    /// a token is not an integer, or does not fit the value it holds
    /// (co-ordinates must fit an `i32`)
    InvalidToken {
        /// the offending token
        token: String,
        /// the value the token should hold
        expected: Field,
    },
    /// the declared dimension is below one
    InvalidDimension(i64),
    /// the declared number of neighbours is negative
    InvalidNeighbourCount(i64),
    /// the declared number of points is negative
    InvalidPointCount(i64),
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Io { path, .. } => write!(f, "could not read {}", path.display()),
            InputError::MissingToken { expected } => {
                write!(f, "input ended while reading {expected}")
            }
            InputError::InvalidToken { token, expected } => {
                write!(f, "expected an integer in range for {expected}, found {token:?}")
            }
            InputError::InvalidDimension(dims) => {
                write!(f, "the dimension must be at least 1, found {dims}")
            }
            InputError::InvalidNeighbourCount(qty) => {
                write!(f, "the number of neighbours cannot be negative, found {qty}")
            }
            InputError::InvalidPointCount(count) => {
                write!(f, "the number of points cannot be negative, found {count}")
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A query point together with the data set to search and the number of
/// neighbours wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// dimension shared by the query and every data point
    pub dims: usize,
    /// number of neighbours to find
    pub qty: usize,
    /// the query point
    pub query: Vec<i32>,
    /// the data points, in the order they are to be inserted
    pub points: Vec<Vec<i32>>,
}

impl Problem {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Io`] if the file cannot be read, or any of the
    /// parse errors of [`Problem::parse`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    /// Parses a problem from its text form.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if a token is missing or is not an integer
    /// that fits its field, or if the header values are out of range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdknn::input::Problem;
    ///
    /// let problem = Problem::parse("2 2 3\n2 3\n1 2\n3 4\n5 1\n").unwrap();
    ///
    /// assert_eq!(problem.dims, 2);
    /// assert_eq!(problem.qty, 2);
    /// assert_eq!(problem.query, vec![2, 3]);
    /// assert_eq!(problem.points, vec![vec![1, 2], vec![3, 4], vec![5, 1]]);
    /// ```
    pub fn parse(source: &str) -> Result<Self, InputError> {
        let mut tokens = Tokens::new(source);

        let dims: i64 = tokens.next_value(Field::Dimension)?;
        let dims = usize::try_from(dims)
            .ok()
            .filter(|&dims| dims > 0)
            .ok_or(InputError::InvalidDimension(dims))?;

        let qty: i64 = tokens.next_value(Field::NeighbourCount)?;
        let qty = usize::try_from(qty).map_err(|_| InputError::InvalidNeighbourCount(qty))?;

        let count: i64 = tokens.next_value(Field::PointCount)?;
        let count = usize::try_from(count).map_err(|_| InputError::InvalidPointCount(count))?;

        let query = (0..dims)
            .map(|axis| tokens.next_value(Field::QueryCoordinate { axis }))
            .collect::<Result<Vec<_>, _>>()?;

        // the declared count is untrusted until the rows are actually read
        let mut points = Vec::with_capacity(count.min(1 << 16));
        for point in 0..count {
            let row = (0..dims)
                .map(|axis| tokens.next_value(Field::PointCoordinate { point, axis }))
                .collect::<Result<Vec<_>, _>>()?;
            points.push(row);
        }

        let trailing = tokens.remaining();
        #[cfg(feature = "tracing")]
        {
            if trailing > 0 {
                event!(Level::WARN, trailing, "ignoring tokens after the last point");
            }
            event!(Level::DEBUG, dims, qty, points = count, "parsed input");
        }
        #[cfg(not(feature = "tracing"))]
        let _ = trailing;

        Ok(Self {
            dims,
            qty,
            query,
            points,
        })
    }

    /// Builds a tree holding the data points, in order, each stored with its
    /// zero-based position in the data as its item.
    pub fn build_tree(&self) -> KdTree<i32> {
        KdTree::from_points(self.dims, &self.points)
    }
}

struct Tokens<'a> {
    iter: SplitAsciiWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            iter: source.split_ascii_whitespace(),
        }
    }

    fn next_value<N: FromStr>(&mut self, expected: Field) -> Result<N, InputError> {
        let token = self
            .iter
            .next()
            .ok_or(InputError::MissingToken { expected })?;
        token.parse().map_err(|_| InputError::InvalidToken {
            token: token.to_string(),
            expected,
        })
    }

    fn remaining(self) -> usize {
        self.iter.count()
    }
}
