//! Renders query results as the plain text report written by the `kdknn`
//! binary.
//!
//! ```text
//! Result of Application of 1-Nearest Neighbor:
//! 1 Nearest Point is {1-2} at Distance: 1.41421
//!
//! Results of Application of K-Nearest Neighbors (K = 2):
//! 1 Nearest Point is {1-2} at Distance: 1.41421
//! 2 Nearest Point is {3-4} at Distance: 1.41421
//! ```

use az::Cast;
use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

use crate::distance::SquaredEuclidean;
use crate::kdtree::KdTree;
use crate::nearest_neighbour::NearestNeighbour;
use crate::types::{Axis, Content, Index};

const SIGNIFICANT_DIGITS: i32 = 6;

/// Formats `value` the way C's `printf("%g")` does: six significant digits,
/// trailing zeros removed, and exponent notation when the decimal exponent is
/// below -4 or at least 6.
///
/// # Examples
///
/// ```rust
/// use kdknn::report::format_distance;
///
/// assert_eq!(format_distance(2f64.sqrt()), "1.41421");
/// assert_eq!(format_distance(5.0), "5");
/// assert_eq!(format_distance(1234567.0), "1.23457e+06");
/// ```
pub fn format_distance(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // rounding to six digits can carry into the exponent, so read it back
    // from the rounded rendering rather than computing it from `value`
    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Displays a point as its co-ordinates joined with `-` inside braces,
/// e.g. `{1-2-3}`.
#[derive(Debug, Clone, Copy)]
pub struct PointDisplay<'a, A>(pub &'a [A]);

impl<A: Display> Display for PointDisplay<'_, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, coord) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, "-")?;
            }
            write!(f, "{coord}")?;
        }
        write!(f, "}}")
    }
}

fn write_neighbour<W, A, T>(
    out: &mut W,
    rank: usize,
    neighbour: &NearestNeighbour<A, T>,
) -> io::Result<()>
where
    W: Write,
    A: Axis + Display,
    T: Content,
{
    writeln!(
        out,
        "{} Nearest Point is {} at Distance: {}",
        rank,
        PointDisplay(&neighbour.point),
        format_distance(neighbour.euclidean_distance())
    )
}

/// Writes the 1-nearest-neighbour section, followed by a blank line.
pub fn write_nearest_one<W, A, T>(
    out: &mut W,
    nearest: Option<&NearestNeighbour<A, T>>,
) -> io::Result<()>
where
    W: Write,
    A: Axis + Display,
    T: Content,
{
    writeln!(out, "Result of Application of 1-Nearest Neighbor:")?;
    match nearest {
        Some(neighbour) => write_neighbour(out, 1, neighbour)?,
        None => writeln!(out, "No nearest neighbor found.")?,
    }
    writeln!(out)
}

/// Writes the k-nearest-neighbours section, one ranked line per neighbour in
/// the order given.
pub fn write_nearest_n<W, A, T>(
    out: &mut W,
    qty: usize,
    neighbours: &[NearestNeighbour<A, T>],
) -> io::Result<()>
where
    W: Write,
    A: Axis + Display,
    T: Content,
{
    writeln!(out, "Results of Application of K-Nearest Neighbors (K = {qty}):")?;
    for (idx, neighbour) in neighbours.iter().enumerate() {
        write_neighbour(out, idx + 1, neighbour)?;
    }
    Ok(())
}

/// Runs both queries for `query` against `tree` with the squared Euclidean
/// metric and writes the full report.
///
/// The two sections break ties differently. The 1-nearest-neighbour search
/// keeps the node highest on the search path among equally near points,
/// while the k-nearest-neighbour result set keeps whichever equally near point
/// it accepted first and never swaps it for another at the same distance.
/// Below, `{1-2}` and `{3-4}` are both at distance `sqrt(2)` from the query.
///
/// # Errors
///
/// Returns any error raised while writing to `out`.
///
/// # Examples
///
/// ```rust
/// use kdknn::KdTree;
/// use kdknn::report::write_report;
///
/// let tree: KdTree<i64> = KdTree::from_points(2, &[[1i64, 2], [3, 4], [5, 1]]);
/// let mut out = Vec::new();
///
/// write_report(&mut out, &tree, &[2, 3], 1).unwrap();
///
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "Result of Application of 1-Nearest Neighbor:\n\
///      1 Nearest Point is {1-2} at Distance: 1.41421\n\
///      \n\
///      Results of Application of K-Nearest Neighbors (K = 1):\n\
///      1 Nearest Point is {3-4} at Distance: 1.41421\n"
/// );
/// ```
pub fn write_report<W, A, T, IDX>(
    out: &mut W,
    tree: &KdTree<A, T, IDX>,
    query: &[A],
    qty: usize,
) -> io::Result<()>
where
    W: Write,
    A: Axis + Display,
    T: Content,
    IDX: Index,
    usize: Cast<IDX>,
{
    let nearest = tree.nearest_one::<SquaredEuclidean>(query);
    write_nearest_one(out, nearest.as_ref())?;

    let neighbours = tree.nearest_n::<SquaredEuclidean>(query, qty);
    write_nearest_n(out, qty, &neighbours)
}
