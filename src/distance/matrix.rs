//! Dense distance matrix.

use crate::error::InvalidCoordinates;
use crate::geometry::{self, Coordinates};

/// A dense n×n matrix of great-circle distances in km, row-major.
///
/// # Examples
///
/// ```
/// use fleet_routing::distance::DistanceMatrix;
/// use fleet_routing::geometry::Coordinates;
///
/// let points = [
///     Coordinates::new(10.0, 106.0),
///     Coordinates::new(10.0, 106.1),
///     Coordinates::new(10.5, 106.0),
/// ];
/// let dm = DistanceMatrix::from_coordinates(&points).unwrap();
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.get(0, 0), 0.0);
/// assert_eq!(dm.get(0, 2), dm.get(2, 0));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes haversine distances between every pair of points.
    ///
    /// Each pair is computed once and mirrored.
    pub fn from_coordinates(points: &[Coordinates]) -> Result<Self, InvalidCoordinates> {
        let n = points.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            points[i].validate()?;
            for j in (i + 1)..n {
                let d = geometry::distance(&points[i], &points[j])?;
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        Ok(dm)
    }

    /// Distance in km from node `from` to node `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of nodes in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}
