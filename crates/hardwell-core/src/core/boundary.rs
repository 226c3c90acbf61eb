use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

/// Boundary conditions seen by the pair kinematics.
///
/// A boundary folds separation vectors onto their minimum image and keeps
/// absolute positions inside the simulation cell.
pub trait Boundary: Debug + Send + Sync {
    /// Returns the minimum-image representative of the displacement `dr`.
    fn nearest_image(&self, dr: Vector3<f64>) -> Vector3<f64>;

    /// Maps a position back into the primary cell.
    fn wrap(&self, position: Point3<f64>) -> Point3<f64>;

    /// Volume of the cell, or `None` for an unbounded space.
    fn volume(&self) -> Option<f64>;
}

/// Unbounded space. Displacements are used as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OpenBoundary;

impl Boundary for OpenBoundary {
    #[inline]
    fn nearest_image(&self, dr: Vector3<f64>) -> Vector3<f64> {
        dr
    }

    #[inline]
    fn wrap(&self, position: Point3<f64>) -> Point3<f64> {
        position
    }

    fn volume(&self) -> Option<f64> {
        None
    }
}

/// Rectangular box periodic in all three directions, with its origin at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicBox {
    dimensions: Vector3<f64>,
}

impl PeriodicBox {
    /// Creates a periodic box, or `None` if any edge is not finite and positive.
    pub fn new(dimensions: Vector3<f64>) -> Option<Self> {
        if dimensions.iter().all(|&l| l.is_finite() && l > 0.0) {
            Some(Self { dimensions })
        } else {
            None
        }
    }

    pub fn cubic(edge: f64) -> Option<Self> {
        Self::new(Vector3::repeat(edge))
    }

    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }
}

impl Boundary for PeriodicBox {
    #[inline]
    fn nearest_image(&self, dr: Vector3<f64>) -> Vector3<f64> {
        dr.zip_map(&self.dimensions, |d, l| d - l * (d / l).round())
    }

    #[inline]
    fn wrap(&self, position: Point3<f64>) -> Point3<f64> {
        Point3::from(
            position
                .coords
                .zip_map(&self.dimensions, |x, l| x - l * (x / l).floor()),
        )
    }

    fn volume(&self) -> Option<f64> {
        Some(self.dimensions.product())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_boundary_is_identity() {
        let dr = Vector3::new(60.0, -70.0, 0.5);
        assert_eq!(OpenBoundary.nearest_image(dr), dr);
        assert_eq!(OpenBoundary.wrap(Point3::from(dr)), Point3::from(dr));
        assert_eq!(OpenBoundary.volume(), None);
    }

    #[test]
    fn periodic_box_folds_to_minimum_image() {
        let boundary = PeriodicBox::cubic(10.0).unwrap();
        let folded = boundary.nearest_image(Vector3::new(6.0, 3.0, -7.0));
        assert!((folded - Vector3::new(-4.0, 3.0, 3.0)).norm() < 1e-12);
    }

    #[test]
    fn periodic_box_folds_displacements_spanning_several_cells() {
        let boundary = PeriodicBox::new(Vector3::new(4.0, 5.0, 6.0)).unwrap();
        let folded = boundary.nearest_image(Vector3::new(9.0, -11.0, 13.0));
        assert!((folded - Vector3::new(1.0, -1.0, 1.0)).norm() < 1e-12);
        for (component, edge) in folded.iter().zip(boundary.dimensions().iter()) {
            assert!(component.abs() <= 0.5 * edge);
        }
    }

    #[test]
    fn periodic_box_wraps_positions_into_primary_cell() {
        let boundary = PeriodicBox::cubic(10.0).unwrap();
        let wrapped = boundary.wrap(Point3::new(-1.0, 10.5, 25.0));
        assert!((wrapped - Point3::new(9.0, 0.5, 5.0)).norm() < 1e-12);
    }

    #[test]
    fn periodic_box_reports_volume() {
        let boundary = PeriodicBox::new(Vector3::new(2.0, 3.0, 4.0)).unwrap();
        assert_eq!(boundary.volume(), Some(24.0));
    }

    #[test]
    fn periodic_box_rejects_degenerate_dimensions() {
        assert!(PeriodicBox::new(Vector3::new(1.0, 0.0, 1.0)).is_none());
        assert!(PeriodicBox::new(Vector3::new(1.0, f64::NAN, 1.0)).is_none());
        assert!(PeriodicBox::cubic(-3.0).is_none());
    }
}
