use crate::math::{Matrix3, Point2, Point3, Vector3};

/// Orthographic view onto the scene from a direction given by two angles.
///
/// The rows of the matrix are the screen right axis, the screen up axis and
/// the viewing direction (pointing away from the viewer), so the third
/// coordinate of a transformed point grows with its distance from the viewer.
#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    matrix: Matrix3,
}

impl ViewTransform {
    /// Creates the view for `azimuth` (around +z) and `elevation` (above the
    /// xy plane), both in degrees.
    #[must_use]
    pub fn from_angles(azimuth: f64, elevation: f64) -> Self {
        let (sa, ca) = azimuth.to_radians().sin_cos();
        let (se, ce) = elevation.to_radians().sin_cos();

        let right = Vector3::new(-sa, ca, 0.0);
        let up = Vector3::new(-se * ca, -se * sa, ce);
        let toward_viewer = Vector3::new(ce * ca, ce * sa, se);

        Self {
            matrix: Matrix3::from_rows(&[
                right.transpose(),
                up.transpose(),
                (-toward_viewer).transpose(),
            ]),
        }
    }

    /// Projects `p` onto the drawing plane, returning the 2D point and its depth.
    #[must_use]
    pub fn project(&self, p: &Point3) -> (Point2, f64) {
        let v = self.matrix * p.coords;
        (Point2::new(v.x, v.y), v.z)
    }
}
