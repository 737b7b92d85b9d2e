//! Multilinear maps over the corners of a unit hypercube.
//!
//! Corners are numbered lexicographically with the x axis running fastest,
//! so bit `a` of a corner index tells whether the corner sits at the upper
//! end of axis `a`.

use super::{Point3, Vector3, TOLERANCE};

/// Evaluates the multilinear interpolant of `corners` at local coordinates `xi`.
///
/// `corners` must hold `2^xi.len()` points.
#[must_use]
pub fn multilinear(corners: &[Point3], xi: &[f64]) -> Point3 {
    debug_assert_eq!(corners.len(), 1 << xi.len());
    let mut acc = Vector3::zeros();
    for (v, corner) in corners.iter().enumerate() {
        let weight: f64 = xi
            .iter()
            .enumerate()
            .map(|(axis, &t)| if v & (1 << axis) == 0 { 1.0 - t } else { t })
            .product();
        acc += corner.coords * weight;
    }
    Point3::from(acc)
}

/// Unit normal of the bilinear surface spanned by four corners at `(xi, eta)`.
///
/// Returns `None` where the surface is degenerate (parallel tangents).
#[must_use]
pub fn bilinear_normal(corners: &[Point3], xi: f64, eta: f64) -> Option<Vector3> {
    debug_assert_eq!(corners.len(), 4);
    let d_xi = (corners[1] - corners[0]) * (1.0 - eta) + (corners[3] - corners[2]) * eta;
    let d_eta = (corners[2] - corners[0]) * (1.0 - xi) + (corners[3] - corners[1]) * xi;
    let n = d_xi.cross(&d_eta);
    let len = n.norm();
    (len > TOLERANCE).then(|| n / len)
}

/// Unit normal of a (possibly non-planar) closed polygon by Newell's method.
#[must_use]
pub fn polygon_normal(points: &[Point3]) -> Option<Vector3> {
    if points.len() < 3 {
        return None;
    }
    let mut n = Vector3::zeros();
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    let len = n.norm();
    (len > TOLERANCE).then(|| n / len)
}
