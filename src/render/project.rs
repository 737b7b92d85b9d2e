use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::{RenderError, Result};
use crate::math::interpolate::{bilinear_normal, polygon_normal};
use crate::math::{Point2, Point3, Vector3};
use crate::patch::{Dimension, Patch, PatchStore};

use super::{RenderFlags, ViewTransform};

/// One drawable polygon of the scene.
///
/// For 2D patches a cell is one sub-cell of the sub-grid; for 3D patches it
/// is one sub-cell face on the patch boundary; for 1D patches it is one
/// segment. Vertices are stored in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Projected corners in drawing order.
    pub vertices: Vec<Point2>,
    /// Depth of each corner.
    pub depths: Vec<f64>,
    /// Representative depth: the mean corner depth, never `-0.0`.
    pub depth: f64,
    /// Mean of the colour field over the corners.
    pub color_value: f64,
    /// Light intensity in `[0, 1]`; 1 without lighting.
    pub intensity: f64,
    /// Position of the owning patch in the store.
    pub patch_order: usize,
    /// Index of the cell within its patch.
    pub index: usize,
}

/// Projects every patch of a store into drawable cells.
pub struct ProjectPatches<'a> {
    flags: &'a RenderFlags,
    view: ViewTransform,
}

impl<'a> ProjectPatches<'a> {
    /// Creates a new `ProjectPatches` operation.
    #[must_use]
    pub fn new(flags: &'a RenderFlags) -> Self {
        Self {
            flags,
            view: ViewTransform::from_angles(flags.azimuth, flags.elevation),
        }
    }

    /// Executes the projection, returning cells grouped by patch in store order.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidFieldIndex`] if the height or colour field
    /// index is not below the number of fields.
    #[instrument(skip_all, fields(patches = store.len(), parallel = self.flags.parallel))]
    pub fn execute(&self, store: &PatchStore) -> Result<Vec<Cell>> {
        let n_fields = store.names().len();
        check_field_index("height_vector", self.flags.height_vector, n_fields)?;
        check_field_index("color_vector", self.flags.color_vector, n_fields)?;
        debug!(
            height = ?store.names().get(self.flags.height_vector),
            color = ?store.names().get(self.flags.color_vector),
            vectors = store.vectors().len(),
            "fields selected"
        );

        let patches: Vec<&Patch> = store.iter().map(|(_, p)| p).collect();
        let per_patch: Vec<Vec<Cell>> = if self.flags.parallel {
            patches
                .par_iter()
                .enumerate()
                .map(|(order, patch)| self.project_patch(patch, order))
                .collect()
        } else {
            patches
                .iter()
                .enumerate()
                .map(|(order, patch)| self.project_patch(patch, order))
                .collect()
        };

        let cells: Vec<Cell> = per_patch.into_iter().flatten().collect();
        debug!(cells = cells.len(), "patches projected");
        Ok(cells)
    }

    fn project_patch(&self, patch: &Patch, order: usize) -> Vec<Cell> {
        let heights = patch.field(self.flags.height_vector);
        let colors = patch.field(self.flags.color_vector);

        let lifted: Vec<Point3> = (0..patch.n_points())
            .map(|k| {
                let offset = height_direction(patch, k) * (heights[k] * self.flags.z_scaling);
                patch.point(k) + offset
            })
            .collect();
        let projected: Vec<(Point2, f64)> = lifted.iter().map(|p| self.view.project(p)).collect();

        cell_corners(patch)
            .into_iter()
            .enumerate()
            .map(|(index, corners)| {
                let n = corners.len();
                #[allow(clippy::cast_precision_loss)]
                let inv = 1.0 / n as f64;
                let depths: Vec<f64> = corners.iter().map(|&k| projected[k].1).collect();
                Cell {
                    vertices: corners.iter().map(|&k| projected[k].0).collect(),
                    depth: depths.iter().sum::<f64>() * inv + 0.0,
                    depths,
                    color_value: corners.iter().map(|&k| colors[k]).sum::<f64>() * inv,
                    intensity: self.intensity(&corners, &lifted),
                    patch_order: order,
                    index,
                }
            })
            .collect()
    }

    fn intensity(&self, corners: &[usize], lifted: &[Point3]) -> f64 {
        let Some(light) = self.flags.light_direction else {
            return 1.0;
        };
        let light = Vector3::from(light).normalize();
        let points: Vec<Point3> = corners.iter().map(|&k| lifted[k]).collect();
        let Some(normal) = polygon_normal(&points) else {
            return self.flags.ambient;
        };
        let ambient = self.flags.ambient;
        ambient + (1.0 - ambient) * normal.dot(&light).abs()
    }
}

fn check_field_index(which: &'static str, index: usize, n_fields: usize) -> Result<()> {
    if index >= n_fields {
        return Err(RenderError::InvalidFieldIndex {
            which,
            index,
            n_fields,
        }
        .into());
    }
    Ok(())
}

/// Direction along which the height field displaces sub-grid point `k`.
fn height_direction(patch: &Patch, k: usize) -> Vector3 {
    match (patch.dim, patch.spacedim) {
        (Dimension::Three, _) => Vector3::zeros(),
        (Dimension::Two, Dimension::Three) => {
            let n = patch.points_per_axis();
            #[allow(clippy::cast_precision_loss)]
            let step = 1.0 / patch.n_subdivisions as f64;
            #[allow(clippy::cast_precision_loss)]
            let (xi, eta) = ((k % n) as f64 * step, (k / n) as f64 * step);
            bilinear_normal(&patch.corners, xi, eta).unwrap_or_else(Vector3::z)
        }
        _ => Vector3::z(),
    }
}

/// Sub-grid indices of the corners of every cell, in drawing order.
fn cell_corners(patch: &Patch) -> Vec<Vec<usize>> {
    let nsub = patch.n_subdivisions;
    let n = patch.points_per_axis();
    let lin = |i: usize, j: usize, l: usize| i + n * (j + n * l);

    match patch.dim {
        Dimension::One => (0..nsub).map(|i| vec![i, i + 1]).collect(),
        Dimension::Two => {
            let mut cells = Vec::with_capacity(nsub * nsub);
            for j in 0..nsub {
                for i in 0..nsub {
                    cells.push(vec![
                        lin(i, j, 0),
                        lin(i + 1, j, 0),
                        lin(i + 1, j + 1, 0),
                        lin(i, j + 1, 0),
                    ]);
                }
            }
            cells
        }
        Dimension::Three => {
            let mut cells = Vec::with_capacity(6 * nsub * nsub);
            for axis in 0..3 {
                let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
                for side in [0, nsub] {
                    for v in 0..nsub {
                        for u in 0..nsub {
                            let at = |du: usize, dv: usize| {
                                let mut ijk = [0; 3];
                                ijk[axis] = side;
                                ijk[a] = u + du;
                                ijk[b] = v + dv;
                                lin(ijk[0], ijk[1], ijk[2])
                            };
                            cells.push(vec![at(0, 0), at(1, 0), at(1, 1), at(0, 1)]);
                        }
                    }
                }
            }
            cells
        }
    }
}
