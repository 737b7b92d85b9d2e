//! Reference patch producers.
//!
//! These build the inputs that the rendering scenarios are checked against:
//! repeated unit hypercubes carrying their own sub-grid coordinates, and a
//! continuous tiling of the unit hypercube sampling a cut-off bump.

use crate::error::{PatchError, Result};
use crate::math::{Point3, TOLERANCE};

use super::{Dimension, FieldNames, Patch, PatchId, PatchStore};

/// Creates `n_patches` translated copies of the unit hypercube.
///
/// Patch `p` has its corners at `p + e` for the unit offsets `e`; axes beyond
/// the patch dimension are lifted by the corner number, which warps
/// embedded patches out of their plane. Each patch carries five fields:
/// the four local sub-grid coordinates `x1..x4` and the sample index `i`.
pub struct RepeatedHypercube {
    dim: Dimension,
    spacedim: Dimension,
    n_patches: usize,
    n_subdivisions: usize,
}

impl RepeatedHypercube {
    /// Creates a new `RepeatedHypercube` operation.
    #[must_use]
    pub fn new(
        dim: Dimension,
        spacedim: Dimension,
        n_patches: usize,
        n_subdivisions: usize,
    ) -> Self {
        Self {
            dim,
            spacedim,
            n_patches,
            n_subdivisions,
        }
    }

    /// The field names the generated patches carry.
    #[must_use]
    pub fn field_names() -> FieldNames {
        FieldNames::new(["x1", "x2", "x3", "x4", "i"])
    }

    /// Builds the patches without inserting them anywhere.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn patches(&self) -> Vec<Patch> {
        let dim = self.dim.get();
        let nsub = self.n_subdivisions;
        let n = nsub + 1;
        (0..self.n_patches)
            .map(|p| {
                let corners: Vec<Point3> = (0..self.dim.n_corners())
                    .map(|v| {
                        let mut c = Point3::origin();
                        for d in 0..self.spacedim.get() {
                            let unit = if d < dim { (v >> d) & 1 } else { v };
                            c[d] = (p + unit) as f64;
                        }
                        c
                    })
                    .collect();

                let mut patch = Patch::new(self.dim, self.spacedim, corners, nsub, Vec::new())
                    .with_patch_index(p);
                let n_points = patch.n_points();
                let mut data = vec![0.0; 5 * n_points];
                for k in 0..n_points {
                    let mut rest = k;
                    for axis in 0..dim {
                        data[axis * n_points + k] = (rest % n) as f64 / nsub as f64;
                        rest /= n;
                    }
                    data[4 * n_points + k] = k as f64;
                }

                patch.data = data;
                patch
            })
            .collect()
    }

    /// Executes the operation, inserting the patches into `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if `store` does not carry exactly the five fields of
    /// [`RepeatedHypercube::field_names`], or if the dimensions are inconsistent.
    pub fn execute(&self, store: &mut PatchStore) -> Result<Vec<PatchId>> {
        if store.names() != &Self::field_names() {
            return Err(PatchError::FieldMismatch(
                "store must carry the fields x1, x2, x3, x4, i".to_owned(),
            )
            .into());
        }
        store.extend(self.patches())
    }
}

/// Tiles the unit hypercube with `n_cells` patches per axis, each with
/// `n_subdivisions` sub-cells per axis, sampling one continuous field
/// `CutOff`: a C∞ bump of radius 0.5 centred in the domain.
pub struct ContinuousPatches {
    dim: Dimension,
    n_cells: usize,
    n_subdivisions: usize,
}

impl ContinuousPatches {
    /// Creates a new `ContinuousPatches` operation.
    #[must_use]
    pub fn new(dim: Dimension, n_cells: usize, n_subdivisions: usize) -> Self {
        Self {
            dim,
            n_cells,
            n_subdivisions,
        }
    }

    /// The field names the generated patches carry.
    #[must_use]
    pub fn field_names() -> FieldNames {
        FieldNames::new(["CutOff"])
    }

    /// Builds the patches without inserting them anywhere.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn patches(&self) -> Vec<Patch> {
        let dim = self.dim.get();
        let nsub = self.n_subdivisions;
        let h = 1.0 / self.n_cells as f64;
        let center = Point3::new(0.5, 0.5, 0.5);

        let cells_along = |axis: usize| if axis < dim { self.n_cells } else { 1 };
        let mut patches = Vec::new();
        for iz in 0..cells_along(2) {
            for iy in 0..cells_along(1) {
                for ix in 0..cells_along(0) {
                    let origin = [ix as f64 * h, iy as f64 * h, iz as f64 * h];
                    let corners: Vec<Point3> = (0..self.dim.n_corners())
                        .map(|v| {
                            let mut c = Point3::origin();
                            for d in 0..dim {
                                c[d] = origin[d] + h * ((v >> d) & 1) as f64;
                            }
                            c
                        })
                        .collect();

                    let mut patch = Patch::new(self.dim, self.dim, corners, nsub, Vec::new())
                        .with_patch_index(patches.len());
                    patch.data = (0..patch.n_points())
                        .map(|k| {
                            let p = patch.point(k);
                            let mut r2 = 0.0;
                            for d in 0..dim {
                                r2 += (p[d] - center[d]).powi(2);
                            }
                            cutoff_cinfty(r2.sqrt(), 0.5)
                        })
                        .collect();
                    patches.push(patch);
                }
            }
        }
        patches
    }

    /// Executes the operation, inserting the patches into `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if `store` does not carry exactly one field.
    pub fn execute(&self, store: &mut PatchStore) -> Result<Vec<PatchId>> {
        if store.names().len() != 1 {
            return Err(PatchError::FieldMismatch(
                "store must carry exactly one field".to_owned(),
            )
            .into());
        }
        store.extend(self.patches())
    }
}

/// Smooth cut-off: 1 at the centre, 0 at and beyond `radius`.
fn cutoff_cinfty(r: f64, radius: f64) -> f64 {
    let s = r / radius;
    if s >= 1.0 - TOLERANCE {
        return 0.0;
    }
    (1.0 - 1.0 / (1.0 - s * s)).exp()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PlotError;
    use approx::assert_relative_eq;

    #[test]
    fn repeated_hypercube_shapes() {
        let patches = RepeatedHypercube::new(Dimension::Two, Dimension::Two, 4, 3).patches();
        assert_eq!(patches.len(), 4);
        for (p, patch) in patches.iter().enumerate() {
            assert_eq!(patch.n_points(), 16);
            assert_eq!(patch.data.len(), 5 * 16);
            assert!(patch.validate(5).is_ok());
            #[allow(clippy::cast_precision_loss)]
            let offset = p as f64;
            assert_relative_eq!(patch.corners[0], Point3::new(offset, offset, 0.0));
            assert_relative_eq!(patch.corners[3], Point3::new(offset + 1.0, offset + 1.0, 0.0));
        }
    }

    #[test]
    fn repeated_hypercube_samples_local_coordinates() {
        let patch = &RepeatedHypercube::new(Dimension::Two, Dimension::Two, 1, 2).patches()[0];
        // Point 5 is (i1, i2) = (2, 1) on a 3x3 grid.
        assert_relative_eq!(patch.field(0)[5], 1.0);
        assert_relative_eq!(patch.field(1)[5], 0.5);
        assert_relative_eq!(patch.field(2)[5], 0.0);
        assert_relative_eq!(patch.field(4)[5], 5.0);
    }

    #[test]
    fn embedded_hypercube_is_lifted_by_corner_number() {
        let patch = &RepeatedHypercube::new(Dimension::Two, Dimension::Three, 2, 1).patches()[1];
        assert_relative_eq!(patch.corners[2], Point3::new(1.0, 2.0, 3.0));
        assert!(patch.validate(5).is_ok());
    }

    #[test]
    fn repeated_hypercube_requires_matching_fields() {
        let mut store = PatchStore::new(FieldNames::new(["u"]), vec![]).unwrap();
        let op = RepeatedHypercube::new(Dimension::Two, Dimension::Two, 1, 1);
        assert!(op.execute(&mut store).is_err());

        let mut store = PatchStore::new(RepeatedHypercube::field_names(), vec![]).unwrap();
        assert_eq!(op.execute(&mut store).unwrap().len(), 1);
    }

    #[test]
    fn zero_subdivisions_are_rejected_by_the_store() {
        let mut store = PatchStore::new(RepeatedHypercube::field_names(), vec![]).unwrap();
        let err = RepeatedHypercube::new(Dimension::Two, Dimension::Two, 2, 0)
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            PlotError::Patch(PatchError::MalformedPatch { patch_index: 0, .. })
        ));
        assert!(store.is_empty());

        let mut store = PatchStore::new(ContinuousPatches::field_names(), vec![]).unwrap();
        let err = ContinuousPatches::new(Dimension::Two, 2, 0)
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            PlotError::Patch(PatchError::MalformedPatch { .. })
        ));
    }

    #[test]
    fn zero_cells_give_no_patches() {
        assert!(ContinuousPatches::new(Dimension::Two, 0, 4).patches().is_empty());
    }

    #[test]
    fn continuous_patches_tile_the_unit_square() {
        let patches = ContinuousPatches::new(Dimension::Two, 4, 4).patches();
        assert_eq!(patches.len(), 16);
        assert_relative_eq!(patches[5].corners[0], Point3::new(0.25, 0.25, 0.0));
        for patch in &patches {
            assert!(patch.validate(1).is_ok());
            assert!(patch.data.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn continuous_field_peaks_in_the_middle() {
        let patches = ContinuousPatches::new(Dimension::Two, 2, 2).patches();
        // The last sub-grid point of the first patch is the domain centre.
        assert_relative_eq!(patches[0].field(0)[8], 1.0);
        // The domain corner lies outside the bump.
        assert_relative_eq!(patches[0].field(0)[0], 0.0);
    }

    #[test]
    fn continuous_line_has_one_patch_per_cell() {
        let patches = ContinuousPatches::new(Dimension::One, 4, 4).patches();
        assert_eq!(patches.len(), 4);
        assert_eq!(patches[0].n_points(), 5);
    }

    #[test]
    fn cutoff_is_smooth_bump() {
        assert_relative_eq!(cutoff_cinfty(0.0, 0.5), 1.0);
        assert_relative_eq!(cutoff_cinfty(0.5, 0.5), 0.0);
        assert!(cutoff_cinfty(0.25, 0.5) > 0.0 && cutoff_cinfty(0.25, 0.5) < 1.0);
    }
}
