pub mod fields;
pub mod generate;
pub mod store;

pub use fields::{FieldNames, VectorDescriptor};
pub use generate::{ContinuousPatches, RepeatedHypercube};
pub use store::PatchStore;

use crate::error::PatchError;
use crate::math::{Point3, TOLERANCE};

slotmap::new_key_type! {
    /// Unique identifier for a patch in the patch store.
    pub struct PatchId;
}

/// Dimension of a patch or of the space it is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    /// Lines.
    One,
    /// Quadrilaterals.
    Two,
    /// Hexahedra.
    Three,
}

impl Dimension {
    /// Converts a numeric dimension, returning `None` outside `1..=3`.
    #[must_use]
    pub fn from_usize(d: usize) -> Option<Self> {
        match d {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    /// The numeric dimension.
    #[must_use]
    pub fn get(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Number of corners of a hypercube of this dimension.
    #[must_use]
    pub fn n_corners(self) -> usize {
        1 << self.get()
    }

    /// Number of faces of a hypercube of this dimension.
    #[must_use]
    pub fn n_faces(self) -> usize {
        2 * self.get()
    }
}

/// A structured block of field samples over a regular sub-grid.
///
/// The sub-grid has `n_subdivisions + 1` points per axis and is numbered
/// lexicographically with the x axis running fastest. Sample data is stored
/// field-major: sample `k` of field `f` lives at `f * n_points() + k`.
#[derive(Debug, Clone)]
pub struct Patch {
    /// Dimension of the patch itself.
    pub dim: Dimension,
    /// Dimension of the space the patch lives in.
    pub spacedim: Dimension,
    /// The `2^dim` corners in lexicographic order. Components beyond
    /// `spacedim` are zero.
    pub corners: Vec<Point3>,
    /// Number of sub-cells per axis.
    pub n_subdivisions: usize,
    /// Field samples, field-major.
    pub data: Vec<f64>,
    /// Explicit sub-grid positions, used instead of interpolating the corners.
    pub points: Option<Vec<Point3>>,
    /// Neighbouring patch across each face, if any. Empty or `2 * dim` long.
    pub neighbors: Vec<Option<PatchId>>,
    /// Caller-assigned tag, echoed in diagnostics.
    pub patch_index: usize,
}

impl Patch {
    /// Creates a patch with no explicit points, no neighbours and tag 0.
    #[must_use]
    pub fn new(
        dim: Dimension,
        spacedim: Dimension,
        corners: Vec<Point3>,
        n_subdivisions: usize,
        data: Vec<f64>,
    ) -> Self {
        Self {
            dim,
            spacedim,
            corners,
            n_subdivisions,
            data,
            points: None,
            neighbors: Vec::new(),
            patch_index: 0,
        }
    }

    /// Sets explicit sub-grid positions.
    #[must_use]
    pub fn with_points(mut self, points: Vec<Point3>) -> Self {
        self.points = Some(points);
        self
    }

    /// Sets the neighbour list.
    #[must_use]
    pub fn with_neighbors(mut self, neighbors: Vec<Option<PatchId>>) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Sets the diagnostic tag.
    #[must_use]
    pub fn with_patch_index(mut self, patch_index: usize) -> Self {
        self.patch_index = patch_index;
        self
    }

    /// Number of sub-grid points along each axis.
    #[must_use]
    pub fn points_per_axis(&self) -> usize {
        self.n_subdivisions + 1
    }

    /// Total number of sub-grid points.
    #[must_use]
    pub fn n_points(&self) -> usize {
        let n = self.points_per_axis();
        (0..self.dim.get()).map(|_| n).product()
    }

    /// The samples of one field, one per sub-grid point.
    #[must_use]
    pub fn field(&self, field: usize) -> &[f64] {
        let n = self.n_points();
        &self.data[field * n..(field + 1) * n]
    }

    /// Position of sub-grid point `k`, either explicit or interpolated.
    #[must_use]
    pub fn point(&self, k: usize) -> Point3 {
        if let Some(points) = &self.points {
            return points[k];
        }
        let n = self.points_per_axis();
        #[allow(clippy::cast_precision_loss)]
        let step = 1.0 / self.n_subdivisions as f64;
        let mut xi = [0.0; 3];
        let mut rest = k;
        for x in xi.iter_mut().take(self.dim.get()) {
            #[allow(clippy::cast_precision_loss)]
            let i = (rest % n) as f64;
            *x = i * step;
            rest /= n;
        }
        crate::math::interpolate::multilinear(&self.corners, &xi[..self.dim.get()])
    }

    /// Checks the structural invariants against the store's field count.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::MalformedPatch`] describing the first violation.
    pub fn validate(&self, n_fields: usize) -> Result<(), PatchError> {
        let fail = |reason: String| -> Result<(), PatchError> {
            Err(PatchError::MalformedPatch {
                patch_index: self.patch_index,
                reason,
            })
        };

        if self.dim > self.spacedim {
            return fail(format!(
                "dimension {} exceeds space dimension {}",
                self.dim.get(),
                self.spacedim.get()
            ));
        }
        if self.n_subdivisions == 0 {
            return fail("n_subdivisions must be at least 1".to_owned());
        }
        if self.corners.len() != self.dim.n_corners() {
            return fail(format!(
                "expected {} corners, got {}",
                self.dim.n_corners(),
                self.corners.len()
            ));
        }
        let expected = n_fields * self.n_points();
        if self.data.len() != expected {
            return fail(format!(
                "expected {expected} samples ({n_fields} field(s) x {} points), got {}",
                self.n_points(),
                self.data.len()
            ));
        }
        if self.data.iter().any(|v| !v.is_finite()) {
            return fail("sample data contains non-finite values".to_owned());
        }
        if let Some(points) = &self.points {
            if points.len() != self.n_points() {
                return fail(format!(
                    "expected {} explicit points, got {}",
                    self.n_points(),
                    points.len()
                ));
            }
        }
        let geometry = self.corners.iter().chain(self.points.iter().flatten());
        for p in geometry {
            if p.iter().any(|c| !c.is_finite()) {
                return fail("geometry contains non-finite coordinates".to_owned());
            }
            if p.iter().skip(self.spacedim.get()).any(|c| c.abs() > TOLERANCE) {
                return fail(format!(
                    "coordinate beyond space dimension {} is non-zero",
                    self.spacedim.get()
                ));
            }
        }
        if !self.neighbors.is_empty() && self.neighbors.len() != self.dim.n_faces() {
            return fail(format!(
                "expected {} neighbor slots, got {}",
                self.dim.n_faces(),
                self.neighbors.len()
            ));
        }
        Ok(())
    }
}
