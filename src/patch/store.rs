use slotmap::SlotMap;
use tracing::debug;

use super::fields::validate_vectors;
use super::{FieldNames, Patch, PatchId, VectorDescriptor};
use crate::error::{PatchError, Result};

/// Arena that owns the patches of one output, together with their field names.
///
/// Patches are addressed by typed IDs (generational indices) and remember
/// the order in which they were added; that order is the tie-break for
/// cells of equal depth. Accepted patches are never mutated.
#[derive(Debug, Default)]
pub struct PatchStore {
    patches: SlotMap<PatchId, Patch>,
    order: Vec<PatchId>,
    names: FieldNames,
    vectors: Vec<VectorDescriptor>,
}

impl PatchStore {
    /// Creates an empty store for patches carrying the given fields.
    ///
    /// # Errors
    ///
    /// Returns an error if a vector descriptor is empty, out of range, or
    /// overlaps another one.
    pub fn new(names: FieldNames, vectors: Vec<VectorDescriptor>) -> Result<Self> {
        validate_vectors(&vectors, names.len())?;
        Ok(Self {
            patches: SlotMap::with_key(),
            order: Vec::new(),
            names,
            vectors,
        })
    }

    /// Validates a patch and inserts it, returning its ID.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::MalformedPatch`] if the sample array does not
    /// match the field count, `n_subdivisions` is zero, or the geometry is
    /// inconsistent with the patch dimensions.
    pub fn add_patch(&mut self, patch: Patch) -> Result<PatchId> {
        patch.validate(self.names.len())?;
        debug!(
            patch_index = patch.patch_index,
            dim = patch.dim.get(),
            spacedim = patch.spacedim.get(),
            n_subdivisions = patch.n_subdivisions,
            "patch accepted"
        );
        let id = self.patches.insert(patch);
        self.order.push(id);
        Ok(id)
    }

    /// Adds every patch of `patches`, stopping at the first malformed one.
    ///
    /// # Errors
    ///
    /// Returns the error of the first patch that fails validation; patches
    /// before it stay in the store.
    pub fn extend<I>(&mut self, patches: I) -> Result<Vec<PatchId>>
    where
        I: IntoIterator<Item = Patch>,
    {
        patches.into_iter().map(|p| self.add_patch(p)).collect()
    }

    /// Returns a reference to the patch, if it exists.
    #[must_use]
    pub fn patch(&self, id: PatchId) -> Option<&Patch> {
        self.patches.get(id)
    }

    /// Iterates over the patches in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (PatchId, &Patch)> + '_ {
        self.order.iter().map(|&id| (id, &self.patches[id]))
    }

    /// Number of patches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the store holds no patches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The field names shared by all patches.
    #[must_use]
    pub fn names(&self) -> &FieldNames {
        &self.names
    }

    /// The vector groupings of the fields.
    #[must_use]
    pub fn vectors(&self) -> &[VectorDescriptor] {
        &self.vectors
    }

    /// Checks that every neighbour reference points at a patch in this store.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::UnknownNeighbor`] for the first dangling reference.
    pub fn check_neighbors(&self) -> Result<()> {
        for (_, patch) in self.iter() {
            let dangling = patch
                .neighbors
                .iter()
                .flatten()
                .any(|&n| self.patch(n).is_none());
            if dangling {
                return Err(PatchError::UnknownNeighbor {
                    patch_index: patch.patch_index,
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PlotError;
    use crate::math::Point3;
    use crate::patch::Dimension;

    fn segment(index: usize, n_fields: usize) -> Patch {
        Patch::new(
            Dimension::One,
            Dimension::One,
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            2,
            vec![0.5; 3 * n_fields],
        )
        .with_patch_index(index)
    }

    #[test]
    fn patches_iterate_in_insertion_order() {
        let mut store = PatchStore::new(FieldNames::new(["u"]), vec![]).unwrap();
        let ids = store.extend((0..4).map(|i| segment(i, 1))).unwrap();
        assert_eq!(store.len(), 4);
        let seen: Vec<_> = store.iter().map(|(id, p)| (id, p.patch_index)).collect();
        let expected: Vec<_> = ids.into_iter().zip(0..4).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn malformed_patch_is_rejected() {
        let mut store = PatchStore::new(FieldNames::new(["u", "v"]), vec![]).unwrap();
        let err = store.add_patch(segment(7, 1)).unwrap_err();
        assert!(matches!(
            err,
            PlotError::Patch(PatchError::MalformedPatch { patch_index: 7, .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn invalid_vector_descriptor_fails_construction() {
        let result = PatchStore::new(
            FieldNames::new(["u"]),
            vec![VectorDescriptor::new(0, 2, "vel")],
        );
        assert!(result.is_err());
    }

    #[test]
    fn neighbors_must_exist() {
        let mut store = PatchStore::new(FieldNames::new(["u"]), vec![]).unwrap();
        let a = store.add_patch(segment(0, 1)).unwrap();
        store
            .add_patch(segment(1, 1).with_neighbors(vec![Some(a), None]))
            .unwrap();
        assert!(store.check_neighbors().is_ok());

        let c = store.add_patch(segment(2, 1)).unwrap();
        let mut other = PatchStore::new(FieldNames::new(["u"]), vec![]).unwrap();
        other
            .add_patch(segment(3, 1).with_neighbors(vec![None, Some(c)]))
            .unwrap();
        // `c` lives in a slot that `other` never allocated.
        assert!(matches!(
            other.check_neighbors(),
            Err(PlotError::Patch(PatchError::UnknownNeighbor { patch_index: 3 }))
        ));
    }
}
