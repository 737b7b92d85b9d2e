use crate::error::PatchError;

/// Ordered names of the fields carried by every patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldNames(Vec<String>);

impl FieldNames {
    /// Creates a name list from anything yielding strings.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name of field `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Position of the field called `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }

    /// Iterates over the names in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Groups `len` consecutive fields starting at `start` into a named vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorDescriptor {
    /// First field of the group.
    pub start: usize,
    /// Number of components.
    pub len: usize,
    /// Name of the vector quantity.
    pub name: String,
}

impl VectorDescriptor {
    /// Creates a descriptor.
    pub fn new(start: usize, len: usize, name: impl Into<String>) -> Self {
        Self {
            start,
            len,
            name: name.into(),
        }
    }

    /// One past the last field of the group.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Checks that descriptors are non-empty, in range, and pairwise disjoint.
pub(crate) fn validate_vectors(
    vectors: &[VectorDescriptor],
    n_fields: usize,
) -> Result<(), PatchError> {
    let invalid = |v: &VectorDescriptor, reason: String| PatchError::InvalidVectorDescriptor {
        name: v.name.clone(),
        reason,
    };

    for v in vectors {
        if v.len == 0 {
            return Err(invalid(v, "a vector needs at least one component".to_owned()));
        }
        if v.end() > n_fields {
            return Err(invalid(
                v,
                format!(
                    "fields {}..{} exceed the {n_fields} declared field(s)",
                    v.start,
                    v.end()
                ),
            ));
        }
    }

    let mut sorted: Vec<&VectorDescriptor> = vectors.iter().collect();
    sorted.sort_by_key(|v| v.start);
    for pair in sorted.windows(2) {
        if pair[1].start < pair[0].end() {
            return Err(invalid(
                pair[1],
                format!("overlaps vector `{}`", pair[0].name),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_keep_their_order() {
        let names = FieldNames::new(["x1", "x2", "i"]);
        assert_eq!(names.len(), 3);
        assert_eq!(names.get(2), Some("i"));
        assert_eq!(names.index_of("x2"), Some(1));
        assert_eq!(names.index_of("nope"), None);
        assert_eq!(names.iter().collect::<Vec<_>>(), vec!["x1", "x2", "i"]);
    }

    #[test]
    fn disjoint_vectors_are_accepted() {
        let vectors = [VectorDescriptor::new(0, 2, "u"), VectorDescriptor::new(2, 2, "w")];
        assert!(validate_vectors(&vectors, 5).is_ok());
    }

    #[test]
    fn vector_past_field_count_is_rejected() {
        let vectors = [VectorDescriptor::new(3, 3, "u")];
        assert!(matches!(
            validate_vectors(&vectors, 5),
            Err(PatchError::InvalidVectorDescriptor { .. })
        ));
    }

    #[test]
    fn overlapping_vectors_are_rejected() {
        let vectors = [VectorDescriptor::new(0, 3, "u"), VectorDescriptor::new(2, 2, "w")];
        assert!(validate_vectors(&vectors, 5).is_err());
    }

    #[test]
    fn empty_vector_is_rejected() {
        assert!(validate_vectors(&[VectorDescriptor::new(0, 0, "u")], 5).is_err());
    }
}
