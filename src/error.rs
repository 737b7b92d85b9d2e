use thiserror::Error;

/// Top-level error type for the patch renderer.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while accepting patches into a store.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("malformed patch {patch_index}: {reason}")]
    MalformedPatch { patch_index: usize, reason: String },

    #[error("patch {patch_index} references a neighbor that is not in the store")]
    UnknownNeighbor { patch_index: usize },

    #[error("field list mismatch: {0}")]
    FieldMismatch(String),

    #[error("invalid vector descriptor `{name}`: {reason}")]
    InvalidVectorDescriptor { name: String, reason: String },
}

/// Errors raised by the projection, sorting and emission stages.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{which} = {index} is out of range for {n_fields} field(s)")]
    InvalidFieldIndex {
        which: &'static str,
        index: usize,
        n_fields: usize,
    },

    #[error("nothing to render: the patch store is empty")]
    EmptyScene,
}

/// Errors related to rendering configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse render flags: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid render flag: {0}")]
    InvalidValue(String),
}

/// Convenience type alias for results using [`PlotError`].
pub type Result<T> = std::result::Result<T, PlotError>;
