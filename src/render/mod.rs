mod color;
mod eps;
mod flags;
mod project;
mod sort;
mod view;

pub use color::{ColorMap, Rgb};
pub use eps::EpsWriter;
pub use flags::{RenderFlags, SizeType};
pub use project::{Cell, ProjectPatches};
pub use sort::{back_to_front, Scene};
pub use view::ViewTransform;

use std::io::Write;

use tracing::{info, instrument};

use crate::error::{RenderError, Result};
use crate::patch::PatchStore;

/// Renders the patches of a store as an Encapsulated PostScript document.
///
/// The pipeline projects every patch into cells, sorts them back to front,
/// and serializes them. The whole document is built in memory before
/// anything is written, so a failing render never leaves partial output.
pub struct RenderEps {
    flags: RenderFlags,
}

impl RenderEps {
    /// Creates a new `RenderEps` operation.
    #[must_use]
    pub fn new(flags: RenderFlags) -> Self {
        Self { flags }
    }

    /// The flags this operation renders with.
    #[must_use]
    pub fn flags(&self) -> &RenderFlags {
        &self.flags
    }

    /// Executes the pipeline, returning the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the flags are invalid, the store is empty
    /// ([`RenderError::EmptyScene`]), or a field index is out of range
    /// ([`RenderError::InvalidFieldIndex`]).
    #[instrument(skip_all, fields(patches = store.len()))]
    pub fn execute(&self, store: &PatchStore) -> Result<String> {
        self.flags.validate()?;
        if store.is_empty() {
            return Err(RenderError::EmptyScene.into());
        }

        let cells = ProjectPatches::new(&self.flags).execute(store)?;
        let scene = Scene::new(cells)?;
        let document = EpsWriter::new(&self.flags).write(&scene);
        info!(
            cells = scene.cells().len(),
            bytes = document.len(),
            "eps document rendered"
        );
        Ok(document)
    }

    /// Executes the pipeline and writes the document to `out`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`RenderEps::execute`], in which case nothing is
    /// written, or an I/O error from `out`.
    pub fn write_to<W: Write>(&self, store: &PatchStore, out: &mut W) -> Result<()> {
        let document = self.execute(store)?;
        out.write_all(document.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
