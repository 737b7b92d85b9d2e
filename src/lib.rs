pub mod error;
pub mod math;
pub mod patch;
pub mod render;

pub use error::{PlotError, Result};
pub use patch::{Dimension, FieldNames, Patch, PatchId, PatchStore, VectorDescriptor};
pub use render::{RenderEps, RenderFlags};
