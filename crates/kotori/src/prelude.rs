//! Commonly used types in one import.
//!
//! ```rust,ignore
//! use kotori::prelude::*;
//!
//! let renderer = Renderer::new(Referers::dotted("com.shiroyuki.view"))?;
//! ```

pub use crate::{
    context, EngineOptions, PackageIndex, RenderError, Referers, Renderer, SetupError,
};

#[cfg(feature = "macros")]
pub use crate::embed_package;
