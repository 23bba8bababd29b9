//! # LUMEN Shaders
//!
//! Shader source loading for renderers running on a LUMEN surface.
//!
//! The crate does not talk to a graphics API. A renderer supplies a
//! [`ShaderBackend`] that compiles and links, and the [`ShaderLoader`] reads
//! sources, validates them and logs every failure before returning it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lumen_shaders::{ShaderKind, ShaderLoader};
//!
//! // Inside Renderer::on_context_created, on the render thread.
//! let mut loader = ShaderLoader::new(GlBackend::current());
//! let program = loader.load_program("shaders/quad.vert", "shaders/quad.frag")?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod loader;
pub mod source;

pub use error::{ShaderError, ShaderResult};
pub use loader::{ShaderBackend, ShaderLoader};
pub use source::{ShaderKind, ShaderSource};
