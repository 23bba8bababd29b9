//! # Shader Error Types

use std::path::PathBuf;

use thiserror::Error;

use crate::source::ShaderKind;

/// Errors raised while loading, compiling or linking shaders.
#[derive(Error, Debug)]
pub enum ShaderError {
    /// The shader file could not be read.
    #[error("failed to read shader {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The shader source contains no code.
    #[error("{kind} shader {label} is empty")]
    EmptySource {
        /// Stage of the empty shader.
        kind: ShaderKind,
        /// Where the source came from.
        label: String,
    },

    /// The backend rejected the source.
    #[error("failed to compile {kind} shader {label}: {log}")]
    Compile {
        /// Stage that failed.
        kind: ShaderKind,
        /// Where the source came from.
        label: String,
        /// Compiler info log.
        log: String,
    },

    /// The backend could not link the stages into a program.
    #[error("failed to link program: {0}")]
    Link(String),
}

/// Result type for shader operations.
pub type ShaderResult<T> = Result<T, ShaderError>;
