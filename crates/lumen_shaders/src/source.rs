//! Shader stages and their source text.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{ShaderError, ShaderResult};

/// Pipeline stage a shader belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
}

impl ShaderKind {
    /// Lowercase stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shader source text plus a label naming where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSource {
    label: String,
    text: String,
}

impl ShaderSource {
    /// Source held in memory.
    pub fn inline(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Reads source from a file; the label is the path.
    ///
    /// # Errors
    ///
    /// [`ShaderError::Io`] if the file cannot be read as UTF-8.
    pub fn from_file(path: impl AsRef<Path>) -> ShaderResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            label: path.display().to_string(),
            text,
        })
    }

    /// Where the source came from.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True if the text is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_source() {
        let source = ShaderSource::inline("quad.vert", "void main() {}");
        assert_eq!(source.label(), "quad.vert");
        assert_eq!(source.text(), "void main() {}");
        assert!(!source.is_blank());
        assert!(ShaderSource::inline("blank", " \n\t").is_blank());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ShaderSource::from_file("/nonexistent/lumen/shader.frag").unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
        assert!(err.to_string().contains("shader.frag"));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ShaderKind::Vertex.to_string(), "vertex");
        assert_eq!(ShaderKind::Fragment.to_string(), "fragment");
    }
}
