//! # Surface Error Types
//!
//! All errors that can occur while driving a render surface.

use thiserror::Error;

/// Failures reported by a [`ContextFactory`](crate::ContextFactory) or a live
/// [`SurfaceContext`](crate::SurfaceContext).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The platform refused to create the context.
    #[error("context creation failed: {0}")]
    CreationFailed(String),

    /// The context could not be bound to the render thread.
    #[error("failed to make context current: {0}")]
    MakeCurrent(String),

    /// The context was lost (device reset, driver restart).
    #[error("context lost")]
    Lost,

    /// The context was used from a thread other than the one that created it.
    #[error("context used off its owning thread")]
    WrongThread,

    /// Any other platform failure.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Errors returned by [`RenderSurface`](crate::RenderSurface) and
/// [`SurfaceHandle`](crate::SurfaceHandle) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// An operation was issued before a renderer was set.
    #[error("no renderer set")]
    RendererNotSet,

    /// `set_renderer` was called a second time.
    #[error("renderer already set")]
    RendererAlreadySet,

    /// The surface has been torn down.
    #[error("surface destroyed")]
    Destroyed,

    /// A blocking lifecycle command was issued from the render thread itself.
    #[error("blocking command issued from the render thread")]
    OnRenderThread,

    /// The render thread is gone (a renderer callback panicked).
    #[error("render thread exited")]
    RenderThreadExited,

    /// The OS refused to start the render thread.
    #[error("failed to spawn render thread: {0}")]
    Spawn(String),

    /// The context could not be created or was lost. Recoverable.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// A renderer callback panicked on the render thread.
    #[error("renderer panicked: {0}")]
    RendererPanicked(String),
}

impl SurfaceError {
    /// Returns true for API misuse errors, as opposed to resource failures.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::RendererNotSet
                | Self::RendererAlreadySet
                | Self::Destroyed
                | Self::OnRenderThread
                | Self::RenderThreadExited
        )
    }
}

/// Errors loading or validating a [`SurfaceConfig`](crate::SurfaceConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value the scheduler cannot honor.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;
