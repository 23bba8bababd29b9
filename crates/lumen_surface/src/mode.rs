//! Scheduling discipline and lifecycle states.

use serde::Deserialize;

/// How the render thread decides to draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Draw every loop iteration, paced to the frame interval.
    #[default]
    Continuous,
    /// Draw only after context creation, a resize, or `request_render`.
    OnDemand,
}

/// Lifecycle of one surface.
///
/// ```text
/// Created ──resume──> Running <──resume/pause──> Paused
///                        │                         │
///                        └──────destroy──> Destroyed <┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Built, never resumed. No render thread exists yet.
    Created,
    /// The render thread is looping (with a context unless creation failed).
    Running,
    /// The render thread is parked; the context is gone unless preserved.
    Paused,
    /// Terminal. The render thread has exited.
    Destroyed,
}

impl LifecycleState {
    /// Returns a human-readable state name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
            Self::Destroyed => "DESTROYED",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
