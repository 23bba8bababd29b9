//! Render surface statistics.

/// Counters maintained by the render thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    /// `on_draw_frame` invocations.
    pub frames_drawn: u64,
    /// Contexts successfully created.
    pub contexts_created: u64,
    /// Context creation attempts that failed.
    pub context_failures: u64,
    /// Contexts lost during present.
    pub contexts_lost: u64,
    /// Deferred tasks executed.
    pub tasks_run: u64,
}
