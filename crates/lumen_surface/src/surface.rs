//! # Render Surface
//!
//! The object a host view owns. It validates that a renderer was set,
//! forwards commands to its render thread, and latches size notifications
//! coming from the host.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let surface = RenderSurface::new(HeadlessContextFactory::new());
//! surface.set_renderer(MyRenderer::default())?;
//! surface.resume()?;                       // context created, size delivered
//! surface.set_render_mode(RenderMode::OnDemand)?;
//! surface.queue_event(|| println!("runs on the render thread"))?;
//! surface.request_render()?;               // exactly one more frame
//! surface.pause()?;                        // context destroyed
//! surface.destroy()?;                      // thread joined
//! ```

use std::sync::Arc;

use crate::config::SurfaceConfig;
use crate::context::ContextFactory;
use crate::error::{ConfigError, SurfaceError, SurfaceResult};
use crate::mode::{LifecycleState, RenderMode};
use crate::renderer::Renderer;
use crate::scheduler::{RenderThread, Shared};
use crate::stats::SurfaceStats;

/// A rendering surface hosting one graphics context on one render thread.
pub struct RenderSurface<F: ContextFactory> {
    thread: RenderThread<F>,
    handle: SurfaceHandle,
}

impl<F: ContextFactory> RenderSurface<F> {
    /// Creates a surface with the default configuration.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self::build(factory, SurfaceConfig::default())
    }

    /// Creates a surface from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if `config` fails [`SurfaceConfig::validate`].
    pub fn with_config(factory: F, config: SurfaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(factory, config))
    }

    fn build(factory: F, config: SurfaceConfig) -> Self {
        let thread = RenderThread::new(factory, config);
        let handle = SurfaceHandle::new(Arc::clone(thread.shared()));
        Self { thread, handle }
    }

    /// Installs the renderer. Must precede every other command; only once.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::RendererAlreadySet`] on a second call or from the
    /// render thread; [`SurfaceError::Destroyed`] after teardown.
    pub fn set_renderer(&self, renderer: impl Renderer) -> SurfaceResult<()> {
        self.thread.set_renderer(Box::new(renderer))
    }

    /// Starts or resumes rendering and waits until the render thread is
    /// Running. On an already Running surface whose context creation failed,
    /// retries the creation; otherwise a no-op.
    ///
    /// # Errors
    ///
    /// Usage errors only. A context failure is not an error here; inspect
    /// [`last_error`](Self::last_error).
    pub fn resume(&self) -> SurfaceResult<()> {
        self.thread.resume()
    }

    /// Stops rendering after the current frame, runs pending deferred tasks,
    /// destroys the context and waits until the render thread is Paused.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::RendererNotSet`], [`SurfaceError::Destroyed`] or
    /// [`SurfaceError::OnRenderThread`] for misuse;
    /// [`SurfaceError::RenderThreadExited`] if the thread died first.
    pub fn pause(&self) -> SurfaceResult<()> {
        self.thread.pause()
    }

    /// Tears the surface down and joins the render thread. Idempotent.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::RendererPanicked`] if a renderer callback panicked;
    /// [`SurfaceError::OnRenderThread`] when called from a deferred task or
    /// callback, in which case teardown still happens asynchronously.
    pub fn destroy(&self) -> SurfaceResult<()> {
        self.thread.destroy()
    }

    /// Enqueues work for the render thread. See [`SurfaceHandle::queue_event`].
    ///
    /// # Errors
    ///
    /// As [`SurfaceHandle::queue_event`].
    pub fn queue_event(&self, task: impl FnOnce() + Send + 'static) -> SurfaceResult<()> {
        self.handle.queue_event(task)
    }

    /// Marks the surface dirty. See [`SurfaceHandle::request_render`].
    ///
    /// # Errors
    ///
    /// As [`SurfaceHandle::request_render`].
    pub fn request_render(&self) -> SurfaceResult<()> {
        self.handle.request_render()
    }

    /// Switches the scheduling discipline.
    ///
    /// # Errors
    ///
    /// As [`SurfaceHandle::set_render_mode`].
    pub fn set_render_mode(&self, mode: RenderMode) -> SurfaceResult<()> {
        self.handle.set_render_mode(mode)
    }

    /// Current scheduling discipline.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::RendererNotSet`] before a renderer is installed.
    pub fn render_mode(&self) -> SurfaceResult<RenderMode> {
        self.handle.render_mode()
    }

    /// Host notification of a new surface size. Latest size wins; an
    /// unchanged size is ignored, as is any notification after teardown.
    pub fn notify_size_changed(&self, width: u32, height: u32) {
        self.thread.shared().notify_size(width, height);
    }

    /// Sample count handed to the factory at the next context creation.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for zero; the previous count stays in effect.
    pub fn set_sample_count(&self, sample_count: u32) -> Result<(), ConfigError> {
        if sample_count == 0 {
            return Err(ConfigError::Invalid("sample_count must be at least 1".into()));
        }
        self.thread.shared().lock().sample_count = sample_count;
        Ok(())
    }

    /// Keeps the context alive across pause/resume. Read at each pause.
    pub fn set_preserve_context_on_pause(&self, preserve: bool) {
        self.thread.shared().lock().preserve_context_on_pause = preserve;
    }

    /// A cloneable handle for other threads and for renderer callbacks.
    #[must_use]
    pub fn handle(&self) -> SurfaceHandle {
        self.handle.clone()
    }

    /// Lifecycle as last applied by the render thread.
    #[must_use]
    pub fn lifecycle(&self) -> LifecycleState {
        self.handle.lifecycle()
    }

    /// Latest known surface size.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.handle.size()
    }

    /// True while a context is alive on the render thread.
    #[must_use]
    pub fn has_context(&self) -> bool {
        self.thread.shared().lock().context_live
    }

    /// Snapshot of the render thread's counters.
    #[must_use]
    pub fn stats(&self) -> SurfaceStats {
        self.thread.shared().lock().stats
    }

    /// Most recent non-fatal error (context creation failure or loss).
    #[must_use]
    pub fn last_error(&self) -> Option<SurfaceError> {
        self.thread.shared().lock().last_error.clone()
    }

    /// Returns and clears the most recent non-fatal error.
    pub fn take_last_error(&self) -> Option<SurfaceError> {
        self.thread.shared().lock().last_error.take()
    }

    /// The configuration this surface was built with.
    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        self.thread.config()
    }
}

impl<F: ContextFactory> Drop for RenderSurface<F> {
    fn drop(&mut self) {
        if let Err(err) = self.thread.destroy() {
            tracing::error!("render surface teardown failed: {err}");
        }
    }
}

impl<F: ContextFactory> std::fmt::Debug for RenderSurface<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurface")
            .field("lifecycle", &self.lifecycle())
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

/// Thread-safe command handle for one surface.
///
/// Handed to every renderer callback and cloneable for other threads. It
/// cannot pause, resume or destroy the surface, and it never exposes the
/// graphics context.
#[derive(Clone)]
pub struct SurfaceHandle {
    shared: Arc<Shared>,
}

impl SurfaceHandle {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Marks the surface dirty and wakes the render thread. Requests made
    /// before the next frame coalesce into that one frame. A no-op once the
    /// surface is destroyed.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::RendererNotSet`] before a renderer is installed;
    /// [`SurfaceError::RenderThreadExited`] if the render thread died.
    pub fn request_render(&self) -> SurfaceResult<()> {
        self.shared.request_render()
    }

    /// Enqueues `task` to run on the render thread before its next frame.
    /// Tasks run in submission order, exactly once; tasks queued while
    /// Paused run after the next resume.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Destroyed`] once teardown has begun; the task is
    /// dropped without running.
    pub fn queue_event(&self, task: impl FnOnce() + Send + 'static) -> SurfaceResult<()> {
        self.shared.queue_event(Box::new(task))
    }

    /// Switches the scheduling discipline. Valid in any live state; takes
    /// effect at the render thread's next decision.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::RendererNotSet`], [`SurfaceError::Destroyed`] or
    /// [`SurfaceError::RenderThreadExited`] when the surface no longer
    /// accepts commands.
    pub fn set_render_mode(&self, mode: RenderMode) -> SurfaceResult<()> {
        self.shared.set_render_mode(mode)
    }

    /// Current scheduling discipline.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::RendererNotSet`] before a renderer is installed.
    pub fn render_mode(&self) -> SurfaceResult<RenderMode> {
        self.shared.render_mode()
    }

    /// Latest known surface size.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.shared.lock().size
    }

    /// Lifecycle as last applied by the render thread.
    #[must_use]
    pub fn lifecycle(&self) -> LifecycleState {
        self.shared.lock().lifecycle
    }

    /// True when called from this surface's render thread.
    #[must_use]
    pub fn is_render_thread(&self) -> bool {
        self.shared.lock().on_render_thread()
    }
}

impl std::fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceHandle")
            .field("lifecycle", &self.lifecycle())
            .finish_non_exhaustive()
    }
}
