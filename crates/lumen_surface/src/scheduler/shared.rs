//! State shared between caller threads and the render thread.
//!
//! One mutex, one condition variable. Every command mutates the state under
//! the lock and then wakes all waiters; the render thread and callers blocked
//! in `pause`/`resume` re-check their predicates after each wake-up.

use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::config::SurfaceConfig;
use crate::error::{SurfaceError, SurfaceResult};
use crate::mode::{LifecycleState, RenderMode};
use crate::queue::{DeferredTask, EventQueue};
use crate::stats::SurfaceStats;

/// Everything guarded by the surface lock.
#[derive(Debug)]
pub(crate) struct SchedulerState {
    /// Applied lifecycle. Written by the render thread, except for the
    /// transitions into Destroyed that happen without one.
    pub lifecycle: LifecycleState,
    pub renderer_set: bool,
    /// Callers want the surface Running.
    pub run_requested: bool,
    pub exit_requested: bool,
    pub worker_exited: bool,
    pub worker_thread: Option<ThreadId>,

    pub mode: RenderMode,
    pub dirty: bool,
    /// Latest size reported by the host.
    pub size: (u32, u32),
    /// `size` changed since the render thread last looked.
    pub size_changed: bool,
    pub queue: EventQueue,

    pub context_live: bool,
    /// The last creation attempt failed; waiting for a resume to retry.
    pub context_failed: bool,
    /// Recreate the context at the next iteration.
    pub retry_context: bool,
    /// Bumped after every creation attempt, successful or not.
    pub context_attempts: u64,
    pub preserve_context_on_pause: bool,
    pub sample_count: u32,

    pub last_error: Option<SurfaceError>,
    pub stats: SurfaceStats,
}

impl SchedulerState {
    fn new(config: &SurfaceConfig) -> Self {
        Self {
            lifecycle: LifecycleState::Created,
            renderer_set: false,
            run_requested: false,
            exit_requested: false,
            worker_exited: false,
            worker_thread: None,
            mode: config.render_mode,
            dirty: false,
            size: (config.initial_width, config.initial_height),
            size_changed: false,
            queue: EventQueue::new(),
            context_live: false,
            context_failed: false,
            retry_context: false,
            context_attempts: 0,
            preserve_context_on_pause: config.preserve_context_on_pause,
            sample_count: config.sample_count.max(1),
            last_error: None,
            stats: SurfaceStats::default(),
        }
    }

    /// True once teardown has been requested or completed.
    pub fn is_destroyed(&self) -> bool {
        self.exit_requested || self.lifecycle == LifecycleState::Destroyed
    }

    /// True when called from this surface's render thread.
    pub fn on_render_thread(&self) -> bool {
        self.worker_thread == Some(thread::current().id())
    }

    pub fn require_renderer(&self) -> SurfaceResult<()> {
        if self.renderer_set {
            Ok(())
        } else {
            Err(SurfaceError::RendererNotSet)
        }
    }

    /// Common gate for commands that need a live, accepting surface.
    pub fn require_accepting(&self) -> SurfaceResult<()> {
        self.require_renderer()?;
        if self.is_destroyed() {
            return Err(SurfaceError::Destroyed);
        }
        if self.worker_exited {
            return Err(SurfaceError::RenderThreadExited);
        }
        Ok(())
    }
}

/// The lock/condvar pair for one surface.
#[derive(Debug)]
pub(crate) struct Shared {
    state: Mutex<SchedulerState>,
    signal: Condvar,
}

impl Shared {
    pub fn new(config: &SurfaceConfig) -> Self {
        Self {
            state: Mutex::new(SchedulerState::new(config)),
            signal: Condvar::new(),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock()
    }

    /// Wakes the render thread and any caller waiting for an acknowledgement.
    pub fn notify(&self) {
        self.signal.notify_all();
    }

    pub fn wait(&self, guard: &mut MutexGuard<'_, SchedulerState>) {
        self.signal.wait(guard);
    }

    pub fn wait_until(&self, guard: &mut MutexGuard<'_, SchedulerState>, deadline: std::time::Instant) {
        // Spurious and early wake-ups are fine: the caller re-checks.
        let _ = self.signal.wait_until(guard, deadline);
    }

    // =========================================================================
    // Thread-safe commands
    // =========================================================================

    pub fn request_render(&self) -> SurfaceResult<()> {
        let mut st = self.lock();
        st.require_renderer()?;
        if st.is_destroyed() {
            return Ok(());
        }
        if st.worker_exited {
            return Err(SurfaceError::RenderThreadExited);
        }
        st.dirty = true;
        self.notify();
        Ok(())
    }

    pub fn queue_event(&self, task: DeferredTask) -> SurfaceResult<()> {
        let mut st = self.lock();
        st.require_accepting()?;
        if st.queue.push(task).is_err() {
            return Err(SurfaceError::Destroyed);
        }
        self.notify();
        Ok(())
    }

    pub fn set_render_mode(&self, mode: RenderMode) -> SurfaceResult<()> {
        let mut st = self.lock();
        st.require_accepting()?;
        if st.mode != mode {
            tracing::debug!(?mode, "render mode changed");
            st.mode = mode;
            self.notify();
        }
        Ok(())
    }

    pub fn render_mode(&self) -> SurfaceResult<RenderMode> {
        let st = self.lock();
        st.require_renderer()?;
        Ok(st.mode)
    }

    /// Latches a host size notification. Latest size wins.
    pub fn notify_size(&self, width: u32, height: u32) {
        let mut st = self.lock();
        if st.is_destroyed() || st.size == (width, height) {
            return;
        }
        st.size = (width, height);
        st.size_changed = true;
        self.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> Shared {
        Shared::new(&SurfaceConfig {
            initial_width: 320,
            initial_height: 240,
            ..SurfaceConfig::default()
        })
    }

    #[test]
    fn test_commands_require_renderer() {
        let shared = shared();
        assert_eq!(shared.request_render(), Err(SurfaceError::RendererNotSet));
        assert_eq!(shared.queue_event(Box::new(|| {})), Err(SurfaceError::RendererNotSet));
        assert_eq!(
            shared.set_render_mode(RenderMode::OnDemand),
            Err(SurfaceError::RendererNotSet)
        );
        assert_eq!(shared.render_mode(), Err(SurfaceError::RendererNotSet));
    }

    #[test]
    fn test_request_render_coalesces() {
        let shared = shared();
        shared.lock().renderer_set = true;

        for _ in 0..10 {
            shared.request_render().unwrap();
        }
        assert!(shared.lock().dirty);
    }

    #[test]
    fn test_size_notification_is_latest_wins_and_idempotent() {
        let shared = shared();

        shared.notify_size(320, 240);
        assert!(!shared.lock().size_changed);

        shared.notify_size(800, 600);
        shared.notify_size(400, 300);
        let st = shared.lock();
        assert!(st.size_changed);
        assert_eq!(st.size, (400, 300));
    }

    #[test]
    fn test_destroyed_surface_rejects_tasks_but_ignores_render_requests() {
        let shared = shared();
        {
            let mut st = shared.lock();
            st.renderer_set = true;
            st.exit_requested = true;
            st.queue.close();
        }

        assert_eq!(shared.request_render(), Ok(()));
        assert_eq!(shared.queue_event(Box::new(|| {})), Err(SurfaceError::Destroyed));
        assert_eq!(
            shared.set_render_mode(RenderMode::OnDemand),
            Err(SurfaceError::Destroyed)
        );
        // Mode stays readable after teardown.
        assert_eq!(shared.render_mode(), Ok(RenderMode::Continuous));
    }
}
