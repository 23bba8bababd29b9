//! The render thread body.
//!
//! ```text
//!            ┌────────────── next_step (locked) ──────────────┐
//!            │                                                 │
//!   exit? ──>│ Exit      : drain (if running), destroy context │──> return
//!   pause? ─>│ Pause     : drain, destroy context, ack Paused  │
//!   resume? >│ Start     : create context, created + size      │
//!   work? ──>│ Iterate   : drain, resize, draw + present       │
//!            │ otherwise : wait on the condvar                 │
//!            └─────────────────────────────────────────────────┘
//! ```
//!
//! Each step decides under the lock and then runs renderer callbacks and
//! deferred tasks with the lock released, so callbacks may issue commands
//! through their [`SurfaceHandle`].

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::ContextConfig;
use crate::context::{ContextFactory, SurfaceContext};
use crate::error::{ContextError, SurfaceError};
use crate::mode::{LifecycleState, RenderMode};
use crate::queue::TaskBatch;
use crate::renderer::Renderer;
use crate::surface::SurfaceHandle;

use super::shared::Shared;

/// What the render thread does next.
enum Step {
    /// Acquire a context and enter (or re-enter) Running.
    Start,
    /// One loop iteration: run tasks, deliver a resize, maybe draw.
    Iterate(TaskBatch),
    /// Leave Running.
    Pause(TaskBatch),
    /// Leave for good.
    Exit {
        batch: TaskBatch,
        was_running: bool,
    },
}

/// Marks the render thread as gone, including when a callback unwinds.
struct ExitGuard {
    shared: Arc<Shared>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            tracing::error!("render thread panicked; surface is no longer rendering");
        }
        let mut st = self.shared.lock();
        st.worker_exited = true;
        st.context_live = false;
        self.shared.notify();
    }
}

/// Owns the context and the renderer for one surface.
pub(crate) struct Worker<F: ContextFactory> {
    shared: Arc<Shared>,
    handle: SurfaceHandle,
    factory: F,
    renderer: Box<dyn Renderer>,
    context: Option<F::Context>,
    delivered_size: (u32, u32),
    frame_interval: Duration,
    next_frame_at: Instant,
}

impl<F: ContextFactory> Worker<F> {
    pub fn new(
        shared: Arc<Shared>,
        factory: F,
        renderer: Box<dyn Renderer>,
        frame_interval: Duration,
    ) -> Self {
        Self {
            handle: SurfaceHandle::new(Arc::clone(&shared)),
            shared,
            factory,
            renderer,
            context: None,
            delivered_size: (0, 0),
            frame_interval,
            next_frame_at: Instant::now(),
        }
    }

    /// Render thread main loop.
    pub fn run(mut self) {
        let _guard = ExitGuard {
            shared: Arc::clone(&self.shared),
        };
        self.shared.lock().worker_thread = Some(thread::current().id());
        tracing::debug!("render thread started");

        loop {
            match self.next_step() {
                Step::Start => self.start(),
                Step::Iterate(batch) => self.iterate(batch),
                Step::Pause(batch) => self.pause(batch),
                Step::Exit { batch, was_running } => {
                    self.exit(batch, was_running);
                    break;
                }
            }
        }

        tracing::debug!("render thread exiting");
    }

    /// Blocks until there is something to do.
    fn next_step(&mut self) -> Step {
        let mut st = self.shared.lock();
        loop {
            if st.exit_requested {
                return Step::Exit {
                    batch: st.queue.take_all(),
                    was_running: st.lifecycle == LifecycleState::Running,
                };
            }

            if !st.run_requested {
                if st.lifecycle == LifecycleState::Running {
                    return Step::Pause(st.queue.take_all());
                }
                // Paused: tasks wait for the next Running period.
                self.shared.wait(&mut st);
                continue;
            }

            if st.lifecycle != LifecycleState::Running
                || (st.retry_context && self.context.is_none())
            {
                return Step::Start;
            }

            let has_context = self.context.is_some();
            if !st.queue.is_empty() || (has_context && st.size_changed) {
                return Step::Iterate(st.queue.take_all());
            }

            if has_context {
                match st.mode {
                    RenderMode::OnDemand if st.dirty => {
                        return Step::Iterate(st.queue.take_all());
                    }
                    // Continuous frames follow the pace alone; a request
                    // never shortens the interval.
                    RenderMode::Continuous => {
                        if Instant::now() >= self.next_frame_at {
                            return Step::Iterate(st.queue.take_all());
                        }
                        let deadline = self.next_frame_at;
                        self.shared.wait_until(&mut st, deadline);
                        continue;
                    }
                    RenderMode::OnDemand => {}
                }
            }

            // OnDemand and clean, or no context: sleep until a command.
            self.shared.wait(&mut st);
        }
    }

    // =========================================================================
    // Steps
    // =========================================================================

    fn start(&mut self) {
        let config = {
            let mut st = self.shared.lock();
            st.retry_context = false;
            st.context_failed = false;
            ContextConfig {
                width: st.size.0,
                height: st.size.1,
                sample_count: st.sample_count,
            }
        };

        if self.context.is_none() {
            match self.create_context(&config) {
                Ok(context) => {
                    self.context = Some(context);
                    self.shared.lock().stats.contexts_created += 1;
                    tracing::debug!(
                        width = config.width,
                        height = config.height,
                        "context created"
                    );
                    self.renderer.on_context_created(&self.handle);
                }
                Err(err) => {
                    tracing::warn!("context creation failed: {err}; retrying on next resume");
                    let mut st = self.shared.lock();
                    st.context_failed = true;
                    st.context_attempts += 1;
                    st.stats.context_failures += 1;
                    st.last_error = Some(SurfaceError::Context(err));
                    st.lifecycle = LifecycleState::Running;
                    self.shared.notify();
                    return;
                }
            }
        }

        let size = {
            let mut st = self.shared.lock();
            st.size_changed = false;
            st.size
        };
        self.delivered_size = size;
        self.renderer.on_size_changed(&self.handle, size.0, size.1);

        let mut st = self.shared.lock();
        let previous = st.lifecycle;
        st.lifecycle = LifecycleState::Running;
        st.context_live = true;
        st.context_attempts += 1;
        st.dirty = true;
        self.next_frame_at = Instant::now();
        self.shared.notify();
        drop(st);

        if previous != LifecycleState::Running {
            tracing::info!("Surface state transition: {} -> {}", previous, LifecycleState::Running);
        }
    }

    fn iterate(&mut self, batch: TaskBatch) {
        self.run_tasks(batch);

        let (resize, draw) = {
            let mut st = self.shared.lock();
            let has_context = self.context.is_some();

            let mut resize = None;
            if has_context && st.size_changed {
                st.size_changed = false;
                if st.size != self.delivered_size {
                    resize = Some(st.size);
                    st.dirty = true;
                }
            }

            let leaving = st.exit_requested || !st.run_requested;
            let wants_frame = match st.mode {
                RenderMode::Continuous => Instant::now() >= self.next_frame_at,
                RenderMode::OnDemand => st.dirty,
            };
            let draw = has_context && !leaving && wants_frame;
            if draw {
                st.dirty = false;
            }
            (resize, draw)
        };

        if let Some((width, height)) = resize {
            self.delivered_size = (width, height);
            self.renderer.on_size_changed(&self.handle, width, height);
        }
        if draw {
            self.draw_frame();
        }
    }

    fn pause(&mut self, batch: TaskBatch) {
        self.run_tasks(batch);

        let preserve = self.shared.lock().preserve_context_on_pause;
        if !preserve {
            self.teardown_context();
        }

        let mut st = self.shared.lock();
        st.lifecycle = LifecycleState::Paused;
        st.context_live = self.context.is_some();
        self.shared.notify();
        drop(st);

        tracing::info!(
            preserved = preserve && self.context.is_some(),
            "Surface state transition: {} -> {}",
            LifecycleState::Running,
            LifecycleState::Paused
        );
    }

    fn exit(&mut self, batch: TaskBatch, was_running: bool) {
        if was_running {
            self.run_tasks(batch);
        } else if !batch.is_empty() {
            tracing::debug!("discarding {} deferred tasks queued while paused", batch.len());
            drop(batch);
        }

        // Covers a Running surface and a context preserved across pause.
        self.teardown_context();

        let mut st = self.shared.lock();
        let previous = st.lifecycle;
        st.lifecycle = LifecycleState::Destroyed;
        st.context_live = false;
        self.shared.notify();
        drop(st);

        tracing::info!("Surface state transition: {} -> {}", previous, LifecycleState::Destroyed);
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn create_context(&mut self, config: &ContextConfig) -> Result<F::Context, ContextError> {
        let mut context = self.factory.create(config)?;
        if let Err(err) = context.make_current() {
            context.destroy();
            return Err(err);
        }
        Ok(context)
    }

    fn teardown_context(&mut self) {
        if self.context.is_none() {
            return;
        }
        self.renderer.on_context_destroyed(&self.handle);
        if let Some(context) = self.context.take() {
            context.destroy();
        }
        self.shared.lock().context_live = false;
        tracing::debug!("context destroyed");
    }

    fn draw_frame(&mut self) {
        self.next_frame_at = Instant::now() + self.frame_interval;
        self.renderer.on_draw_frame(&self.handle);
        self.shared.lock().stats.frames_drawn += 1;

        let Some(context) = self.context.as_mut() else {
            return;
        };
        match context.present() {
            Ok(()) => {}
            Err(ContextError::Lost) => self.recover_lost_context(),
            Err(err) => tracing::warn!("present failed, frame dropped: {err}"),
        }
    }

    fn recover_lost_context(&mut self) {
        tracing::warn!("context lost; recreating");
        self.teardown_context();

        let mut st = self.shared.lock();
        st.stats.contexts_lost += 1;
        st.last_error = Some(SurfaceError::Context(ContextError::Lost));
        st.retry_context = true;
    }

    fn run_tasks(&mut self, batch: TaskBatch) {
        if batch.is_empty() {
            return;
        }
        let ran = batch.run() as u64;
        self.shared.lock().stats.tasks_run += ran;
    }
}
