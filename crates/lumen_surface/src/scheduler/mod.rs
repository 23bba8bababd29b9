//! # Render Thread Scheduler
//!
//! One dedicated thread per surface, spawned lazily on the first resume and
//! joined on teardown. The graphics context is created, used and destroyed
//! on that thread only.
//!
//! ## Commands
//!
//! ```text
//!   caller threads                          render thread
//!   ──────────────                          ─────────────
//!   request_render ─┐
//!   queue_event ────┤   ┌──────────────┐
//!   set_render_mode ┼──>│ Mutex<State> │──condvar──> next_step()
//!   notify_size ────┤   └──────────────┘
//!   pause/resume ───┘  (blocks for ack)  <──notify── lifecycle written
//! ```
//!
//! `pause`, `resume` and `destroy` are additionally serialized by a control
//! lock so two of them never interleave. Each one waits until the render
//! thread has applied it.

mod shared;
mod worker;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use crate::config::SurfaceConfig;
use crate::context::ContextFactory;
use crate::error::{SurfaceError, SurfaceResult};
use crate::mode::LifecycleState;
use crate::renderer::Renderer;

pub(crate) use shared::Shared;
use worker::Worker;

/// Resources that move onto the render thread when it is spawned.
struct Control<F> {
    factory: Option<F>,
    renderer: Option<Box<dyn Renderer>>,
    worker: Option<JoinHandle<()>>,
}

/// The scheduler behind one [`RenderSurface`](crate::RenderSurface).
pub(crate) struct RenderThread<F: ContextFactory> {
    shared: Arc<Shared>,
    control: Mutex<Control<F>>,
    config: SurfaceConfig,
}

impl<F: ContextFactory> RenderThread<F> {
    pub fn new(factory: F, config: SurfaceConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new(&config)),
            control: Mutex::new(Control {
                factory: Some(factory),
                renderer: None,
                worker: None,
            }),
            config,
        }
    }

    pub fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn set_renderer(&self, renderer: Box<dyn Renderer>) -> SurfaceResult<()> {
        // A render thread only exists once a renderer is set.
        self.reject_on_render_thread(SurfaceError::RendererAlreadySet)?;
        let mut control = self.control.lock();
        let mut st = self.shared.lock();
        if st.renderer_set {
            return Err(SurfaceError::RendererAlreadySet);
        }
        if st.is_destroyed() {
            return Err(SurfaceError::Destroyed);
        }
        control.renderer = Some(renderer);
        st.renderer_set = true;
        Ok(())
    }

    /// Created/Paused → Running. Retries a failed context when already Running.
    pub fn resume(&self) -> SurfaceResult<()> {
        self.reject_on_render_thread(SurfaceError::OnRenderThread)?;
        let mut control = self.control.lock();
        let mut st = self.shared.lock();
        st.require_accepting()?;

        if st.run_requested {
            if st.context_failed && !st.context_live {
                let attempts = st.context_attempts;
                st.retry_context = true;
                self.shared.notify();
                while st.context_attempts == attempts && !st.worker_exited {
                    self.shared.wait(&mut st);
                }
                if st.context_attempts == attempts {
                    return Err(SurfaceError::RenderThreadExited);
                }
            }
            return Ok(());
        }

        st.run_requested = true;
        if control.worker.is_none() {
            drop(st);
            let handle = self.spawn(&mut control);
            st = self.shared.lock();
            match handle {
                Ok(handle) => control.worker = Some(handle),
                Err(err) => {
                    tracing::error!("failed to spawn render thread: {err}");
                    st.run_requested = false;
                    st.exit_requested = true;
                    st.queue.close();
                    st.lifecycle = LifecycleState::Destroyed;
                    return Err(err);
                }
            }
        }

        self.shared.notify();
        while st.lifecycle != LifecycleState::Running && !st.worker_exited {
            self.shared.wait(&mut st);
        }
        // Judge by the applied state: the thread may exit right after acking.
        if st.lifecycle != LifecycleState::Running {
            return Err(SurfaceError::RenderThreadExited);
        }
        Ok(())
    }

    /// Running → Paused. A no-op in Created and Paused.
    pub fn pause(&self) -> SurfaceResult<()> {
        self.reject_on_render_thread(SurfaceError::OnRenderThread)?;
        let _control = self.control.lock();
        let mut st = self.shared.lock();
        st.require_accepting()?;
        if !st.run_requested {
            return Ok(());
        }

        st.run_requested = false;
        self.shared.notify();
        while st.lifecycle == LifecycleState::Running && !st.worker_exited {
            self.shared.wait(&mut st);
        }
        if st.lifecycle == LifecycleState::Running {
            return Err(SurfaceError::RenderThreadExited);
        }
        Ok(())
    }

    /// Any state → Destroyed. Idempotent.
    ///
    /// Called on the render thread itself, teardown is only requested: the
    /// thread finishes its current step and exits, and this returns
    /// [`SurfaceError::OnRenderThread`].
    pub fn destroy(&self) -> SurfaceResult<()> {
        {
            let mut st = self.shared.lock();
            if st.on_render_thread() {
                st.exit_requested = true;
                st.run_requested = false;
                st.queue.close();
                self.shared.notify();
                return Err(SurfaceError::OnRenderThread);
            }
        }

        let mut control = self.control.lock();
        {
            let mut st = self.shared.lock();
            // A thread that tore itself down still has to be joined.
            if st.lifecycle == LifecycleState::Destroyed && control.worker.is_none() {
                return Ok(());
            }
            st.exit_requested = true;
            st.run_requested = false;
            st.queue.close();
            self.shared.notify();
        }

        let result = match control.worker.take() {
            None => Ok(()),
            Some(handle) => handle.join().map_err(|payload| {
                let message = panic_message(payload.as_ref());
                SurfaceError::RendererPanicked(message)
            }),
        };
        control.renderer = None;
        control.factory = None;

        let mut st = self.shared.lock();
        if st.lifecycle != LifecycleState::Destroyed {
            tracing::info!("Surface state transition: {} -> {}", st.lifecycle, LifecycleState::Destroyed);
            st.lifecycle = LifecycleState::Destroyed;
        }
        self.shared.notify();
        result
    }

    /// The render thread must never block on the control lock: `destroy`
    /// may hold it while joining that very thread.
    fn reject_on_render_thread(&self, err: SurfaceError) -> SurfaceResult<()> {
        let st = self.shared.lock();
        if st.on_render_thread() && st.renderer_set {
            return Err(err);
        }
        Ok(())
    }

    fn spawn(&self, control: &mut Control<F>) -> SurfaceResult<JoinHandle<()>> {
        let (Some(factory), Some(renderer)) = (control.factory.take(), control.renderer.take()) else {
            return Err(SurfaceError::Spawn("render thread resources already consumed".into()));
        };
        let shared = Arc::clone(&self.shared);
        let frame_interval = self.config.frame_interval();

        // The worker is built on the new thread: its context is not Send.
        thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || Worker::new(shared, factory, renderer, frame_interval).run())
            .map_err(|err| SurfaceError::Spawn(err.to_string()))
    }
}

/// Extracts the message from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
