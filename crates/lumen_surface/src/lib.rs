//! # LUMEN Surface
//!
//! A reusable rendering surface that hosts a graphics context on a dedicated
//! render thread and drives an application-supplied [`Renderer`] through
//! its lifecycle.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  caller threads            │          render thread          │
//! ├────────────────────────────┼────────────────────────────────┤
//! │  RenderSurface / Handle ───┼──> EventQueue ──> drain tasks   │
//! │    pause / resume          │    dirty flag ──> resize        │
//! │    request_render          │    render mode ─> draw+present  │
//! │    notify_size_changed     │    SurfaceContext (pinned)      │
//! └────────────────────────────┴────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. **One context per surface** - created and destroyed on the render thread
//! 2. **Strict callback order** - created → (resize | draw)* → destroyed
//! 3. **No busy waiting** - idle surfaces block on a condition variable
//!
//! ## Example
//!
//! ```rust,ignore
//! use lumen_surface::{HeadlessContextFactory, RenderMode, RenderSurface};
//!
//! let surface = RenderSurface::new(HeadlessContextFactory::new());
//! surface.set_renderer(MyRenderer::default())?;
//! surface.notify_size_changed(1280, 720);
//! surface.resume()?;
//! surface.set_render_mode(RenderMode::OnDemand)?;
//! surface.request_render()?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod context;
pub mod error;
pub mod mode;
pub mod queue;
pub mod renderer;
pub mod stats;
pub mod surface;

mod scheduler;

pub use config::{ContextConfig, SurfaceConfig};
pub use context::{ContextFactory, HeadlessContext, HeadlessContextFactory, HeadlessCounters, SurfaceContext};
pub use error::{ConfigError, ContextError, SurfaceError, SurfaceResult};
pub use mode::{LifecycleState, RenderMode};
pub use queue::{DeferredTask, EventQueue, TaskBatch};
pub use renderer::Renderer;
pub use stats::SurfaceStats;
pub use surface::{RenderSurface, SurfaceHandle};
