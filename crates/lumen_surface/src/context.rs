//! # Graphics Context Contract
//!
//! The context is an owned resource with four operations: create (through a
//! [`ContextFactory`]), make-current, present, destroy. The render thread is
//! the only owner. Neither [`SurfaceContext`] nor the values it hands out are
//! required to be `Send`, and the scheduler never exposes the context to
//! renderer callbacks or callers, so cross-thread use cannot be expressed.
//!
//! [`HeadlessContextFactory`] provides an offscreen context with no platform
//! backing. It checks thread affinity on every call, which makes it useful
//! for tests and for driving renderers without a display.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use crate::config::ContextConfig;
use crate::error::ContextError;

/// A live graphics context, bound to the thread that created it.
pub trait SurfaceContext {
    /// Binds the context to the calling thread.
    fn make_current(&mut self) -> Result<(), ContextError>;

    /// Presents the frame just drawn (swap buffers).
    ///
    /// [`ContextError::Lost`] makes the scheduler tear the context down and
    /// recreate it. Any other error drops the frame.
    fn present(&mut self) -> Result<(), ContextError>;

    /// Releases the context. The default drops it.
    fn destroy(self)
    where
        Self: Sized,
    {
    }
}

/// Creates contexts for a surface. Called on the render thread only.
pub trait ContextFactory: Send + 'static {
    /// The context type produced.
    type Context: SurfaceContext;

    /// Creates a context. Failures are reported to the caller as recoverable
    /// and retried on the next resume.
    fn create(&mut self, config: &ContextConfig) -> Result<Self::Context, ContextError>;
}

/// Counters shared between a [`HeadlessContextFactory`] and its contexts.
#[derive(Debug, Default)]
pub struct HeadlessCounters {
    created: AtomicU64,
    destroyed: AtomicU64,
    presented: AtomicU64,
}

impl HeadlessCounters {
    /// Contexts created so far.
    #[must_use]
    pub fn created(&self) -> u64 {
        self.created.load(Ordering::Acquire)
    }

    /// Contexts destroyed so far.
    #[must_use]
    pub fn destroyed(&self) -> u64 {
        self.destroyed.load(Ordering::Acquire)
    }

    /// Frames presented across all contexts.
    #[must_use]
    pub fn presented(&self) -> u64 {
        self.presented.load(Ordering::Acquire)
    }

    /// Contexts currently alive.
    #[must_use]
    pub fn live(&self) -> u64 {
        self.created().saturating_sub(self.destroyed())
    }
}

/// Factory for [`HeadlessContext`]s.
#[derive(Debug, Clone, Default)]
pub struct HeadlessContextFactory {
    counters: Arc<HeadlessCounters>,
}

impl HeadlessContextFactory {
    /// Creates a factory with fresh counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters observable from any thread.
    #[must_use]
    pub fn counters(&self) -> Arc<HeadlessCounters> {
        Arc::clone(&self.counters)
    }
}

impl ContextFactory for HeadlessContextFactory {
    type Context = HeadlessContext;

    fn create(&mut self, config: &ContextConfig) -> Result<HeadlessContext, ContextError> {
        self.counters.created.fetch_add(1, Ordering::AcqRel);
        Ok(HeadlessContext {
            owner: thread::current().id(),
            config: *config,
            counters: Arc::clone(&self.counters),
            released: false,
            _not_send: PhantomData,
        })
    }
}

/// An offscreen context with no platform backing.
///
/// `!Send`: it must die on the thread that made it.
#[derive(Debug)]
pub struct HeadlessContext {
    owner: ThreadId,
    config: ContextConfig,
    counters: Arc<HeadlessCounters>,
    released: bool,
    _not_send: PhantomData<*const ()>,
}

impl HeadlessContext {
    /// The config this context was created with.
    #[must_use]
    pub const fn config(&self) -> &ContextConfig {
        &self.config
    }

    fn check_thread(&self) -> Result<(), ContextError> {
        if thread::current().id() == self.owner {
            Ok(())
        } else {
            Err(ContextError::WrongThread)
        }
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.counters.destroyed.fetch_add(1, Ordering::AcqRel);
        }
    }
}

impl SurfaceContext for HeadlessContext {
    fn make_current(&mut self) -> Result<(), ContextError> {
        self.check_thread()
    }

    fn present(&mut self) -> Result<(), ContextError> {
        self.check_thread()?;
        self.counters.presented.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn destroy(mut self) {
        self.release();
    }
}

impl Drop for HeadlessContext {
    fn drop(&mut self) {
        self.release();
    }
}
