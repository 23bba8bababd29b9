//! The application-supplied renderer.

use crate::surface::SurfaceHandle;

/// Receives lifecycle events on the render thread.
///
/// Calls are strictly ordered per surface:
///
/// ```text
/// on_context_created → (on_size_changed | on_draw_frame)* → on_context_destroyed
/// ```
///
/// and the cycle repeats across pause/resume. The context is current on the
/// calling thread for the whole duration of every call, with one exception:
/// after a present reports [`ContextError::Lost`](crate::ContextError::Lost),
/// `on_context_destroyed` runs with the context already unusable. Release
/// CPU-side handles there and let the next `on_context_created` rebuild.
///
/// Panics are not caught. A panicking callback ends the render thread and is
/// reported by [`RenderSurface::destroy`](crate::RenderSurface::destroy).
pub trait Renderer: Send + 'static {
    /// A fresh context exists. Create GPU resources here.
    fn on_context_created(&mut self, surface: &SurfaceHandle);

    /// The surface size changed, or a context was just (re)created.
    fn on_size_changed(&mut self, surface: &SurfaceHandle, width: u32, height: u32);

    /// Draw one frame. The scheduler presents it afterwards.
    fn on_draw_frame(&mut self, surface: &SurfaceHandle);

    /// The context is about to go away. Release GPU resources here, unless
    /// the context was lost, in which case they are already gone.
    fn on_context_destroyed(&mut self, surface: &SurfaceHandle);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn on_context_created(&mut self, surface: &SurfaceHandle) {
        (**self).on_context_created(surface);
    }

    fn on_size_changed(&mut self, surface: &SurfaceHandle, width: u32, height: u32) {
        (**self).on_size_changed(surface, width, height);
    }

    fn on_draw_frame(&mut self, surface: &SurfaceHandle) {
        (**self).on_draw_frame(surface);
    }

    fn on_context_destroyed(&mut self, surface: &SurfaceHandle) {
        (**self).on_context_destroyed(surface);
    }
}
