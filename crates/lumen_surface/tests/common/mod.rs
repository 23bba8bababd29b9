//! Shared helpers for the surface integration tests.

#![allow(dead_code)]

use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use lumen_surface::{
    HeadlessContextFactory, RenderMode, RenderSurface, Renderer, SurfaceConfig, SurfaceHandle,
};

/// How long a test waits for an expected callback.
pub const PATIENCE: Duration = Duration::from_secs(5);

/// How long a test watches for callbacks that must not happen.
pub const QUIET: Duration = Duration::from_millis(150);

/// One observed renderer callback or deferred task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Created,
    SizeChanged(u32, u32),
    DrawFrame,
    Destroyed,
    Task(u32),
}

/// Forwards every callback into a channel.
pub struct RecordingRenderer {
    tx: Sender<Event>,
}

impl Renderer for RecordingRenderer {
    fn on_context_created(&mut self, surface: &SurfaceHandle) {
        assert!(surface.is_render_thread());
        let _ = self.tx.send(Event::Created);
    }

    fn on_size_changed(&mut self, surface: &SurfaceHandle, width: u32, height: u32) {
        assert!(surface.is_render_thread());
        let _ = self.tx.send(Event::SizeChanged(width, height));
    }

    fn on_draw_frame(&mut self, surface: &SurfaceHandle) {
        assert!(surface.is_render_thread());
        let _ = self.tx.send(Event::DrawFrame);
    }

    fn on_context_destroyed(&mut self, surface: &SurfaceHandle) {
        assert!(surface.is_render_thread());
        let _ = self.tx.send(Event::Destroyed);
    }
}

/// A renderer plus the sender tasks use to report into the same stream.
pub fn recorder() -> (RecordingRenderer, Sender<Event>, Receiver<Event>) {
    let (tx, rx) = unbounded();
    (RecordingRenderer { tx: tx.clone() }, tx, rx)
}

/// Config with a fast frame interval so continuous tests finish quickly.
pub fn config(mode: RenderMode, width: u32, height: u32) -> SurfaceConfig {
    SurfaceConfig {
        initial_width: width,
        initial_height: height,
        render_mode: mode,
        frame_interval_ms: 1,
        ..SurfaceConfig::default()
    }
}

/// A headless surface with a recording renderer already installed.
pub fn surface(
    mode: RenderMode,
    width: u32,
    height: u32,
) -> (RenderSurface<HeadlessContextFactory>, Sender<Event>, Receiver<Event>) {
    let surface =
        RenderSurface::with_config(HeadlessContextFactory::new(), config(mode, width, height)).unwrap();
    let (renderer, tx, rx) = recorder();
    surface.set_renderer(renderer).unwrap();
    (surface, tx, rx)
}

/// Asserts that exactly `expected` arrives next, in order.
pub fn expect(rx: &Receiver<Event>, expected: &[Event]) {
    for (i, want) in expected.iter().enumerate() {
        match rx.recv_timeout(PATIENCE) {
            Ok(got) => assert_eq!(&got, want, "event #{i} of {expected:?}"),
            Err(err) => panic!("timed out waiting for {want:?} (event #{i} of {expected:?}): {err}"),
        }
    }
}

/// Asserts that nothing arrives for [`QUIET`].
pub fn expect_quiet(rx: &Receiver<Event>) {
    match rx.recv_timeout(QUIET) {
        Err(RecvTimeoutError::Timeout) => {}
        Ok(event) => panic!("unexpected event {event:?}"),
        Err(RecvTimeoutError::Disconnected) => {}
    }
}

/// Drains whatever is buffered without waiting.
pub fn drain(rx: &Receiver<Event>) -> Vec<Event> {
    rx.try_iter().collect()
}

/// Waits for the next event that is not a `DrawFrame`.
pub fn next_non_draw(rx: &Receiver<Event>) -> Event {
    loop {
        match rx.recv_timeout(PATIENCE) {
            Ok(Event::DrawFrame) => continue,
            Ok(event) => return event,
            Err(err) => panic!("timed out waiting for a non-draw event: {err}"),
        }
    }
}

/// Checks `created → size (size | draw)* → destroyed` for every period.
/// Returns the number of complete periods.
pub fn assert_well_ordered(events: &[Event]) -> usize {
    let mut live = false;
    let mut periods = 0;
    let mut expect_size = false;

    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Created => {
                assert!(!live, "created twice without destroy at #{i}: {events:?}");
                live = true;
                expect_size = true;
            }
            Event::SizeChanged(..) => {
                assert!(live, "size change outside a period at #{i}");
                expect_size = false;
            }
            Event::DrawFrame => {
                assert!(live, "draw outside a period at #{i}");
                assert!(!expect_size, "draw before first size change at #{i}");
            }
            Event::Destroyed => {
                assert!(live, "destroyed without create at #{i}");
                live = false;
                periods += 1;
            }
            Event::Task(_) => {}
        }
    }
    assert!(!live, "period left open: {events:?}");
    periods
}
