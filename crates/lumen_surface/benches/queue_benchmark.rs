//! Benchmark for deferred task dispatch and on-demand frame latency.
//!
//! TARGET: request → draw round trip well under one 60 Hz frame
//!
//! Run with: cargo bench --package lumen_surface --bench queue_benchmark

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use crossbeam_channel::{bounded, Receiver, Sender};
use lumen_surface::{
    EventQueue, HeadlessContextFactory, RenderMode, RenderSurface, Renderer, SurfaceConfig,
    SurfaceHandle,
};

fn benchmark_queue_push_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_queue");
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("push_then_drain_1k", |b| {
        let mut queue = EventQueue::new();
        b.iter(|| {
            for i in 0..1_000u32 {
                let _ = queue.push(Box::new(move || {
                    black_box(i);
                }));
            }
            black_box(queue.take_all().run())
        });
    });

    group.finish();
}

/// Signals every drawn frame.
struct FrameSignal {
    tx: Sender<()>,
}

impl Renderer for FrameSignal {
    fn on_context_created(&mut self, _surface: &SurfaceHandle) {}

    fn on_size_changed(&mut self, _surface: &SurfaceHandle, _width: u32, _height: u32) {}

    fn on_draw_frame(&mut self, _surface: &SurfaceHandle) {
        let _ = self.tx.send(());
    }

    fn on_context_destroyed(&mut self, _surface: &SurfaceHandle) {}
}

fn running_surface() -> (RenderSurface<HeadlessContextFactory>, Receiver<()>) {
    let config = SurfaceConfig {
        render_mode: RenderMode::OnDemand,
        initial_width: 1280,
        initial_height: 720,
        ..SurfaceConfig::default()
    };
    let surface = RenderSurface::with_config(HeadlessContextFactory::new(), config)
        .expect("valid config");
    let (tx, rx) = bounded(1);
    surface.set_renderer(FrameSignal { tx }).expect("fresh surface");
    surface.resume().expect("resume");
    // First frame after creation.
    let _ = rx.recv_timeout(Duration::from_secs(1));
    (surface, rx)
}

fn benchmark_request_render_round_trip(c: &mut Criterion) {
    let (surface, frames) = running_surface();

    c.bench_function("request_render_round_trip", |b| {
        b.iter(|| {
            surface.request_render().expect("running surface");
            black_box(frames.recv_timeout(Duration::from_secs(1)))
        });
    });

    surface.destroy().expect("clean teardown");
}

fn benchmark_queue_event_round_trip(c: &mut Criterion) {
    let (surface, _frames) = running_surface();
    let (done_tx, done_rx) = bounded(1);

    c.bench_function("queue_event_round_trip", |b| {
        b.iter(|| {
            let done = done_tx.clone();
            surface
                .queue_event(move || {
                    let _ = done.send(());
                })
                .expect("running surface");
            black_box(done_rx.recv_timeout(Duration::from_secs(1)))
        });
    });

    surface.destroy().expect("clean teardown");
}

criterion_group!(
    benches,
    benchmark_queue_push_drain,
    benchmark_request_render_round_trip,
    benchmark_queue_event_round_trip,
);
criterion_main!(benches);
