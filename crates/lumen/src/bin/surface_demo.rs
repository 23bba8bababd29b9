//! # Surface Demo
//!
//! Drives a headless surface through its whole lifecycle and logs every
//! renderer callback.
//!
//! ## Usage
//!
//! ```bash
//! surface_demo [CONFIG.toml]
//! RUST_LOG=debug surface_demo
//! ```

use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use lumen_shaders::{ShaderBackend, ShaderKind, ShaderLoader, ShaderSource};
use lumen_surface::{
    HeadlessContextFactory, RenderMode, RenderSurface, Renderer, SurfaceConfig, SurfaceHandle,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERTEX_SHADER: &str = "attribute vec4 position;\nvoid main() { gl_Position = position; }\n";
const FRAGMENT_SHADER: &str = "precision mediump float;\nvoid main() { gl_FragColor = vec4(1.0); }\n";

// ============================================================================
// HEADLESS SHADER BACKEND
// ============================================================================

/// Accepts any source with an entry point and hands out numeric names.
#[derive(Default)]
struct HeadlessShaders {
    next_name: u32,
}

impl ShaderBackend for HeadlessShaders {
    type Shader = u32;
    type Program = u32;

    fn compile_shader(&mut self, _kind: ShaderKind, source: &ShaderSource) -> Result<u32, String> {
        if !source.text().contains("main") {
            return Err("no entry point".into());
        }
        self.next_name += 1;
        Ok(self.next_name)
    }

    fn link_program(&mut self, _vertex: &u32, _fragment: &u32) -> Result<u32, String> {
        self.next_name += 1;
        Ok(self.next_name)
    }
}

// ============================================================================
// DEMO RENDERER
// ============================================================================

/// Logs each callback and reports drawn frames to `main`.
struct DemoRenderer {
    shaders: ShaderLoader<HeadlessShaders>,
    program: Option<u32>,
    frames: u64,
    frame_tx: Sender<u64>,
}

impl Renderer for DemoRenderer {
    fn on_context_created(&mut self, _surface: &SurfaceHandle) {
        self.program = self
            .shaders
            .load_program_sources(VERTEX_SHADER, FRAGMENT_SHADER)
            .ok();
        tracing::info!(program = ?self.program, "context created");
    }

    fn on_size_changed(&mut self, _surface: &SurfaceHandle, width: u32, height: u32) {
        tracing::info!(width, height, "viewport resized");
    }

    fn on_draw_frame(&mut self, surface: &SurfaceHandle) {
        self.frames += 1;
        tracing::debug!(frame = self.frames, mode = ?surface.render_mode().ok(), "draw frame");
        let _ = self.frame_tx.send(self.frames);
    }

    fn on_context_destroyed(&mut self, _surface: &SurfaceHandle) {
        tracing::info!(program = ?self.program.take(), "context destroyed");
    }
}

fn wait_frames(frames: &Receiver<u64>, count: usize) {
    for _ in 0..count {
        if frames.recv_timeout(Duration::from_secs(2)).is_err() {
            tracing::warn!("timed out waiting for a frame");
            return;
        }
    }
}

fn run(config: SurfaceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (frame_tx, frames) = unbounded();
    let surface = RenderSurface::with_config(HeadlessContextFactory::new(), config)?;
    surface.set_renderer(DemoRenderer {
        shaders: ShaderLoader::new(HeadlessShaders::default()),
        program: None,
        frames: 0,
        frame_tx,
    })?;

    tracing::info!("== resume, continuous frames");
    surface.set_render_mode(RenderMode::Continuous)?;
    surface.resume()?;
    wait_frames(&frames, 10);

    tracing::info!("== on-demand requests");
    surface.set_render_mode(RenderMode::OnDemand)?;
    thread::sleep(Duration::from_millis(50));
    let _ = frames.try_iter().count();
    for _ in 0..3 {
        surface.request_render()?;
        wait_frames(&frames, 1);
    }

    tracing::info!("== deferred task");
    let handle = surface.handle();
    surface.queue_event(move || {
        tracing::info!(render_thread = handle.is_render_thread(), "deferred task ran");
    })?;

    tracing::info!("== resize");
    surface.notify_size_changed(1920, 1080);
    wait_frames(&frames, 1);

    tracing::info!("== pause");
    surface.pause()?;
    surface.request_render()?;

    tracing::info!("== resume");
    surface.resume()?;
    wait_frames(&frames, 1);

    tracing::info!("== destroy");
    surface.destroy()?;
    tracing::info!(stats = ?surface.stats(), "surface destroyed");
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_thread_names(true))
        .init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         LUMEN SURFACE DEMO                                       ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let config = match std::env::args().nth(1) {
        Some(path) => match SurfaceConfig::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!("failed to load {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => SurfaceConfig {
            initial_width: 1280,
            initial_height: 720,
            ..SurfaceConfig::default()
        },
    };
    tracing::info!(?config, "starting");

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}
