//! # Shader Loader
//!
//! Turns shader sources into backend objects. The loader owns the policy
//! (validation, file reading, logging, releasing stage objects after a
//! link) and the backend owns the graphics API calls.
//!
//! ```text
//!   vertex.glsl ──read──> compile ──┐
//!                                   ├──> link ──> Program
//!   fragment.glsl ─read──> compile ─┘      (stages released)
//! ```
//!
//! Every backend call happens on the caller's thread, so a renderer uses a
//! loader from its callbacks on the render thread.

use std::path::Path;

use crate::error::{ShaderError, ShaderResult};
use crate::source::{ShaderKind, ShaderSource};

/// A graphics API able to compile and link shaders.
pub trait ShaderBackend {
    /// A compiled stage.
    type Shader;
    /// A linked program.
    type Program;

    /// Compiles one stage. `Err` carries the compiler info log.
    fn compile_shader(&mut self, kind: ShaderKind, source: &ShaderSource) -> Result<Self::Shader, String>;

    /// Links a vertex and a fragment stage. `Err` carries the linker log.
    fn link_program(
        &mut self,
        vertex: &Self::Shader,
        fragment: &Self::Shader,
    ) -> Result<Self::Program, String>;

    /// Releases a stage object. The default drops it.
    fn delete_shader(&mut self, shader: Self::Shader) {
        drop(shader);
    }
}

/// Loads shaders and programs through a [`ShaderBackend`], logging failures.
#[derive(Debug)]
pub struct ShaderLoader<B> {
    backend: B,
}

impl<B: ShaderBackend> ShaderLoader<B> {
    /// Wraps a backend.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The wrapped backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the wrapped backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Returns the backend.
    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Compiles a shader from source text held in memory.
    ///
    /// # Errors
    ///
    /// As [`compile`](Self::compile).
    pub fn load_shader(&mut self, kind: ShaderKind, text: &str) -> ShaderResult<B::Shader> {
        self.compile(kind, &ShaderSource::inline(format!("<inline {kind}>"), text))
    }

    /// Reads and compiles a shader file.
    ///
    /// # Errors
    ///
    /// [`ShaderError::Io`] if the file cannot be read, then as
    /// [`compile`](Self::compile).
    pub fn load_shader_file(&mut self, kind: ShaderKind, path: impl AsRef<Path>) -> ShaderResult<B::Shader> {
        let source = ShaderSource::from_file(path).map_err(|err| {
            tracing::error!("{err}");
            err
        })?;
        self.compile(kind, &source)
    }

    /// Compiles an already loaded source.
    ///
    /// # Errors
    ///
    /// [`ShaderError::EmptySource`] for a blank source, which never reaches
    /// the backend; [`ShaderError::Compile`] with the backend's log.
    pub fn compile(&mut self, kind: ShaderKind, source: &ShaderSource) -> ShaderResult<B::Shader> {
        if source.is_blank() {
            let err = ShaderError::EmptySource {
                kind,
                label: source.label().to_owned(),
            };
            tracing::error!("{err}");
            return Err(err);
        }

        match self.backend.compile_shader(kind, source) {
            Ok(shader) => {
                tracing::debug!(kind = kind.name(), label = source.label(), "shader compiled");
                Ok(shader)
            }
            Err(log) => {
                let err = ShaderError::Compile {
                    kind,
                    label: source.label().to_owned(),
                    log,
                };
                tracing::error!("{err}");
                Err(err)
            }
        }
    }

    /// Loads a vertex/fragment file pair and links it into a program.
    ///
    /// Stage objects are released whether or not the link succeeds.
    ///
    /// # Errors
    ///
    /// The first load, compile or link failure. A vertex stage compiled
    /// before a fragment failure is released.
    pub fn load_program(
        &mut self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> ShaderResult<B::Program> {
        let vertex = self.load_shader_file(ShaderKind::Vertex, vertex_path)?;
        let fragment = self.load_shader_file(ShaderKind::Fragment, fragment_path);
        self.finish_program(vertex, fragment)
    }

    /// Compiles an in-memory vertex/fragment pair and links it into a
    /// program, releasing the stages exactly like
    /// [`load_program`](Self::load_program).
    ///
    /// # Errors
    ///
    /// The first compile or link failure.
    pub fn load_program_sources(&mut self, vertex_text: &str, fragment_text: &str) -> ShaderResult<B::Program> {
        let vertex = self.load_shader(ShaderKind::Vertex, vertex_text)?;
        let fragment = self.load_shader(ShaderKind::Fragment, fragment_text);
        self.finish_program(vertex, fragment)
    }

    fn finish_program(
        &mut self,
        vertex: B::Shader,
        fragment: ShaderResult<B::Shader>,
    ) -> ShaderResult<B::Program> {
        match fragment {
            Ok(fragment) => self.link(vertex, fragment),
            Err(err) => {
                self.backend.delete_shader(vertex);
                Err(err)
            }
        }
    }

    /// Links two compiled stages, then releases them.
    ///
    /// # Errors
    ///
    /// [`ShaderError::Link`] with the linker log. Both stages are released
    /// either way.
    pub fn link(&mut self, vertex: B::Shader, fragment: B::Shader) -> ShaderResult<B::Program> {
        let linked = self.backend.link_program(&vertex, &fragment);
        self.backend.delete_shader(vertex);
        self.backend.delete_shader(fragment);

        linked.map_err(|log| {
            let err = ShaderError::Link(log);
            tracing::error!("{err}");
            err
        })
    }
}
