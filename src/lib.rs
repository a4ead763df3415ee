//! Shader programs built from a vertex and a fragment GLSL source, on top of an explicit
//! graphics [`Driver`].
//!
//! ```no_run
//! # fn demo(driver: &glint_gl::OpenGLDriver) {
//! use glint::ShaderProgram;
//!
//! let program = ShaderProgram::new(driver, "shader.vert", "shader.frag");
//! program.use_program();
//! program.set_float("opacity", 0.5);
//! # }
//! ```

pub mod error;
pub mod logging;
pub mod program;

pub use error::ProgramError;
pub use glint_api::{Bind, Driver, ShaderStage, Uniform, UniformType};
pub use program::ShaderProgram;

/// Shader program driven by the OpenGL backend.
pub type GlShaderProgram = ShaderProgram<glint_gl::OpenGLDriver>;
