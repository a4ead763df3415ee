use std::{error::Error, fmt};

use crate::uniform::{Uniform, UniformType};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Capability object for the graphics driver entry points used to build and drive a shader
/// program.
///
/// Implementations are expected to be cheap to clone (a reference-counted handle to the loaded
/// function table or to in-memory state), and every call happens on the thread owning the
/// graphics context. Status queries and uploads mirror the underlying API: they do not fail, and
/// their outcome is observed through the `*_status` and `*_info_log` queries.
pub trait Driver: Clone {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + Eq + fmt::Debug;
    type UniformLocation: Copy + fmt::Debug;
    type Err: Error + Send + Sync + 'static;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, Self::Err>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, Self::Err>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    /// Make `program` the current program, or unbind any program with `None`.
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);
    /// Whether `program` names a live program object.
    fn is_program(&self, program: Self::Program) -> bool;

    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    /// Upload `value` into the current program. A `None` location is silently ignored.
    fn set_uniform(&self, location: Option<Self::UniformLocation>, value: Uniform);
    /// Read back the value stored at `location` in `program`, interpreted as `ty`.
    fn uniform_value(
        &self,
        program: Self::Program,
        location: Self::UniformLocation,
        ty: UniformType,
    ) -> Option<Uniform>;
}
