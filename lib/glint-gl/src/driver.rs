use std::{
    ffi::{c_void, CStr, CString},
    fmt,
    num::NonZeroU32,
};

use gl::types::{GLchar, GLenum, GLint};
use glint_api::{Driver, ShaderStage, Uniform, UniformType};

use crate::{api::OpenGLError, load_with, Gl};

fn gl_stage(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    }
}

/// [`Driver`] backed by an OpenGL 3.3 core context.
///
/// The function table is loaded once from the context and shared between clones. It is tied to
/// the thread it was loaded on; calling into it from any other thread panics.
#[derive(Clone)]
pub struct OpenGLDriver {
    gl: Gl,
}

impl fmt::Debug for OpenGLDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenGLDriver").finish_non_exhaustive()
    }
}

impl OpenGLDriver {
    /// Load the OpenGL entry points through `loader`. The context they come from must be current
    /// on the calling thread.
    pub fn load_with(loader: impl FnMut(&'static str) -> *const c_void) -> Self {
        Self {
            gl: load_with(loader),
        }
    }

    /// Raw access to the loaded entry points, for calls outside of the shader program surface.
    pub fn gl(&self) -> &gl::Gl {
        &self.gl
    }

    pub fn get_string(&self, name: GLenum) -> Result<String, OpenGLError> {
        let ptr = unsafe { self.gl.GetString(name) };
        OpenGLError::guard(&self.gl)?;
        if ptr.is_null() {
            return Err(OpenGLError::UnknownError);
        }
        let value = unsafe { CStr::from_ptr(ptr.cast()) };
        Ok(value.to_string_lossy().into_owned())
    }

    fn read_info_log(
        &self,
        id: u32,
        get_iv: unsafe fn(&gl::Gl, u32, GLenum, *mut GLint),
        get_log: unsafe fn(&gl::Gl, u32, GLint, *mut GLint, *mut GLchar),
    ) -> String {
        let mut len = 0;
        unsafe { get_iv(&self.gl, id, gl::INFO_LOG_LENGTH, &mut len) };
        if len <= 0 {
            return String::new();
        }
        let mut buf = vec![0u8; len as usize];
        let mut written = 0;
        unsafe { get_log(&self.gl, id, len, &mut written, buf.as_mut_ptr().cast()) };
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn created(&self, id: u32) -> Result<NonZeroU32, OpenGLError> {
        NonZeroU32::new(id)
            .ok_or_else(|| OpenGLError::current_error(&self.gl).unwrap_or(OpenGLError::UnknownError))
    }
}

impl Driver for OpenGLDriver {
    type Shader = NonZeroU32;
    type Program = NonZeroU32;
    type UniformLocation = GLint;
    type Err = OpenGLError;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, Self::Err> {
        let id = unsafe { self.gl.CreateShader(gl_stage(stage)) };
        self.created(id)
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        let ptr = source.as_ptr().cast::<GLchar>();
        let len = source.len() as GLint;
        unsafe { self.gl.ShaderSource(shader.get(), 1, &ptr, &len) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.CompileShader(shader.get()) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        let mut status = 0;
        unsafe {
            self.gl
                .GetShaderiv(shader.get(), gl::COMPILE_STATUS, &mut status);
        }
        status == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        self.read_info_log(shader.get(), gl::Gl::GetShaderiv, gl::Gl::GetShaderInfoLog)
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.DeleteShader(shader.get()) }
    }

    fn create_program(&self) -> Result<Self::Program, Self::Err> {
        let id = unsafe { self.gl.CreateProgram() };
        self.created(id)
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.AttachShader(program.get(), shader.get()) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.LinkProgram(program.get()) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        let mut status = 0;
        unsafe {
            self.gl
                .GetProgramiv(program.get(), gl::LINK_STATUS, &mut status);
        }
        status == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        self.read_info_log(program.get(), gl::Gl::GetProgramiv, gl::Gl::GetProgramInfoLog)
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe {
            self.gl.UseProgram(program.map_or(0, NonZeroU32::get));
        }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.DeleteProgram(program.get()) }
    }

    fn is_program(&self, program: Self::Program) -> bool {
        unsafe { self.gl.IsProgram(program.get()) == gl::TRUE }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        let Ok(name) = CString::new(name) else {
            tracing::trace!(message = "Uniform name contains a NUL byte", name);
            return None;
        };
        let location = unsafe { self.gl.GetUniformLocation(program.get(), name.as_ptr()) };
        (location >= 0).then_some(location)
    }

    fn set_uniform(&self, location: Option<Self::UniformLocation>, value: Uniform) {
        let Some(location) = location else {
            return;
        };
        unsafe {
            match value {
                Uniform::Bool(b) => self.gl.Uniform1i(location, b as GLint),
                Uniform::Int(i) => self.gl.Uniform1i(location, i),
                Uniform::Float(f) => self.gl.Uniform1f(location, f),
                Uniform::Vec2(v) => self.gl.Uniform2fv(location, 1, v.as_ptr()),
                Uniform::Vec3(v) => self.gl.Uniform3fv(location, 1, v.as_ptr()),
                Uniform::Vec4(v) => self.gl.Uniform4fv(location, 1, v.as_ptr()),
                Uniform::Mat4(m) => {
                    self.gl
                        .UniformMatrix4fv(location, 1, gl::FALSE, m.as_ptr().cast())
                }
            }
        }
    }

    fn uniform_value(
        &self,
        program: Self::Program,
        location: Self::UniformLocation,
        ty: UniformType,
    ) -> Option<Uniform> {
        let value = match ty {
            UniformType::Bool | UniformType::Int => {
                let mut value = 0;
                unsafe { self.gl.GetUniformiv(program.get(), location, &mut value) };
                if ty == UniformType::Bool {
                    Uniform::Bool(value != 0)
                } else {
                    Uniform::Int(value)
                }
            }
            _ => {
                let mut data = [0f32; 16];
                unsafe {
                    self.gl
                        .GetUniformfv(program.get(), location, data.as_mut_ptr())
                };
                Uniform::from_floats(ty, &data)?
            }
        };
        match OpenGLError::guard(&self.gl) {
            Ok(()) => Some(value),
            Err(err) => {
                tracing::debug!(message = "Cannot read uniform back", %location, %err);
                None
            }
        }
    }
}
