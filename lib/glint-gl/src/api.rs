use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use thiserror::Error;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Error, FromPrimitive)]
#[repr(u32)]
pub enum OpenGLError {
    #[error("Provided enum value is not valid")]
    InvalidEnum = gl::INVALID_ENUM,
    #[error("Provided value is not valid")]
    InvalidValue = gl::INVALID_VALUE,
    #[error("Invalid OpenGL operation")]
    InvalidOperation = gl::INVALID_OPERATION,
    #[error("Out of memory")]
    OutOfMemory = gl::OUT_OF_MEMORY,
    #[error("Invalid OpenGL operation on the framebuffer")]
    InvalidFramebufferOperation = gl::INVALID_FRAMEBUFFER_OPERATION,
    #[error("Unknown OpenGL error")]
    UnknownError,
}

impl OpenGLError {
    /// Pop the oldest pending error flag of the context, if any.
    pub fn current_error(gl: &gl::Gl) -> Option<Self> {
        let error = unsafe { gl.GetError() };
        if error != gl::NO_ERROR {
            Some(OpenGLError::from_u32(error).unwrap_or(OpenGLError::UnknownError))
        } else {
            None
        }
    }

    pub fn guard(gl: &gl::Gl) -> Result<(), Self> {
        if let Some(err) = Self::current_error(gl) {
            Err(err)
        } else {
            Ok(())
        }
    }
}
