use std::{ffi::c_void, sync::Arc};

use thread_guard::ThreadGuard;

pub use gl;

pub mod api;
pub mod driver;
pub mod thread_guard;
pub mod window;

pub use api::OpenGLError;
pub use driver::OpenGLDriver;
pub use window::{GlWindow, WindowDesc, WindowError};

type Gl = Arc<ThreadGuard<gl::Gl>>;

fn load_with(loader: impl FnMut(&'static str) -> *const c_void) -> Gl {
    let gl = gl::Gl::load_with(loader);
    Arc::new(ThreadGuard::new(gl))
}
