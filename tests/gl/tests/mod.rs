use std::path::{Path, PathBuf};

use glint_gl::OpenGLDriver;

pub mod program;

#[derive(Debug)]
pub struct IntegrationTest {
    pub name: &'static str,
    pub test_fn: fn(&OpenGLDriver),
}

inventory::collect!(IntegrationTest);

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}
