use std::panic::{self, AssertUnwindSafe};

use eyre::Result;
use glint::{
    logging::{self, LogConfig},
    Driver,
};
use glint_gl::{GlWindow, WindowDesc};
use winit::event_loop::EventLoop;

use crate::tests::IntegrationTest;

pub mod tests;

fn display_available() -> bool {
    if cfg!(all(unix, not(target_os = "macos"))) {
        std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
    } else {
        true
    }
}

fn main() -> Result<()> {
    logging::init(&LogConfig::from_env())?;
    if !display_available() {
        eprintln!("No display available, skipping GL integration tests");
        return Ok(());
    }

    let event_loop = EventLoop::new();
    let window = match GlWindow::new(
        &event_loop,
        WindowDesc {
            title: "glint integration tests".to_string(),
            visible: false,
            ..Default::default()
        },
    ) {
        Ok(window) => window,
        Err(err) => {
            eprintln!("Cannot create an OpenGL 3.3 context ({err}), skipping GL integration tests");
            return Ok(());
        }
    };
    let driver = window.driver();

    let mut failed = Vec::new();
    for test in inventory::iter::<IntegrationTest> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| (test.test_fn)(driver)));
        driver.use_program(None);
        match result {
            Ok(()) => eprintln!("test {} ... ok", test.name),
            Err(_) => {
                eprintln!("test {} ... FAILED", test.name);
                failed.push(test.name);
            }
        }
    }

    if !failed.is_empty() {
        eyre::bail!(
            "{} GL integration test(s) failed: {}",
            failed.len(),
            failed.join(", ")
        );
    }
    Ok(())
}
