use std::{ffi::CString, num::NonZeroU32};

use glutin::{
    config::{Api, ConfigTemplateBuilder},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::GetGlDisplay,
    prelude::*,
    surface::{Surface, SurfaceAttributesBuilder, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasRawWindowHandle;
use thiserror::Error;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event_loop::EventLoopWindowTarget,
    window::{Window, WindowBuilder},
};

use crate::driver::OpenGLDriver;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Glutin context error: {0}")]
    Glutin(#[from] glutin::error::Error),
    #[error("Cannot create OpenGL configuration & window: {0}")]
    Display(String),
    #[error("No window despite configuration")]
    NoWindow,
    #[error("Window surface has a zero dimension")]
    ZeroSize,
}

#[derive(Debug, Clone)]
pub struct WindowDesc {
    pub title: String,
    pub logical_size: LogicalSize<f64>,
    pub visible: bool,
}

impl Default for WindowDesc {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            logical_size: LogicalSize::new(800., 600.),
            visible: true,
        }
    }
}

/// A window with a current OpenGL 3.3 core context and the driver loaded from it.
pub struct GlWindow {
    window: Window,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    driver: OpenGLDriver,
}

fn surface_size(size: PhysicalSize<u32>) -> Result<(NonZeroU32, NonZeroU32), WindowError> {
    NonZeroU32::new(size.width)
        .zip(NonZeroU32::new(size.height))
        .ok_or(WindowError::ZeroSize)
}

impl GlWindow {
    pub fn new<T>(
        event_loop: &EventLoopWindowTarget<T>,
        desc: WindowDesc,
    ) -> Result<Self, WindowError> {
        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(
            WindowBuilder::new()
                .with_title(desc.title)
                .with_inner_size(desc.logical_size)
                .with_visible(desc.visible),
        ));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .inspect(|config| tracing::debug!(message="Potential config", api=?config.api(), depth_size=%config.depth_size()))
                    .reduce(|best, config| {
                        let usable = config.api().contains(Api::OPENGL) && config.depth_size() >= 24;
                        let best_usable = best.api().contains(Api::OPENGL) && best.depth_size() >= 24;
                        if usable && !best_usable {
                            config
                        } else {
                            best
                        }
                    })
                    .expect("Display reported no framebuffer configuration")
            })
            .map_err(|err| WindowError::Display(err.to_string()))?;
        let window = window.ok_or(WindowError::NoWindow)?;
        tracing::debug!(message="Using config", api=?gl_config.api(), depth_size=%gl_config.depth_size());

        let raw_window_handle = Some(window.raw_window_handle());
        let gl_display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_debug(cfg!(debug_assertions))
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(raw_window_handle);
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes)? };

        let (width, height) = surface_size(window.inner_size())?;
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window.raw_window_handle(),
            width,
            height,
        );
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs)? };
        let context = not_current.make_current(&surface)?;

        let driver = OpenGLDriver::load_with(|sym| match CString::new(sym) {
            Ok(sym) => gl_display.get_proc_address(sym.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        let describe = |name| {
            driver
                .get_string(name)
                .unwrap_or_else(|_| "<None>".to_string())
        };
        tracing::info!(
            target: "gl",
            version = %describe(gl::VERSION),
            vendor = %describe(gl::VENDOR),
            renderer = %describe(gl::RENDERER),
            shading_language = %describe(gl::SHADING_LANGUAGE_VERSION),
        );

        Ok(Self {
            window,
            surface,
            context,
            driver,
        })
    }

    pub fn driver(&self) -> &OpenGLDriver {
        &self.driver
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn physical_size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    pub fn resize(&self, size: PhysicalSize<u32>) -> Result<(), WindowError> {
        let (width, height) = surface_size(size)?;
        self.surface.resize(&self.context, width, height);
        unsafe {
            self.driver
                .gl()
                .Viewport(0, 0, size.width as _, size.height as _);
        }
        Ok(())
    }

    pub fn swap_buffers(&self) -> Result<(), WindowError> {
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }
}
