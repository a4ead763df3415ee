use std::{ffi::OsString, path::PathBuf, time::Instant};

use eyre::Result;
use glam::{vec3, Mat4};
use glint::{
    logging::{self, LogConfig},
    GlShaderProgram,
};
use glint_gl::{gl, GlWindow, WindowDesc};
use winit::{
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::EventLoop,
};

const VERTICES: [[f32; 2]; 3] = [[-0.5, -0.5], [0., 0.5], [0.5, -0.5]];

/// Upload the triangle and describe it in a vertex array, left bound.
unsafe fn create_triangle(gl: &gl::Gl) -> u32 {
    let mut vao = 0;
    gl.GenVertexArrays(1, &mut vao);
    gl.BindVertexArray(vao);

    let mut vbo = 0;
    gl.GenBuffers(1, &mut vbo);
    gl.BindBuffer(gl::ARRAY_BUFFER, vbo);
    gl.BufferData(
        gl::ARRAY_BUFFER,
        std::mem::size_of_val(&VERTICES) as _,
        VERTICES.as_ptr().cast(),
        gl::STATIC_DRAW,
    );
    gl.VertexAttribPointer(0, 2, gl::FLOAT, gl::FALSE, 0, std::ptr::null());
    gl.EnableVertexAttribArray(0);
    vao
}

fn shader_path(arg: Option<OsString>, default: &str) -> PathBuf {
    arg.map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("assets/shaders")
            .join(default)
    })
}

fn main() -> Result<()> {
    logging::init(&LogConfig::from_env())?;

    let mut args = std::env::args_os().skip(1);
    let vertex_path = shader_path(args.next(), "triangle.vert");
    let fragment_path = shader_path(args.next(), "triangle.frag");

    let event_loop = EventLoop::new();
    let window = GlWindow::new(
        &event_loop,
        WindowDesc {
            title: "Hello Triangle".to_string(),
            ..Default::default()
        },
    )?;
    let program = GlShaderProgram::new(window.driver(), &vertex_path, &fragment_path);
    if !program.is_linked() {
        eyre::bail!(
            "Shader program from {} and {} is not usable, see the log above",
            vertex_path.display(),
            fragment_path.display()
        );
    }
    let vao = unsafe {
        let gl = window.driver().gl();
        gl.Enable(gl::BLEND);
        gl.BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
        create_triangle(gl)
    };
    let start = Instant::now();
    let mut invert = false;

    event_loop.run(move |event, _, control_flow| {
        control_flow.set_poll();
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => control_flow.set_exit(),
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(VirtualKeyCode::Space),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => invert = !invert,
                WindowEvent::Resized(size) => {
                    if let Err(err) = window.resize(size) {
                        tracing::warn!(%err, "Cannot resize window surface");
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared => window.window().request_redraw(),
            Event::RedrawRequested(_) => {
                let t = start.elapsed().as_secs_f32();
                let size = window.physical_size();
                let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
                let transform = Mat4::orthographic_rh_gl(-aspect, aspect, -1., 1., -1., 1.)
                    * Mat4::from_rotation_z(t * 0.5);

                let gl = window.driver().gl();
                unsafe {
                    gl.ClearColor(0.1, 0.1, 0.1, 1.);
                    gl.Clear(gl::COLOR_BUFFER_BIT);
                }
                program.use_program();
                program.set_vec3(
                    "color",
                    vec3(t.sin(), (t + 2.).sin(), (t + 4.).sin()) * 0.5 + 0.5,
                );
                program.set_float("opacity", 0.75 + 0.25 * (t * 2.).cos());
                program.set_mat4("transform", transform);
                program.set_bool("invert", invert);
                unsafe {
                    gl.BindVertexArray(vao);
                    gl.DrawArrays(gl::TRIANGLES, 0, VERTICES.len() as _);
                }

                if let Err(err) = window.swap_buffers() {
                    tracing::error!(%err, "Cannot present frame");
                    control_flow.set_exit();
                }
            }
            _ => {}
        }
    })
}
