use std::{fmt, path::Path};

use glam::{Mat4, Vec2, Vec3, Vec4};
use glint_api::{Bind, Driver, ShaderStage, Uniform};

use crate::error::ProgramError;

/// A compiled stage, deleted when dropped. Once attached to a program the driver keeps what it
/// needs for linking, so stages only live for the duration of the build.
struct Stage<'d, D: Driver> {
    driver: &'d D,
    id: D::Shader,
}

impl<'d, D: Driver> Stage<'d, D> {
    fn compile(driver: &'d D, stage: ShaderStage, source: &str) -> Result<Self, ProgramError> {
        let id = driver.create_shader(stage).map_err(ProgramError::driver)?;
        let this = Self { driver, id };
        driver.shader_source(id, source);
        driver.compile_shader(id);
        if !driver.shader_compile_status(id) {
            // The stage stays attached so that linking reports on it too.
            ProgramError::Compile {
                stage,
                info_log: driver.shader_info_log(id),
            }
            .report();
        }
        Ok(this)
    }
}

impl<D: Driver> Drop for Stage<'_, D> {
    fn drop(&mut self) {
        self.driver.delete_shader(self.id);
    }
}

fn read_source(path: &Path) -> Result<String, ProgramError> {
    std::fs::read_to_string(path).map_err(|source| ProgramError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn build<D: Driver>(
    driver: &D,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<D::Program, ProgramError> {
    let vertex = Stage::compile(driver, ShaderStage::Vertex, vertex_source)?;
    let fragment = Stage::compile(driver, ShaderStage::Fragment, fragment_source)?;

    let program = driver.create_program().map_err(ProgramError::driver)?;
    driver.attach_shader(program, vertex.id);
    driver.attach_shader(program, fragment.id);
    driver.link_program(program);
    if !driver.program_link_status(program) {
        ProgramError::Link {
            info_log: driver.program_info_log(program),
        }
        .report();
    }
    Ok(program)
}

/// A vertex + fragment shader program, owned by this value and deleted when it is dropped.
///
/// Building never fails: problems with the sources are logged, and the program is left either
/// unlinked or without a handle at all. Use [`ShaderProgram::is_linked`] to find out which.
///
/// Uniform setters write into the driver's *current* program, so [`ShaderProgram::use_program`]
/// has to be called first. Setting a uniform the program does not declare does nothing.
pub struct ShaderProgram<D: Driver> {
    driver: D,
    handle: Option<D::Program>,
}

impl<D: Driver> fmt::Debug for ShaderProgram<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ShaderProgram").field(&self.handle).finish()
    }
}

impl<D: Driver> ShaderProgram<D> {
    /// Read, compile and link the GLSL sources at `vertex_path` and `fragment_path`.
    pub fn new(driver: &D, vertex_path: impl AsRef<Path>, fragment_path: impl AsRef<Path>) -> Self {
        let vertex_path = vertex_path.as_ref();
        let fragment_path = fragment_path.as_ref();
        let _span = tracing::debug_span!(
            "shader_program",
            vertex = %vertex_path.display(),
            fragment = %fragment_path.display(),
        )
        .entered();

        match (read_source(vertex_path), read_source(fragment_path)) {
            (Ok(vertex), Ok(fragment)) => Self::from_sources(driver, &vertex, &fragment),
            (vertex, fragment) => {
                for err in [vertex.err(), fragment.err()].into_iter().flatten() {
                    err.report();
                }
                Self {
                    driver: driver.clone(),
                    handle: None,
                }
            }
        }
    }

    /// Compile and link in-memory GLSL sources.
    pub fn from_sources(driver: &D, vertex_source: &str, fragment_source: &str) -> Self {
        let handle = match build(driver, vertex_source, fragment_source) {
            Ok(program) => {
                tracing::debug!(?program, "Created shader program");
                Some(program)
            }
            Err(err) => {
                err.report();
                None
            }
        };
        Self {
            driver: driver.clone(),
            handle,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Driver handle of the program, `None` when building stopped before a program was created.
    pub fn handle(&self) -> Option<D::Program> {
        self.handle
    }

    /// Whether the driver reports the program as successfully linked.
    pub fn is_linked(&self) -> bool {
        self.handle
            .map_or(false, |program| self.driver.program_link_status(program))
    }

    /// Make this program the current one for subsequent draws and uniform uploads.
    pub fn use_program(&self) {
        self.driver.use_program(self.handle);
    }

    pub fn uniform_location(&self, name: &str) -> Option<D::UniformLocation> {
        self.driver.uniform_location(self.handle?, name)
    }

    pub fn set_uniform(&self, name: &str, value: impl Into<Uniform>) {
        let location = self.uniform_location(name);
        if location.is_none() {
            tracing::trace!(name, "Uniform not found in program");
        }
        self.driver.set_uniform(location, value.into());
    }

    /// Booleans are uploaded as integers, `0` or `1`.
    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_uniform(name, value as i32);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.set_uniform(name, value);
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.set_uniform(name, value);
    }

    pub fn set_vec2(&self, name: &str, value: impl Into<Vec2>) {
        self.set_uniform(name, value.into());
    }

    pub fn set_vec3(&self, name: &str, value: impl Into<Vec3>) {
        self.set_uniform(name, value.into());
    }

    pub fn set_vec4(&self, name: &str, value: impl Into<Vec4>) {
        self.set_uniform(name, value.into());
    }

    pub fn set_mat4(&self, name: &str, value: Mat4) {
        self.set_uniform(name, value);
    }
}

impl<D: Driver> Bind for ShaderProgram<D> {
    type Id = Option<D::Program>;

    fn id(&self) -> Self::Id {
        self.handle
    }

    fn bind(&self) {
        self.use_program();
    }

    fn unbind(&self) {
        self.driver.use_program(None);
    }
}

impl<D: Driver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        if let Some(program) = self.handle.take() {
            tracing::trace!(?program, "Deleting shader program");
            self.driver.delete_program(program);
        }
    }
}
