use std::{cell::RefCell, collections::HashMap, num::NonZeroU32, rc::Rc};

use glint_api::{Driver, ShaderStage, Uniform, UniformType};
use thiserror::Error;

use crate::compiler::{self, CompiledStage};

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FakeError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Driver could not create the object")]
    CreationFailed,
}

#[derive(Debug)]
struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: Option<CompiledStage>,
    info_log: String,
}

#[derive(Debug, Clone)]
struct AttachedStage {
    stage: ShaderStage,
    compiled: Option<CompiledStage>,
}

#[derive(Debug)]
struct UniformSlot {
    name: String,
    ty: UniformType,
    value: Uniform,
}

#[derive(Debug, Default)]
struct FakeProgram {
    attached: Vec<AttachedStage>,
    linked: bool,
    info_log: String,
    uniforms: Vec<UniformSlot>,
    delete_pending: bool,
}

#[derive(Debug, Default)]
struct State {
    last_id: u32,
    fail_next_create: bool,
    shaders: HashMap<NonZeroU32, FakeShader>,
    programs: HashMap<NonZeroU32, FakeProgram>,
    current: Option<NonZeroU32>,
    errors: Vec<FakeError>,
}

impl State {
    fn next_id(&mut self) -> Result<NonZeroU32, FakeError> {
        if std::mem::take(&mut self.fail_next_create) {
            return Err(FakeError::CreationFailed);
        }
        self.last_id += 1;
        NonZeroU32::new(self.last_id).ok_or(FakeError::CreationFailed)
    }

    fn record(&mut self, error: FakeError) {
        tracing::trace!(target: "glint_fake", %error);
        self.errors.push(error);
    }
}

fn zero_value(ty: UniformType) -> Uniform {
    match ty {
        UniformType::Bool => Uniform::Bool(false),
        UniformType::Int => Uniform::Int(0),
        UniformType::Float => Uniform::Float(0.),
        UniformType::Vec2 => Uniform::Vec2([0.; 2]),
        UniformType::Vec3 => Uniform::Vec3([0.; 3]),
        UniformType::Vec4 => Uniform::Vec4([0.; 4]),
        UniformType::Mat4 => Uniform::Mat4([[0.; 4]; 4]),
    }
}

/// Convert an uploaded value to the declared type of the uniform, following the implicit
/// conversions `glUniform1i` allows between `bool` and `int`.
fn coerce(ty: UniformType, value: Uniform) -> Option<Uniform> {
    match (ty, value) {
        (UniformType::Bool, Uniform::Int(i)) => Some(Uniform::Bool(i != 0)),
        (UniformType::Int, Uniform::Bool(b)) => Some(Uniform::Int(b as i32)),
        (ty, value) if value.ty() == ty => Some(value),
        _ => None,
    }
}

fn link(attached: &[AttachedStage]) -> Result<Vec<UniformSlot>, String> {
    let mut errors = Vec::new();
    for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
        if !attached.iter().any(|s| s.stage == stage) {
            errors.push(format!("error: program lacks a {stage} shader"));
        }
    }
    let mut uniforms: Vec<UniformSlot> = Vec::new();
    for stage in attached {
        let Some(compiled) = &stage.compiled else {
            errors.push("error: linking with uncompiled/unspecialized shader".to_string());
            continue;
        };
        if !compiled.has_main {
            errors.push(format!("error: {} shader lacks `main'", stage.stage));
        }
        for (name, ty) in &compiled.uniforms {
            match uniforms.iter().find(|slot| &slot.name == name) {
                Some(slot) if slot.ty != *ty => errors.push(format!(
                    "error: uniform `{name}' declared as type `{}' and type `{ty}'",
                    slot.ty
                )),
                Some(_) => {}
                None => uniforms.push(UniformSlot {
                    name: name.clone(),
                    ty: *ty,
                    value: zero_value(*ty),
                }),
            }
        }
    }
    if errors.is_empty() {
        Ok(uniforms)
    } else {
        Err(errors.join("\n"))
    }
}

/// Shared handle to the fake driver state. Clones observe and mutate the same objects.
#[derive(Debug, Clone, Default)]
pub struct FakeDriver {
    state: Rc<RefCell<State>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_shader` or `create_program` call fail.
    pub fn fail_next_create(&self) {
        self.state.borrow_mut().fail_next_create = true;
    }

    /// Number of shader objects that have not been deleted.
    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    /// Number of program objects that still exist, including ones pending deletion.
    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn current_program(&self) -> Option<NonZeroU32> {
        self.state.borrow().current
    }

    /// Drain the errors recorded since the last call, in the order they happened.
    pub fn take_errors(&self) -> Vec<FakeError> {
        std::mem::take(&mut self.state.borrow_mut().errors)
    }
}

impl Driver for FakeDriver {
    type Shader = NonZeroU32;
    type Program = NonZeroU32;
    type UniformLocation = i32;
    type Err = FakeError;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, Self::Err> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id()?;
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: None,
                info_log: String::new(),
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(&shader) {
            Some(shader) => shader.source = source.to_string(),
            None => state.record(FakeError::InvalidValue(format!("no shader {shader}"))),
        }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        let mut state = self.state.borrow_mut();
        let Some(shader) = state.shaders.get_mut(&shader) else {
            state.record(FakeError::InvalidValue(format!("no shader {shader}")));
            return;
        };
        match compiler::compile(&shader.source) {
            Ok(compiled) => {
                shader.compiled = Some(compiled);
                shader.info_log.clear();
            }
            Err(log) => {
                shader.compiled = None;
                shader.info_log = log;
            }
        }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(false, |shader| shader.compiled.is_some())
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|shader| shader.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: Self::Shader) {
        let mut state = self.state.borrow_mut();
        if state.shaders.remove(&shader).is_none() {
            state.record(FakeError::InvalidValue(format!("no shader {shader}")));
        }
    }

    fn create_program(&self) -> Result<Self::Program, Self::Err> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id()?;
        state.programs.insert(id, FakeProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        let mut state = self.state.borrow_mut();
        let Some(stage) = state.shaders.get(&shader).map(|shader| AttachedStage {
            stage: shader.stage,
            compiled: shader.compiled.clone(),
        }) else {
            state.record(FakeError::InvalidValue(format!("no shader {shader}")));
            return;
        };
        match state.programs.get_mut(&program) {
            Some(program) => program.attached.push(stage),
            None => state.record(FakeError::InvalidValue(format!("no program {program}"))),
        }
    }

    fn link_program(&self, program: Self::Program) {
        let mut state = self.state.borrow_mut();
        let Some(program) = state.programs.get_mut(&program) else {
            state.record(FakeError::InvalidValue(format!("no program {program}")));
            return;
        };
        match link(&program.attached) {
            Ok(uniforms) => {
                program.linked = true;
                program.uniforms = uniforms;
                program.info_log.clear();
            }
            Err(log) => {
                program.linked = false;
                program.uniforms.clear();
                program.info_log = log;
            }
        }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |program| program.linked)
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|program| program.info_log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<Self::Program>) {
        let mut state = self.state.borrow_mut();
        if let Some(id) = program {
            let error = match state.programs.get(&id).map(|p| p.linked) {
                None => Some(FakeError::InvalidValue(format!("no program {id}"))),
                Some(false) => Some(FakeError::InvalidOperation(format!(
                    "program {id} is not linked"
                ))),
                Some(true) => None,
            };
            if let Some(error) = error {
                state.record(error);
                return;
            }
        }
        let previous = std::mem::replace(&mut state.current, program);
        if let Some(previous) = previous.filter(|&previous| Some(previous) != program) {
            if state
                .programs
                .get(&previous)
                .map_or(false, |p| p.delete_pending)
            {
                state.programs.remove(&previous);
            }
        }
    }

    fn delete_program(&self, program: Self::Program) {
        let mut state = self.state.borrow_mut();
        if state.current == Some(program) {
            match state.programs.get_mut(&program) {
                Some(program) => program.delete_pending = true,
                None => state.record(FakeError::InvalidValue(format!("no program {program}"))),
            }
        } else if state.programs.remove(&program).is_none() {
            state.record(FakeError::InvalidValue(format!("no program {program}")));
        }
    }

    fn is_program(&self, program: Self::Program) -> bool {
        self.state.borrow().programs.contains_key(&program)
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        let mut state = self.state.borrow_mut();
        let result = match state.programs.get(&program) {
            Some(p) if p.linked => Ok(p
                .uniforms
                .iter()
                .position(|slot| slot.name == name)
                .map(|idx| idx as i32)),
            Some(_) => Err(FakeError::InvalidOperation(format!(
                "program {program} is not linked"
            ))),
            None => Err(FakeError::InvalidValue(format!("no program {program}"))),
        };
        result.unwrap_or_else(|error| {
            state.record(error);
            None
        })
    }

    fn set_uniform(&self, location: Option<Self::UniformLocation>, value: Uniform) {
        let Some(location) = location else {
            return;
        };
        let mut state = self.state.borrow_mut();
        let Some(current) = state.current else {
            state.record(FakeError::InvalidOperation("no current program".to_string()));
            return;
        };
        let slot = state
            .programs
            .get_mut(&current)
            .and_then(|program| program.uniforms.get_mut(location as usize));
        let error = match slot {
            Some(slot) => match coerce(slot.ty, value) {
                Some(value) => {
                    slot.value = value;
                    return;
                }
                None => FakeError::InvalidOperation(format!(
                    "uniform `{}' is a {}, cannot upload a {}",
                    slot.name,
                    slot.ty,
                    value.ty()
                )),
            },
            None => FakeError::InvalidOperation(format!(
                "location {location} is not valid for program {current}"
            )),
        };
        state.record(error);
    }

    fn uniform_value(
        &self,
        program: Self::Program,
        location: Self::UniformLocation,
        ty: UniformType,
    ) -> Option<Uniform> {
        let mut state = self.state.borrow_mut();
        let slot = state
            .programs
            .get(&program)
            .filter(|program| program.linked)
            .and_then(|program| program.uniforms.get(location as usize));
        let error = match slot {
            Some(slot) => match coerce(ty, slot.value) {
                Some(value) => return Some(value),
                None => FakeError::InvalidOperation(format!(
                    "uniform `{}' is a {}, cannot read it back as a {ty}",
                    slot.name, slot.ty
                )),
            },
            None => FakeError::InvalidOperation(format!(
                "location {location} is not valid for program {program}"
            )),
        };
        state.record(error);
        None
    }
}
