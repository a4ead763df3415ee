use std::fmt;

use duplicate::duplicate_item;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Value types a uniform can be uploaded as.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformType {
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
}

impl UniformType {
    /// Number of scalar components stored for a value of this type.
    pub fn component_count(self) -> usize {
        match self {
            Self::Bool | Self::Int | Self::Float => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
            Self::Mat4 => 16,
        }
    }

    /// Parse a GLSL type keyword.
    pub fn from_glsl(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "bool" => Self::Bool,
            "int" => Self::Int,
            "float" => Self::Float,
            "vec2" => Self::Vec2,
            "vec3" => Self::Vec3,
            "vec4" => Self::Vec4,
            "mat4" => Self::Mat4,
            _ => return None,
        })
    }

    pub fn glsl_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Mat4 => "mat4",
        }
    }
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glsl_name())
    }
}

/// A typed uniform value. Matrices are stored column-major.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Uniform {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([[f32; 4]; 4]),
}

impl Uniform {
    pub fn ty(&self) -> UniformType {
        match self {
            Self::Bool(_) => UniformType::Bool,
            Self::Int(_) => UniformType::Int,
            Self::Float(_) => UniformType::Float,
            Self::Vec2(_) => UniformType::Vec2,
            Self::Vec3(_) => UniformType::Vec3,
            Self::Vec4(_) => UniformType::Vec4,
            Self::Mat4(_) => UniformType::Mat4,
        }
    }

    /// Rebuild a float-backed value from its components, as returned by a driver read-back.
    ///
    /// Returns `None` for integer-backed types or when the slice is too short.
    pub fn from_floats(ty: UniformType, data: &[f32]) -> Option<Self> {
        if data.len() < ty.component_count() {
            return None;
        }
        Some(match ty {
            UniformType::Float => Self::Float(data[0]),
            UniformType::Vec2 => Self::Vec2([data[0], data[1]]),
            UniformType::Vec3 => Self::Vec3([data[0], data[1], data[2]]),
            UniformType::Vec4 => Self::Vec4([data[0], data[1], data[2], data[3]]),
            UniformType::Mat4 => Self::Mat4(Mat4::from_cols_slice(&data[..16]).to_cols_array_2d()),
            UniformType::Bool | UniformType::Int => return None,
        })
    }
}

impl From<bool> for Uniform {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Uniform {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for Uniform {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

#[duplicate_item(
arr            variant;
[[f32; 2]]     [Vec2];
[[f32; 3]]     [Vec3];
[[f32; 4]]     [Vec4];
[[[f32; 4]; 4]] [Mat4];
)]
impl From<arr> for Uniform {
    fn from(value: arr) -> Self {
        Self::variant(value)
    }
}

#[duplicate_item(
glam_ty     variant;
[Vec2]      [Vec2];
[Vec3]      [Vec3];
[Vec4]      [Vec4];
)]
impl From<glam_ty> for Uniform {
    fn from(value: glam_ty) -> Self {
        Self::variant(value.to_array())
    }
}

impl From<Mat4> for Uniform {
    fn from(value: Mat4) -> Self {
        Self::Mat4(value.to_cols_array_2d())
    }
}
