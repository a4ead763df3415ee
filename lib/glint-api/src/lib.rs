pub mod bind;
pub mod driver;
pub mod uniform;

pub use bind::Bind;
pub use driver::{Driver, ShaderStage};
pub use uniform::{Uniform, UniformType};
