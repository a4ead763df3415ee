//! In-memory [`Driver`](glint_api::Driver) for exercising shader programs without a GPU.
//!
//! The fake follows OpenGL object semantics closely enough for behavioral tests: handles are
//! distinct non-zero integers, compile and link outcomes are reported through status queries and
//! info logs, uniform uploads target the current program, and a program deleted while current
//! stays alive until it is unbound.

mod compiler;
mod driver;

pub use driver::{FakeDriver, FakeError};
