//! OpenGL 3.3 core bindings, generated at build time as a `Gl` struct holding the loaded entry
//! points.
#![allow(
    clippy::all,
    non_camel_case_types,
    non_snake_case,
    non_upper_case_globals,
    unused_imports
)]

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
