//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.

pub mod map_pipeline;

pub use map_pipeline::MapRenderState;
