//! wgpu implementation of the graphics backend

mod backend;
mod context;
mod pipeline;

pub use backend::WgpuBackend;
pub use context::GpuContext;
pub use pipeline::{GlobePipelines, MaterialUniforms, SceneUniforms};
