//! wgpu render backend for the viewer.
//!
//! Shader sources are WGSL. They are parsed and checked with naga before
//! any GPU object is created, then turned into a render pipeline with a
//! single uniform block holding the `model`, `view` and `projection`
//! matrices.
//!
//! # Invariants
//! - A [`ShaderProgram`] always satisfies the uniform and vertex attribute
//!   contract checked by [`link_stages`].
//! - Mesh buffers are immutable after upload.
//! - GPU objects are released when their owning value is dropped.

mod buffers;
mod context;
mod gpu;
mod program;
mod reflect;

pub use buffers::MeshBuffers;
pub use context::{GpuContext, GpuError};
pub use gpu::WgpuRenderer;
pub use program::{ShaderProgram, WgpuShaderBackend, WgpuStage};
pub use reflect::{compile_wgsl, link_stages, CompiledStage, NagaBackend, ProgramInterface, UniformLayout};
