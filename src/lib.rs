//! flow-mesh
//!
//! Turns imported 3D scenes into GPU meshes and draws them. A scene file is
//! flattened into a list of meshes, each owning its vertex/index buffers, an
//! attribute layout (optionally with a per-instance transform) and a material.
//! Every frame each mesh pushes its material to the shader, either as constant
//! colours or as a set of named texture samplers, and issues one draw.
//!
//! High-level modules
//! - `backend`: the seam through which meshes create buffers and load textures
//! - `shader`: the seam meshes render through (named uniforms, draws)
//! - `camera`: view-projection provider
//! - `context`: wgpu device/queue and the wgpu backend
//! - `data_structures`: meshes, materials, models, scene graphs and instances
//! - `pipelines`: wgpu bind groups that back the material uniforms
//! - `resources`: scene importers (OBJ, glTF) and texture loading
//!

pub mod backend;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod pipelines;
pub mod resources;
pub mod shader;

// Re-exports commonly used types for convenience in downstream code.
pub use backend::{Backend, BufferUsage};
pub use data_structures::{
    material::{Material, TextureKind},
    mesh::{Mesh, Vertex},
    model::{DEFAULT_SHININESS, Model},
};
pub use shader::{DrawTarget, MeshPass, ShaderProgram};
pub use cgmath;
pub use wgpu;
