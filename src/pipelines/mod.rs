//! wgpu-side shader plumbing for meshes.
//!
//! - `material` emulates named material uniforms and texture units with bind groups

pub mod material;
