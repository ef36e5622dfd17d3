//! GPU resource seam.
//!
//! Meshes and models never talk to a graphics API directly. They create their
//! buffers and textures through a [`Backend`], which hands back opaque handles
//! that are then shared via `Arc` between the meshes that use them. The wgpu
//! implementation lives in [`crate::context::GpuContext`].

use std::path::Path;

/// What a buffer created through [`Backend::create_buffer`] is going to be bound as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferUsage {
    /// Per-vertex or per-instance attribute data.
    Vertex,
    /// 32-bit triangle indices.
    Index,
}

/// Creates the GPU resources a mesh needs.
///
/// Handles are owned by whoever receives them; the core wraps them in `Arc`
/// so several meshes can hold on to the same buffer or texture.
pub trait Backend {
    type Buffer;
    type Texture;

    /// Upload `contents` into a new immutable buffer.
    fn create_buffer(&self, label: &str, contents: &[u8], usage: BufferUsage) -> Self::Buffer;

    /// Decode the image at `path` and upload it as a sampled texture.
    fn load_texture(&self, path: &Path) -> anyhow::Result<Self::Texture>;
}
