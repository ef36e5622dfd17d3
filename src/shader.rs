//! Shader and draw seams used by [`Mesh::render`](crate::data_structures::mesh::Mesh::render).
//!
//! A mesh pushes its material as named uniforms, binds its vertex array and
//! issues exactly one indexed draw. Anything that can take those calls in
//! order (a wgpu render pass, a recorder in tests) implements [`MeshPass`].

use cgmath::Vector3;

use crate::{backend::Backend, data_structures::vertex_array::VertexArray};

/// Uniform names understood by material shaders.
pub mod uniforms {
    pub const SHININESS: &str = "mat.shininess";
    pub const AMBIENT: &str = "mat.ambient";
    pub const DIFFUSE: &str = "mat.diffuse";
    pub const SPECULAR: &str = "mat.specular";
    pub const USE_TEXTURES: &str = "mat.useTextures";
    /// Prefix of the diffuse samplers, followed by a per-kind index (`mat.diffuseTexture0`, ...).
    pub const DIFFUSE_TEXTURE: &str = "mat.diffuseTexture";
    /// Prefix of the specular samplers, followed by a per-kind index.
    pub const SPECULAR_TEXTURE: &str = "mat.specularTexture";
}

/// Named-uniform setters of the currently used shader program.
pub trait ShaderProgram<B: Backend> {
    fn set_f32(&mut self, name: &str, value: f32);
    fn set_vec3(&mut self, name: &str, value: Vector3<f32>);
    fn set_bool(&mut self, name: &str, value: bool);
    /// Bind `texture` to texture unit `unit` and point the sampler uniform `name` at it.
    fn bind_texture(&mut self, name: &str, texture: &B::Texture, unit: u32);
}

/// Geometry binding and draw submission.
///
/// Every draw uses triangle-list topology, 32-bit indices and a base vertex of 0.
pub trait DrawTarget<B: Backend> {
    fn bind_vertex_array(&mut self, vertex_array: &VertexArray<B>);
    fn draw_indexed(&mut self, index_count: u32);
    fn draw_indexed_instanced(&mut self, index_count: u32, instance_count: u32);
}

/// A shader program bound inside something that can draw.
///
/// Taken by `&mut` so that only one mesh at a time can touch the bound state.
pub trait MeshPass<B: Backend>: ShaderProgram<B> + DrawTarget<B> {}

impl<B: Backend, T: ShaderProgram<B> + DrawTarget<B> + ?Sized> MeshPass<B> for T {}
