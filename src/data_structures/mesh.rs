//! GPU-resident meshes and their draw protocol.

use std::{mem, sync::Arc};

use cgmath::Matrix4;

use crate::{
    backend::{Backend, BufferUsage},
    data_structures::{
        material::{Material, TextureKind},
        vertex_array::{BufferLayout, VertexArray},
    },
    shader::{MeshPass, uniforms},
};

/// The packed per-vertex record uploaded to the vertex buffer.
///
/// Field order is part of the GPU contract: `position` at byte 0, `normal` at
/// 12 and `tex_coords` at 24 within a 32 byte stride.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub const POSITION_LOCATION: u32 = 0;
    pub const NORMAL_LOCATION: u32 = 1;
    pub const TEX_COORDS_LOCATION: u32 = 2;

    /// Slots 0 to 2, advancing per vertex.
    pub fn layout() -> BufferLayout {
        BufferLayout::per_vertex(mem::size_of::<Vertex>() as wgpu::BufferAddress)
            .attribute(Self::POSITION_LOCATION, 3, mem::offset_of!(Vertex, position) as u64)
            .attribute(Self::NORMAL_LOCATION, 3, mem::offset_of!(Vertex, normal) as u64)
            .attribute(Self::TEX_COORDS_LOCATION, 2, mem::offset_of!(Vertex, tex_coords) as u64)
    }
}

/// First shader location of the per-instance transform; a mat4 takes four consecutive slots.
pub const INSTANCE_TRANSFORM_LOCATION: u32 = 3;

/// Slots 3 to 6, one vec4 of the 4x4 transform each, advancing per instance.
pub fn instance_layout() -> BufferLayout {
    let row = mem::size_of::<[f32; 4]>() as wgpu::BufferAddress;
    (0..4).fold(
        BufferLayout::per_instance(mem::size_of::<[[f32; 4]; 4]>() as wgpu::BufferAddress),
        |layout, i| layout.attribute(INSTANCE_TRANSFORM_LOCATION + i, 4, row * i as u64),
    )
}

/// One mesh: geometry on the GPU, its material and optional instancing.
///
/// `instanced` is true exactly when the mesh was built with at least one
/// instance transform. Nothing about a mesh changes after construction.
pub struct Mesh<B: Backend> {
    name: String,
    index_count: u32,
    material: Material<B>,
    instanced: bool,
    instance_count: u32,
    vertex_array: VertexArray<B>,
}

impl<B: Backend> Mesh<B> {
    /// Upload `vertices` and `indices` and describe their layout; with a
    /// non-empty `instances` slice, also upload one transform per instance.
    ///
    /// # Panics
    ///
    /// If `vertices` or `indices` is empty. Callers are expected to filter
    /// such meshes out before they reach the GPU.
    pub fn new(
        backend: &B,
        name: &str,
        vertices: &[Vertex],
        indices: &[u32],
        material: Material<B>,
        instances: Option<&[Matrix4<f32>]>,
    ) -> Self {
        assert!(!vertices.is_empty(), "mesh {name:?} has no vertices");
        assert!(!indices.is_empty(), "mesh {name:?} has no indices");

        let vertex_buffer = backend.create_buffer(
            &format!("{name} Vertex Buffer"),
            bytemuck::cast_slice(vertices),
            BufferUsage::Vertex,
        );
        let index_buffer = backend.create_buffer(
            &format!("{name} Index Buffer"),
            bytemuck::cast_slice(indices),
            BufferUsage::Index,
        );

        let mut builder = VertexArray::builder().buffer(Arc::new(vertex_buffer), Vertex::layout());

        let instances = instances.filter(|instances| !instances.is_empty());
        let instance_count = instances.map_or(0, |instances| instances.len() as u32);
        if let Some(instances) = instances {
            let raw: Vec<[[f32; 4]; 4]> = instances.iter().map(|&m| m.into()).collect();
            let instance_buffer = backend.create_buffer(
                &format!("{name} Instance Buffer"),
                bytemuck::cast_slice(&raw),
                BufferUsage::Vertex,
            );
            builder = builder.buffer(Arc::new(instance_buffer), instance_layout());
        }

        Self {
            name: name.to_string(),
            index_count: indices.len() as u32,
            material,
            instanced: instances.is_some(),
            instance_count,
            vertex_array: builder.build(Arc::new(index_buffer)),
        }
    }

    /// Push the material to the shader, bind the geometry and draw it once.
    ///
    /// Untextured materials send their three colours. Textured ones bind each
    /// texture to the unit matching its position in the list, under a sampler
    /// name numbered per kind: `[Diffuse, Specular, Diffuse]` ends up as
    /// `mat.diffuseTexture0`@0, `mat.specularTexture0`@1, `mat.diffuseTexture1`@2.
    pub fn render<P: MeshPass<B> + ?Sized>(&self, pass: &mut P) {
        pass.set_f32(uniforms::SHININESS, self.material.shininess);

        if !self.material.uses_textures() {
            pass.set_vec3(uniforms::AMBIENT, self.material.ambient);
            pass.set_vec3(uniforms::DIFFUSE, self.material.diffuse);
            pass.set_vec3(uniforms::SPECULAR, self.material.specular);
            pass.set_bool(uniforms::USE_TEXTURES, false);
        } else {
            pass.set_bool(uniforms::USE_TEXTURES, true);
            let mut num_diffuse = 0;
            let mut num_specular = 0;
            for (unit, texture) in self.material.textures.iter().enumerate() {
                let counter = match texture.kind {
                    TextureKind::Diffuse => &mut num_diffuse,
                    TextureKind::Specular => &mut num_specular,
                };
                let name = format!("{}{}", texture.kind.uniform_prefix(), counter);
                *counter += 1;
                pass.bind_texture(&name, &texture.texture, unit as u32);
            }
        }

        pass.bind_vertex_array(&self.vertex_array);
        if self.instanced {
            pass.draw_indexed_instanced(self.index_count, self.instance_count);
        } else {
            pass.draw_indexed(self.index_count);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn material(&self) -> &Material<B> {
        &self.material
    }

    pub fn instanced(&self) -> bool {
        self.instanced
    }

    /// Number of instances drawn; 0 for non-instanced meshes.
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    pub fn vertex_array(&self) -> &VertexArray<B> {
        &self.vertex_array
    }
}
