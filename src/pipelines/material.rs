//! Named material uniforms and texture units on top of wgpu.
//!
//! wgpu has neither uniform names nor texture units, so [`MaterialPass`]
//! emulates both for [`Mesh::render`](crate::data_structures::mesh::Mesh::render):
//!
//! - the `mat.*` scalar and vector uniforms are fields of [`MaterialUniform`].
//!   Each draw gets its own slot in one dynamic-offset uniform buffer
//!   (group [`MATERIAL_GROUP`], binding 0), so every mesh of a pass sees its
//!   own values once the queue is submitted;
//! - texture unit `n` is texture binding `2n` and sampler binding `2n + 1` of
//!   group [`TEXTURE_GROUP`]. Units a material leaves empty hold a white texture;
//! - a sampler uniform (`mat.diffuseTexture{i}` / `mat.specularTexture{i}`) is
//!   the unit index stored in `diffuse_units[i]` / `specular_units[i]`.
//!
//! Colours and shininess stay staged until overwritten, like GL uniforms.
//! Texture units and sampler indices do not: writing `mat.useTextures`, which
//! every mesh does before binding its textures, unbinds all units so a mesh
//! never samples textures left behind by the previous one.
//!
//! The WGSL side of the uniform block is
//!
//! ```wgsl
//! struct Material {
//!     ambient: vec3<f32>,
//!     shininess: f32,
//!     diffuse: vec3<f32>,
//!     use_textures: u32,
//!     specular: vec3<f32>,
//!     _padding: u32,
//!     diffuse_units: vec4<u32>,
//!     specular_units: vec4<u32>,
//! }
//! ```

use std::num::NonZeroU64;

use cgmath::Vector3;

use crate::{
    context::GpuContext,
    data_structures::{texture::{Texture, create_default_sampler}, vertex_array::VertexArray},
    shader::{DrawTarget, ShaderProgram, uniforms},
};

pub const MATERIAL_GROUP: u32 = 0;
pub const TEXTURE_GROUP: u32 = 1;
/// Texture units available to one material.
pub const MAX_TEXTURE_UNITS: usize = 8;
/// Sampler uniforms available per texture kind.
pub const MAX_TEXTURES_PER_KIND: usize = 4;

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub ambient: [f32; 3],
    pub shininess: f32,
    pub diffuse: [f32; 3],
    pub use_textures: u32,
    pub specular: [f32; 3],
    _padding: u32,
    pub diffuse_units: [u32; MAX_TEXTURES_PER_KIND],
    pub specular_units: [u32; MAX_TEXTURES_PER_KIND],
}

impl MaterialUniform {
    fn set_f32(&mut self, name: &str, value: f32) -> bool {
        match name {
            uniforms::SHININESS => self.shininess = value,
            _ => return false,
        }
        true
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) -> bool {
        let field = match name {
            uniforms::AMBIENT => &mut self.ambient,
            uniforms::DIFFUSE => &mut self.diffuse,
            uniforms::SPECULAR => &mut self.specular,
            _ => return false,
        };
        *field = value.into();
        true
    }

    /// Setting `mat.useTextures` starts a new material, so it also clears the sampler indices.
    fn set_bool(&mut self, name: &str, value: bool) -> bool {
        match name {
            uniforms::USE_TEXTURES => {
                self.use_textures = value as u32;
                self.diffuse_units = [0; MAX_TEXTURES_PER_KIND];
                self.specular_units = [0; MAX_TEXTURES_PER_KIND];
            }
            _ => return false,
        }
        true
    }

    /// Point the sampler uniform `name` at `unit`.
    fn set_sampler(&mut self, name: &str, unit: u32) -> bool {
        let (units, index) = if let Some(index) = name.strip_prefix(uniforms::DIFFUSE_TEXTURE) {
            (&mut self.diffuse_units, index)
        } else if let Some(index) = name.strip_prefix(uniforms::SPECULAR_TEXTURE) {
            (&mut self.specular_units, index)
        } else {
            return false;
        };
        match index.parse::<usize>().ok().and_then(|i| units.get_mut(i)) {
            Some(slot) => {
                *slot = unit;
                true
            }
            None => false,
        }
    }
}

pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<MaterialUniform>() as u64),
            },
            count: None,
        }],
        label: Some("material_bind_group_layout"),
    })
}

pub fn texture_units_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let entries: Vec<wgpu::BindGroupLayoutEntry> = (0..MAX_TEXTURE_UNITS as u32)
        .flat_map(|unit| {
            [
                wgpu::BindGroupLayoutEntry {
                    binding: unit * 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: unit * 2 + 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ]
        })
        .collect();
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &entries,
        label: Some("texture_units_bind_group_layout"),
    })
}

/// GPU objects shared by every [`MaterialPass`]; create once, reuse every frame.
#[derive(Debug)]
pub struct MaterialResources {
    pub material_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    material_group: wgpu::BindGroup,
    white: Texture,
    sampler: wgpu::Sampler,
    slot_size: u64,
    capacity: u32,
}

impl MaterialResources {
    /// Room for `capacity` mesh draws per pass.
    pub fn new(ctx: &GpuContext, capacity: u32) -> Self {
        let device = &ctx.device;
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let slot_size = (std::mem::size_of::<MaterialUniform>() as u64).div_ceil(alignment) * alignment;

        let material_layout = material_layout(device);
        let texture_layout = texture_units_layout(device);
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Material uniform buffer"),
            size: slot_size * capacity.max(1) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let material_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<MaterialUniform>() as u64),
                }),
            }],
            label: Some("material_bind_group"),
        });

        Self {
            material_layout,
            texture_layout,
            uniform_buffer,
            material_group,
            white: Texture::white(device, &ctx.queue),
            sampler: create_default_sampler(device),
            slot_size,
            capacity: capacity.max(1),
        }
    }

    /// Draws one pass can hold.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

/// One frame's worth of mesh draws into a wgpu render pass.
///
/// The caller sets the pipeline (built from the meshes'
/// [`buffer_layouts`](VertexArray::buffer_layouts) plus [`MaterialResources`]'
/// layouts) and any camera bind groups before handing the pass over.
pub struct MaterialPass<'a, 'pass> {
    ctx: &'a GpuContext,
    resources: &'a MaterialResources,
    render_pass: &'a mut wgpu::RenderPass<'pass>,
    staged: MaterialUniform,
    units: Vec<Option<Texture>>,
    next_slot: u32,
}

impl<'a, 'pass> MaterialPass<'a, 'pass> {
    pub fn new(
        ctx: &'a GpuContext,
        resources: &'a MaterialResources,
        render_pass: &'a mut wgpu::RenderPass<'pass>,
    ) -> Self {
        Self {
            ctx,
            resources,
            render_pass,
            staged: MaterialUniform::default(),
            units: vec![None; MAX_TEXTURE_UNITS],
            next_slot: 0,
        }
    }

    /// Draws issued so far.
    pub fn draw_count(&self) -> u32 {
        self.next_slot
    }

    /// Texture units holding a material texture rather than the white fallback.
    pub fn bound_units(&self) -> usize {
        self.units.iter().filter(|unit| unit.is_some()).count()
    }

    /// Upload the staged uniforms into this draw's slot and bind both groups.
    fn flush(&mut self) -> bool {
        if self.next_slot >= self.resources.capacity {
            log::error!(
                "Material pass is full ({} draws); raise the MaterialResources capacity. Dropping draw.",
                self.resources.capacity
            );
            return false;
        }
        let offset = self.next_slot as u64 * self.resources.slot_size;
        self.ctx.queue.write_buffer(
            &self.resources.uniform_buffer,
            offset,
            bytemuck::cast_slice(&[self.staged]),
        );
        self.render_pass
            .set_bind_group(MATERIAL_GROUP, &self.resources.material_group, &[offset as u32]);

        let textures: Vec<&Texture> = self
            .units
            .iter()
            .map(|unit| unit.as_ref().unwrap_or(&self.resources.white))
            .collect();
        let entries: Vec<wgpu::BindGroupEntry> = textures
            .iter()
            .enumerate()
            .flat_map(|(unit, texture)| {
                [
                    wgpu::BindGroupEntry {
                        binding: unit as u32 * 2,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: unit as u32 * 2 + 1,
                        resource: wgpu::BindingResource::Sampler(
                            texture.sampler.as_ref().unwrap_or(&self.resources.sampler),
                        ),
                    },
                ]
            })
            .collect();
        let texture_group = self.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.resources.texture_layout,
            entries: &entries,
            label: Some("texture_units_bind_group"),
        });
        self.render_pass.set_bind_group(TEXTURE_GROUP, &texture_group, &[]);

        self.next_slot += 1;
        true
    }
}

impl ShaderProgram<GpuContext> for MaterialPass<'_, '_> {
    fn set_f32(&mut self, name: &str, value: f32) {
        if !self.staged.set_f32(name, value) {
            log::warn!("Unknown float uniform {name:?}; ignoring it.");
        }
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        if !self.staged.set_vec3(name, value) {
            log::warn!("Unknown vec3 uniform {name:?}; ignoring it.");
        }
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        if !self.staged.set_bool(name, value) {
            log::warn!("Unknown bool uniform {name:?}; ignoring it.");
            return;
        }
        if name == uniforms::USE_TEXTURES {
            self.units.fill(None);
        }
    }

    fn bind_texture(&mut self, name: &str, texture: &Texture, unit: u32) {
        let Some(slot) = self.units.get_mut(unit as usize) else {
            log::warn!("Texture unit {unit} for {name:?} exceeds the {MAX_TEXTURE_UNITS} available units.");
            return;
        };
        *slot = Some(texture.clone());
        if !self.staged.set_sampler(name, unit) {
            log::warn!("Unknown sampler uniform {name:?}; the texture is bound but not referenced.");
        }
    }
}

impl DrawTarget<GpuContext> for MaterialPass<'_, '_> {
    fn bind_vertex_array(&mut self, vertex_array: &VertexArray<GpuContext>) {
        for (slot, binding) in vertex_array.bindings().iter().enumerate() {
            self.render_pass
                .set_vertex_buffer(slot as u32, binding.buffer.slice(..));
        }
        self.render_pass
            .set_index_buffer(vertex_array.index_buffer().slice(..), wgpu::IndexFormat::Uint32);
    }

    fn draw_indexed(&mut self, index_count: u32) {
        if self.flush() {
            self.render_pass.draw_indexed(0..index_count, 0, 0..1);
        }
    }

    fn draw_indexed_instanced(&mut self, index_count: u32, instance_count: u32) {
        if self.flush() {
            self.render_pass.draw_indexed(0..index_count, 0, 0..instance_count);
        }
    }
}
