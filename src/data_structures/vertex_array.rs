//! Vertex-attribute layouts and the buffers they describe.
//!
//! A [`VertexArray`] is the wgpu counterpart of a GL vertex array object: a set
//! of vertex buffers, each with a stride, a step mode and the attributes read
//! from it, plus one index buffer. Layouts are accumulated with
//! [`VertexArrayBuilder`] and materialized once into `wgpu::VertexAttribute`s
//! so that pipelines can be created straight from [`VertexArray::buffer_layouts`].

use std::sync::Arc;

use crate::backend::Backend;

/// One float attribute: shader location, component count (1..=4) and byte offset in the stride.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub location: u32,
    pub components: u32,
    pub offset: wgpu::BufferAddress,
}

impl AttributeDescriptor {
    pub fn format(&self) -> wgpu::VertexFormat {
        match self.components {
            1 => wgpu::VertexFormat::Float32,
            2 => wgpu::VertexFormat::Float32x2,
            3 => wgpu::VertexFormat::Float32x3,
            _ => wgpu::VertexFormat::Float32x4,
        }
    }
}

/// The attributes read from one buffer together with how the buffer advances.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferLayout {
    pub stride: wgpu::BufferAddress,
    pub step_mode: wgpu::VertexStepMode,
    pub attributes: Vec<AttributeDescriptor>,
}

impl BufferLayout {
    /// A layout whose attributes advance once per vertex.
    pub fn per_vertex(stride: wgpu::BufferAddress) -> Self {
        Self {
            stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Vec::new(),
        }
    }

    /// A layout whose attributes advance once per drawn instance.
    pub fn per_instance(stride: wgpu::BufferAddress) -> Self {
        Self {
            stride,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: Vec::new(),
        }
    }

    /// Declare a float attribute at `location` with `components` floats at byte `offset`.
    ///
    /// # Panics
    ///
    /// If `components` is not in `1..=4` or the attribute does not fit in the stride.
    pub fn attribute(mut self, location: u32, components: u32, offset: wgpu::BufferAddress) -> Self {
        assert!(
            (1..=4).contains(&components),
            "attribute {location} must have 1 to 4 components, got {components}"
        );
        assert!(
            offset + components as wgpu::BufferAddress * 4 <= self.stride,
            "attribute {location} at offset {offset} overruns the {} byte stride",
            self.stride
        );
        self.attributes.push(AttributeDescriptor {
            location,
            components,
            offset,
        });
        self
    }
}

/// A vertex buffer and the layout it is read with.
pub struct VertexBinding<B: Backend> {
    pub buffer: Arc<B::Buffer>,
    pub layout: BufferLayout,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl<B: Backend> Clone for VertexBinding<B> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            layout: self.layout.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

/// Vertex buffers (bound to slots in order) plus one `u32` index buffer.
pub struct VertexArray<B: Backend> {
    bindings: Vec<VertexBinding<B>>,
    index_buffer: Arc<B::Buffer>,
}

impl<B: Backend> Clone for VertexArray<B> {
    fn clone(&self) -> Self {
        Self {
            bindings: self.bindings.clone(),
            index_buffer: self.index_buffer.clone(),
        }
    }
}

impl<B: Backend> VertexArray<B> {
    pub fn builder() -> VertexArrayBuilder<B> {
        VertexArrayBuilder::new()
    }

    /// Vertex buffers in slot order.
    pub fn bindings(&self) -> &[VertexBinding<B>] {
        &self.bindings
    }

    pub fn index_buffer(&self) -> &Arc<B::Buffer> {
        &self.index_buffer
    }

    /// The wgpu layouts to build a render pipeline with; slot `i` is `bindings()[i]`.
    pub fn buffer_layouts(&self) -> Vec<wgpu::VertexBufferLayout<'_>> {
        self.bindings
            .iter()
            .map(|binding| wgpu::VertexBufferLayout {
                array_stride: binding.layout.stride,
                step_mode: binding.layout.step_mode,
                attributes: &binding.attributes,
            })
            .collect()
    }

    /// Every declared attribute with the step mode of the buffer it lives in, in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = (AttributeDescriptor, wgpu::VertexStepMode)> + '_ {
        self.bindings.iter().flat_map(|binding| {
            binding
                .layout
                .attributes
                .iter()
                .map(move |attribute| (*attribute, binding.layout.step_mode))
        })
    }
}

/// Accumulates buffer layouts; [`build`](Self::build) materializes them once.
pub struct VertexArrayBuilder<B: Backend> {
    bindings: Vec<(Arc<B::Buffer>, BufferLayout)>,
}

impl<B: Backend> Default for VertexArrayBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> VertexArrayBuilder<B> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Attach `buffer` to the next free slot, read through `layout`.
    pub fn buffer(mut self, buffer: Arc<B::Buffer>, layout: BufferLayout) -> Self {
        self.bindings.push((buffer, layout));
        self
    }

    pub fn build(self, index_buffer: Arc<B::Buffer>) -> VertexArray<B> {
        let bindings = self
            .bindings
            .into_iter()
            .map(|(buffer, layout)| {
                let attributes = layout
                    .attributes
                    .iter()
                    .map(|attribute| wgpu::VertexAttribute {
                        format: attribute.format(),
                        offset: attribute.offset,
                        shader_location: attribute.location,
                    })
                    .collect();
                VertexBinding {
                    buffer,
                    layout,
                    attributes,
                }
            })
            .collect();
        VertexArray {
            bindings,
            index_buffer,
        }
    }
}
