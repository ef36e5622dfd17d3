//! The wgpu device and queue, and the [`Backend`] implementation on top of them.

use std::path::Path;

use anyhow::Context as _;
use wgpu::util::DeviceExt;

use crate::{
    backend::{Backend, BufferUsage},
    data_structures::texture,
    resources::texture::load_texture,
};

#[derive(Clone, Debug)]
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }

    /// Request an adapter and device without a surface, e.g. for offscreen rendering and tests.
    pub async fn headless() -> anyhow::Result<Self> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .context("no suitable GPU adapter")?;
        log::debug!("using adapter {:?}", adapter.get_info().name);
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("flow-mesh device"),
                ..Default::default()
            })
            .await
            .context("could not create a GPU device")?;
        Ok(Self::new(device, queue))
    }
}

impl Backend for GpuContext {
    type Buffer = wgpu::Buffer;
    type Texture = texture::Texture;

    fn create_buffer(&self, label: &str, contents: &[u8], usage: BufferUsage) -> wgpu::Buffer {
        let usage = match usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        };
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage,
        })
    }

    fn load_texture(&self, path: &Path) -> anyhow::Result<texture::Texture> {
        load_texture(path, &self.device, &self.queue)
    }
}
