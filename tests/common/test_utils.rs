use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};

use flow_mesh::{
    backend::{Backend, BufferUsage},
    cgmath::Vector3,
    data_structures::vertex_array::VertexArray,
    shader::{DrawTarget, ShaderProgram},
};

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedBuffer {
    pub label: String,
    pub usage: BufferUsage,
    pub bytes: Vec<u8>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct RecordedTexture {
    pub path: PathBuf,
}

/// Keeps everything on the CPU and remembers which textures were requested.
#[derive(Default)]
pub(crate) struct RecordingBackend {
    pub texture_loads: RefCell<Vec<PathBuf>>,
    pub buffers_created: RefCell<usize>,
    /// Paths that fail to load.
    pub missing: Vec<PathBuf>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture_loads(&self) -> Vec<PathBuf> {
        self.texture_loads.borrow().clone()
    }
}

impl Backend for RecordingBackend {
    type Buffer = RecordedBuffer;
    type Texture = RecordedTexture;

    fn create_buffer(&self, label: &str, contents: &[u8], usage: BufferUsage) -> RecordedBuffer {
        *self.buffers_created.borrow_mut() += 1;
        RecordedBuffer {
            label: label.to_string(),
            usage,
            bytes: contents.to_vec(),
        }
    }

    fn load_texture(&self, path: &Path) -> anyhow::Result<RecordedTexture> {
        if self.missing.iter().any(|p| p == path) {
            anyhow::bail!("no such texture {}", path.display());
        }
        self.texture_loads.borrow_mut().push(path.to_path_buf());
        Ok(RecordedTexture {
            path: path.to_path_buf(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    SetF32(String, f32),
    SetVec3(String, [f32; 3]),
    SetBool(String, bool),
    BindTexture { name: String, unit: u32, path: PathBuf },
    BindVertexArray { buffers: usize, index_bytes: usize },
    DrawIndexed(u32),
    DrawIndexedInstanced(u32, u32),
}

/// Records every shader and draw call in order.
#[derive(Default)]
pub(crate) struct RecordingPass {
    pub calls: Vec<Call>,
}

impl RecordingPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::DrawIndexed(_) | Call::DrawIndexedInstanced(..)))
            .collect()
    }

    pub fn texture_binds(&self) -> Vec<(String, u32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::BindTexture { name, unit, .. } => Some((name.clone(), *unit)),
                _ => None,
            })
            .collect()
    }

    /// Uniform writes that are not the `useTextures` flag or a texture bind.
    pub fn value_writes(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::SetF32(name, _) | Call::SetVec3(name, _) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ShaderProgram<RecordingBackend> for RecordingPass {
    fn set_f32(&mut self, name: &str, value: f32) {
        self.calls.push(Call::SetF32(name.to_string(), value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.calls.push(Call::SetVec3(name.to_string(), value.into()));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.calls.push(Call::SetBool(name.to_string(), value));
    }

    fn bind_texture(&mut self, name: &str, texture: &RecordedTexture, unit: u32) {
        self.calls.push(Call::BindTexture {
            name: name.to_string(),
            unit,
            path: texture.path.clone(),
        });
    }
}

impl DrawTarget<RecordingBackend> for RecordingPass {
    fn bind_vertex_array(&mut self, vertex_array: &VertexArray<RecordingBackend>) {
        self.calls.push(Call::BindVertexArray {
            buffers: vertex_array.bindings().len(),
            index_bytes: vertex_array.index_buffer().bytes.len(),
        });
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.calls.push(Call::DrawIndexed(index_count));
    }

    fn draw_indexed_instanced(&mut self, index_count: u32, instance_count: u32) {
        self.calls.push(Call::DrawIndexedInstanced(index_count, instance_count));
    }
}
