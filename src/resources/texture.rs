use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{backend::Backend, data_structures::texture};

pub fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("could not read {}", path.display()))
}

/// Read and upload an image file, guessing the format from its extension first.
pub fn load_texture(
    path: &Path,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    let data = load_binary(path)?;
    let label = path.to_string_lossy();
    let format = path.extension().and_then(|ext| ext.to_str());
    texture::Texture::from_bytes(device, queue, &data, &label, format)
        .with_context(|| format!("could not decode texture {}", path.display()))
}

/**
 * Textures loaded while building one model, keyed by resolved path.
 *
 * Two meshes that reference the same file get the same `Arc`, so the image is
 * decoded and uploaded once and lives as long as the last mesh using it.
 */
pub struct TextureCache<B: Backend> {
    loaded: HashMap<PathBuf, Arc<B::Texture>>,
}

impl<B: Backend> Default for TextureCache<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> TextureCache<B> {
    pub fn new() -> Self {
        Self {
            loaded: HashMap::new(),
        }
    }

    pub fn get_or_load(&mut self, backend: &B, path: &Path) -> anyhow::Result<Arc<B::Texture>> {
        if let Some(texture) = self.loaded.get(path) {
            return Ok(texture.clone());
        }
        log::debug!("loading texture {}", path.display());
        let texture = Arc::new(backend.load_texture(path)?);
        self.loaded.insert(path.to_path_buf(), texture.clone());
        Ok(texture)
    }

    /// Number of distinct textures loaded so far.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}
