use std::path::Path;

use anyhow::bail;

use crate::data_structures::scene_graph::ImportedScene;

/**
 * This module contains all logic for loading scenes and textures from external files.
 */
pub mod gltf_scene;
pub mod obj;
pub mod texture;

/// Import a scene file, picking the importer by extension (`obj`, `gltf`, `glb`).
pub fn load_scene(path: &Path) -> anyhow::Result<ImportedScene> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("obj") => obj::import(path),
        Some("gltf") | Some("glb") => gltf_scene::import(path),
        _ => bail!("unsupported scene format: {}", path.display()),
    }
}
