use std::path::Path;

use anyhow::Context;

use crate::data_structures::scene_graph::{ImportedMaterial, ImportedMesh, ImportedScene, SceneNode};

/**
 * glTF 2.0 (`.gltf` with external buffers or binary `.glb`).
 *
 * Every triangle-list primitive becomes one mesh, so a node that references a
 * glTF mesh with several primitives references several meshes. The default
 * scene is used, or the first one if none is marked as default.
 *
 * Base colour textures become diffuse textures when they point at a URI.
 * Embedded images (buffer views and `data:` URIs) have no path to deduplicate by and are skipped.
 */
pub fn import(path: &Path) -> anyhow::Result<ImportedScene> {
    let gltf = gltf::Gltf::open(path).with_context(|| format!("could not open or parse {}", path.display()))?;
    let base = path.parent();
    let buffer_data = gltf::import_buffers(&gltf.document, base, gltf.blob.clone())
        .with_context(|| format!("could not load buffers of {}", path.display()))?;

    // Flat mesh array: one entry per primitive; `primitive_meshes[i]` are the entries of glTF mesh `i`
    let mut meshes = Vec::new();
    let mut primitive_meshes: Vec<Vec<usize>> = Vec::new();
    for mesh in gltf.document.meshes() {
        let mut entries = Vec::new();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Primitive {} of mesh {:?} is not a triangle list; skipping it.",
                    primitive.index(),
                    mesh.name()
                );
                continue;
            }
            entries.push(meshes.len());
            meshes.push(to_mesh(&mesh, &primitive, &buffer_data));
        }
        primitive_meshes.push(entries);
    }

    let materials = gltf.document.materials().map(to_material).collect();

    let mut root = SceneNode::new("");
    match gltf.document.default_scene().or_else(|| gltf.document.scenes().next()) {
        Some(scene) => {
            root.name = scene.name().unwrap_or_default().to_string();
            for node in scene.nodes() {
                root.children.push(to_scene_node(&node, &primitive_meshes));
            }
        }
        None => log::warn!("{} contains no scene.", path.display()),
    }

    Ok(ImportedScene {
        root,
        meshes,
        materials,
    })
}

fn to_scene_node(node: &gltf::Node, primitive_meshes: &[Vec<usize>]) -> SceneNode {
    let mut scene_node = SceneNode::new(node.name().unwrap_or_default());
    if let Some(mesh) = node.mesh() {
        scene_node.meshes = primitive_meshes[mesh.index()].clone();
    }
    for child in node.children() {
        scene_node.children.push(to_scene_node(&child, primitive_meshes));
    }
    scene_node
}

fn to_mesh(mesh: &gltf::Mesh, primitive: &gltf::Primitive, buffer_data: &[gltf::buffer::Data]) -> ImportedMesh {
    let reader = primitive.reader(|buffer| Some(&buffer_data[buffer.index()]));

    let positions: Vec<[f32; 3]> = reader.read_positions().map(|p| p.collect()).unwrap_or_default();
    let normals = reader.read_normals().map(|n| n.collect()).unwrap_or_default();
    let tex_coords = reader.read_tex_coords(0).map(|t| t.into_f32().collect());
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        // Non-indexed primitives draw their vertices in order
        None => (0..positions.len() as u32).collect(),
    };

    ImportedMesh {
        name: mesh.name().unwrap_or("unknown_mesh").to_string(),
        positions,
        normals,
        tex_coords,
        faces: indices.chunks(3).map(<[u32]>::to_vec).collect(),
        material: primitive.material().index(),
    }
}

fn to_material(material: gltf::Material) -> ImportedMaterial {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, _] = pbr.base_color_factor();
    let diffuse_textures = pbr
        .base_color_texture()
        .and_then(|info| match info.texture().source().source() {
            gltf::image::Source::Uri { uri, .. } if !uri.starts_with("data:") => Some(uri.to_string()),
            gltf::image::Source::Uri { .. } | gltf::image::Source::View { .. } => {
                log::warn!(
                    "Material {:?} uses an embedded base colour image; it is not loaded.",
                    material.name()
                );
                None
            }
        })
        .into_iter()
        .collect();

    ImportedMaterial {
        name: material.name().unwrap_or("unnamed_material").to_string(),
        ambient: Some([r, g, b]),
        diffuse: Some([r, g, b]),
        specular: None,
        diffuse_textures,
        specular_textures: Vec::new(),
    }
}
