use std::path::Path;

use anyhow::Context;

use crate::data_structures::scene_graph::{ImportedMaterial, ImportedMesh, ImportedScene, SceneNode};

/**
 * Wavefront OBJ has no hierarchy: every object becomes a child of an unnamed
 * root node that owns no meshes itself. Faces are triangulated and positions,
 * normals and UVs share one index so they can go straight into one vertex buffer.
 */
pub fn import(path: &Path) -> anyhow::Result<ImportedScene> {
    let (models, obj_materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("could not open or parse {}", path.display()))?;

    // A missing or broken .mtl leaves the meshes untextured rather than failing the import
    let obj_materials = obj_materials.unwrap_or_else(|e| {
        log::warn!("Materials of {} could not be loaded: {}", path.display(), e);
        Vec::new()
    });

    let mut root = SceneNode::new("");
    let mut meshes = Vec::with_capacity(models.len());
    for (idx, m) in models.into_iter().enumerate() {
        root.children.push(SceneNode::new(&m.name).with_meshes([idx]));
        meshes.push(to_mesh(m));
    }

    let materials = obj_materials.into_iter().map(to_material).collect();
    Ok(ImportedScene {
        root,
        meshes,
        materials,
    })
}

fn to_mesh(m: tobj::Model) -> ImportedMesh {
    let mesh = m.mesh;
    let positions = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let normals = mesh
        .normals
        .chunks_exact(3)
        .map(|n| [n[0], n[1], n[2]])
        .collect();
    // OBJ puts the UV origin bottom-left, wgpu samples from the top-left
    let tex_coords = (!mesh.texcoords.is_empty()).then(|| {
        mesh.texcoords
            .chunks_exact(2)
            .map(|t| [t[0], 1.0 - t[1]])
            .collect()
    });
    let faces = mesh.indices.chunks(3).map(<[u32]>::to_vec).collect();

    ImportedMesh {
        name: m.name,
        positions,
        normals,
        tex_coords,
        faces,
        material: mesh.material_id,
    }
}

fn to_material(m: tobj::Material) -> ImportedMaterial {
    ImportedMaterial {
        name: m.name,
        ambient: m.ambient,
        diffuse: m.diffuse,
        specular: m.specular,
        diffuse_textures: m.diffuse_texture.into_iter().collect(),
        specular_textures: m.specular_texture.into_iter().collect(),
    }
}
