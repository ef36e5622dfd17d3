//! Models: a scene graph flattened into meshes, plus one rigid transform.

use std::path::{Path, PathBuf};

use cgmath::{InnerSpace, Matrix4, Rad, SquareMatrix, Vector3, Zero};

use crate::{
    backend::Backend,
    camera::ViewProjection,
    data_structures::{
        material::{Material, TextureKind},
        mesh::{Mesh, Vertex},
        scene_graph::{ImportedMesh, ImportedScene, SceneNode},
    },
    resources::{self, texture::TextureCache},
    shader::MeshPass,
};

/// Shininess given to every material of a model unless the caller picks another.
pub const DEFAULT_SHININESS: f32 = 32.0;

/// All meshes of an imported file, in depth-first (node before children) order.
///
/// The position, scale and axis-angle rotation are stored only; changing them
/// never touches the meshes. Turn them into a matrix with
/// [`model_matrix`](Self::model_matrix) and upload it next to the camera.
pub struct Model<B: Backend> {
    meshes: Vec<Mesh<B>>,
    shininess: f32,
    texture_dir: PathBuf,
    texture_count: usize,
    position: Vector3<f32>,
    scale: Vector3<f32>,
    rotation_axis: Vector3<f32>,
    rotation_angle: Rad<f32>,
}

impl<B: Backend> Model<B> {
    /// Import `path` and build its meshes, loading textures relative to `texture_dir`.
    ///
    /// Fails when the file cannot be opened or parsed, or when a referenced
    /// texture cannot be loaded. No partially built model is returned.
    pub fn load(
        backend: &B,
        path: impl AsRef<Path>,
        texture_dir: impl AsRef<Path>,
        shininess: f32,
    ) -> anyhow::Result<Self> {
        let scene = resources::load_scene(path.as_ref())?;
        Self::from_scene(backend, &scene, texture_dir, shininess)
    }

    /// [`load`](Self::load) with [`DEFAULT_SHININESS`].
    pub fn load_default(
        backend: &B,
        path: impl AsRef<Path>,
        texture_dir: impl AsRef<Path>,
    ) -> anyhow::Result<Self> {
        Self::load(backend, path, texture_dir, DEFAULT_SHININESS)
    }

    /// Build one mesh per mesh reference in `scene`, walking the node tree depth first.
    pub fn from_scene(
        backend: &B,
        scene: &ImportedScene,
        texture_dir: impl AsRef<Path>,
        shininess: f32,
    ) -> anyhow::Result<Self> {
        let mut builder = ModelBuilder {
            backend,
            scene,
            texture_dir: texture_dir.as_ref(),
            shininess,
            textures: TextureCache::new(),
            meshes: Vec::new(),
        };
        builder.process_node(&scene.root)?;
        log::debug!(
            "flattened scene into {} meshes sharing {} textures",
            builder.meshes.len(),
            builder.textures.len()
        );

        Ok(Self {
            texture_count: builder.textures.len(),
            meshes: builder.meshes,
            shininess,
            texture_dir: texture_dir.as_ref().to_path_buf(),
            position: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_axis: Vector3::unit_y(),
            rotation_angle: Rad(0.0),
        })
    }

    /// Render every mesh in order.
    ///
    /// The caller uploads the view-projection of `camera` and
    /// [`model_matrix`](Self::model_matrix) before calling this; meshes only
    /// push their material state.
    pub fn render<P: MeshPass<B> + ?Sized, C: ViewProjection + ?Sized>(&self, pass: &mut P, _camera: &C) {
        for mesh in &self.meshes {
            mesh.render(pass);
        }
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
    }

    /// Stored as given; a zero axis is not rejected here.
    pub fn set_rotation(&mut self, axis: Vector3<f32>, angle: impl Into<Rad<f32>>) {
        self.rotation_axis = axis;
        self.rotation_angle = angle.into();
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    pub fn rotation(&self) -> (Vector3<f32>, Rad<f32>) {
        (self.rotation_axis, self.rotation_angle)
    }

    /// `translation * rotation * scale`. A zero-length rotation axis rotates by nothing.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let rotation = if self.rotation_axis.magnitude2() > f32::EPSILON {
            Matrix4::from_axis_angle(self.rotation_axis.normalize(), self.rotation_angle)
        } else {
            Matrix4::identity()
        };
        Matrix4::from_translation(self.position)
            * rotation
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn meshes(&self) -> &[Mesh<B>] {
        &self.meshes
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    pub fn texture_dir(&self) -> &Path {
        &self.texture_dir
    }

    /// Distinct textures uploaded for this model.
    pub fn texture_count(&self) -> usize {
        self.texture_count
    }
}

struct ModelBuilder<'a, B: Backend> {
    backend: &'a B,
    scene: &'a ImportedScene,
    texture_dir: &'a Path,
    shininess: f32,
    textures: TextureCache<B>,
    meshes: Vec<Mesh<B>>,
}

impl<B: Backend> ModelBuilder<'_, B> {
    fn process_node(&mut self, node: &SceneNode) -> anyhow::Result<()> {
        for &mesh_idx in &node.meshes {
            let Some(mesh) = self.scene.meshes.get(mesh_idx) else {
                log::warn!(
                    "Node {:?} references mesh {} but the scene only has {} meshes; skipping it.",
                    node.name,
                    mesh_idx,
                    self.scene.meshes.len()
                );
                continue;
            };
            if let Some(mesh) = self.process_mesh(mesh)? {
                self.meshes.push(mesh);
            }
        }
        for child in &node.children {
            self.process_node(child)?;
        }
        Ok(())
    }

    fn process_mesh(&mut self, mesh: &ImportedMesh) -> anyhow::Result<Option<Mesh<B>>> {
        let vertices: Vec<Vertex> = mesh
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex {
                position,
                normal: mesh.normals.get(i).copied().unwrap_or_default(),
                tex_coords: mesh
                    .tex_coords
                    .as_ref()
                    .and_then(|uvs| uvs.get(i).copied())
                    .unwrap_or_default(),
            })
            .collect();
        let indices: Vec<u32> = mesh.faces.iter().flatten().copied().collect();

        if vertices.is_empty() || indices.is_empty() {
            log::warn!(
                "Mesh {:?} has {} vertices and {} indices and cannot be drawn; skipping it.",
                mesh.name,
                vertices.len(),
                indices.len()
            );
            return Ok(None);
        }

        let material = self.process_material(mesh)?;
        Ok(Some(Mesh::new(
            self.backend,
            &mesh.name,
            &vertices,
            &indices,
            material,
            None,
        )))
    }

    /// Colours plus the shared shininess, then every diffuse texture followed by every specular one.
    fn process_material(&mut self, mesh: &ImportedMesh) -> anyhow::Result<Material<B>> {
        let Some(imported) = mesh.material.and_then(|idx| self.scene.materials.get(idx)) else {
            log::debug!("Mesh {:?} has no material; using a black one.", mesh.name);
            return Ok(Material::new(&mesh.name, self.shininess));
        };

        let color = |c: Option<[f32; 3]>| c.map_or(Vector3::zero(), Vector3::from);
        let mut material = Material::new(&imported.name, self.shininess).with_colors(
            color(imported.ambient),
            color(imported.diffuse),
            color(imported.specular),
        );

        let references = imported
            .diffuse_textures
            .iter()
            .map(|r| (TextureKind::Diffuse, r))
            .chain(imported.specular_textures.iter().map(|r| (TextureKind::Specular, r)));
        for (kind, reference) in references {
            let path = self.texture_dir.join(reference);
            let texture = self.textures.get_or_load(self.backend, &path)?;
            material = material.with_texture(kind, path, texture);
        }
        Ok(material)
    }
}
