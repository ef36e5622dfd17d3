//! Per-mesh shading parameters.

use std::{path::PathBuf, sync::Arc};

use cgmath::{Vector3, Zero};

use crate::{backend::Backend, shader::uniforms};

/// What a material texture is sampled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
}

impl TextureKind {
    /// The sampler uniform prefix; the per-kind index is appended to it.
    pub fn uniform_prefix(&self) -> &'static str {
        match self {
            TextureKind::Diffuse => uniforms::DIFFUSE_TEXTURE,
            TextureKind::Specular => uniforms::SPECULAR_TEXTURE,
        }
    }
}

/// A texture bound to a material, shared with every other mesh that loaded the same path.
pub struct MaterialTexture<B: Backend> {
    pub kind: TextureKind,
    pub path: PathBuf,
    pub texture: Arc<B::Texture>,
}

impl<B: Backend> Clone for MaterialTexture<B> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            path: self.path.clone(),
            texture: self.texture.clone(),
        }
    }
}

/// Phong colours, shininess and an ordered list of textures.
///
/// When `textures` is non-empty the colours are not sent to the shader at all;
/// sampling replaces constant colour for the whole material.
pub struct Material<B: Backend> {
    pub name: String,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
    pub textures: Vec<MaterialTexture<B>>,
}

impl<B: Backend> Material<B> {
    /// A black, untextured material.
    pub fn new(name: &str, shininess: f32) -> Self {
        Self {
            name: name.to_string(),
            ambient: Vector3::zero(),
            diffuse: Vector3::zero(),
            specular: Vector3::zero(),
            shininess,
            textures: Vec::new(),
        }
    }

    pub fn with_colors(
        mut self,
        ambient: Vector3<f32>,
        diffuse: Vector3<f32>,
        specular: Vector3<f32>,
    ) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    pub fn with_texture(mut self, kind: TextureKind, path: PathBuf, texture: Arc<B::Texture>) -> Self {
        self.textures.push(MaterialTexture {
            kind,
            path,
            texture,
        });
        self
    }

    pub fn uses_textures(&self) -> bool {
        !self.textures.is_empty()
    }
}

impl<B: Backend> Clone for Material<B> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            shininess: self.shininess,
            textures: self.textures.clone(),
        }
    }
}
