//! Engine data structures: meshes, materials, models, scene graphs, and instances.
//!
//! - `vertex_array` describes vertex buffers and their attribute layouts
//! - `mesh` owns one mesh's GPU geometry and draws it
//! - `material` holds colours, shininess and texture bindings
//! - `model` flattens an imported scene graph into meshes
//! - `scene_graph` is the importer-facing node/mesh/material tree
//! - `instance` holds per-instance transformation data
//! - `texture` contains the wgpu texture wrapper and creation utilities

pub mod instance;
pub mod material;
pub mod mesh;
pub mod model;
pub mod scene_graph;
pub mod texture;
pub mod vertex_array;
