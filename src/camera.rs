//! Camera seam.
//!
//! Whatever drives the view supplies a combined view-projection matrix. The
//! core only carries the camera through [`Model::render`](crate::data_structures::model::Model::render)
//! so the calling convention stays explicit; uploading it is the caller's job.

use cgmath::Matrix4;

pub trait ViewProjection {
    fn view_projection(&self) -> Matrix4<f32>;
}

impl ViewProjection for Matrix4<f32> {
    fn view_projection(&self) -> Matrix4<f32> {
        *self
    }
}
