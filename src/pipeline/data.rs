//! Data objects flowing out of pipeline algorithms

use crate::core::{Clock, MTime, TimeStamp};
use crate::renderer::Mesh;
use crate::scene::Bounds;

/// Polygonal data: a mesh, its bounds, and when it last changed.
#[derive(Debug, Clone)]
pub struct PolyData {
    mesh: Mesh,
    bounds: Bounds,
    mtime: MTime,
}

impl PolyData {
    /// Create empty data that has never been generated.
    #[must_use]
    pub fn new(clock: &Clock) -> Self {
        Self {
            mesh: Mesh::new(),
            bounds: Bounds::EMPTY,
            mtime: MTime::new(clock),
        }
    }

    /// Create data holding `mesh`.
    #[must_use]
    pub fn from_mesh(clock: &Clock, mesh: Mesh) -> Self {
        let mut data = Self::new(clock);
        data.set_mesh(mesh);
        data
    }

    /// Replace the mesh and recompute its bounds.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.bounds = mesh.bounds();
        self.mesh = mesh;
        self.mtime.modified();
    }

    /// Get the mesh.
    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Bounds of the mesh, the empty sentinel when there are no points.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// When the data was last regenerated.
    #[must_use]
    pub fn mtime(&self) -> TimeStamp {
        self.mtime.get()
    }
}
