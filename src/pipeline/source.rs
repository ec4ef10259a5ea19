//! Upstream algorithms that produce poly data on demand
//!
//! An [`Algorithm`] only re-executes in [`Algorithm::update`] when its
//! parameters are newer than its output. Mappers hold algorithms through
//! [`SharedAlgorithm`] so the owner can keep tweaking parameters after
//! connecting them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::{Clock, MTime, TimeStamp};
use crate::renderer::Mesh;

use super::data::PolyData;

/// Shared handle to an algorithm.
pub type SharedAlgorithm = Rc<RefCell<dyn Algorithm>>;

/// A pipeline stage producing [`PolyData`].
pub trait Algorithm: fmt::Debug {
    /// Bring the output up to date with the parameters.
    fn update(&mut self);

    /// The current output, as of the last update.
    fn output(&self) -> &PolyData;

    /// Last modification of the algorithm's parameters.
    fn mtime(&self) -> TimeStamp;
}

// ============================================================================
// Parametric Source
// ============================================================================

/// Shape generated by a [`ParametricSource`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned cube centered at the origin
    Cube { size: f32 },
    /// Square on the XZ plane
    Plane { size: f32 },
    /// UV sphere centered at the origin
    Sphere { radius: f32, segments: u32, rings: u32 },
}

impl Shape {
    fn generate(&self) -> Mesh {
        match *self {
            Self::Cube { size } => {
                let mut cube = Mesh::cube();
                for v in &mut cube.vertices {
                    v.position = v.position.map(|c| c * size);
                }
                cube
            }
            Self::Plane { size } => Mesh::plane(size),
            Self::Sphere {
                radius,
                segments,
                rings,
            } => Mesh::sphere(radius, segments.max(3), rings.max(2)),
        }
    }
}

/// Generates a mesh from a [`Shape`].
#[derive(Debug)]
pub struct ParametricSource {
    shape: Shape,
    mtime: MTime,
    output: PolyData,
    executions: u32,
}

impl ParametricSource {
    /// Create a source for `shape`. Nothing is generated until [`Algorithm::update`].
    #[must_use]
    pub fn new(clock: &Clock, shape: Shape) -> Self {
        Self {
            shape,
            mtime: MTime::modified_now(clock),
            output: PolyData::new(clock),
            executions: 0,
        }
    }

    /// Convenience for a sphere source.
    #[must_use]
    pub fn sphere(clock: &Clock, radius: f32) -> Self {
        Self::new(
            clock,
            Shape::Sphere {
                radius,
                segments: 24,
                rings: 12,
            },
        )
    }

    /// Convenience for a cube source.
    #[must_use]
    pub fn cube(clock: &Clock, size: f32) -> Self {
        Self::new(clock, Shape::Cube { size })
    }

    /// Wrap the source in a shared handle.
    #[must_use]
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Get the shape.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Change the shape. The output is regenerated on the next update.
    pub fn set_shape(&mut self, shape: Shape) {
        self.mtime.update(&mut self.shape, shape);
    }

    /// How many times the source has generated its output.
    #[must_use]
    pub fn executions(&self) -> u32 {
        self.executions
    }
}

impl Algorithm for ParametricSource {
    fn update(&mut self) {
        if self.mtime.is_newer_than(self.output.mtime()) {
            log::debug!("Generating {:?}", self.shape);
            self.output.set_mesh(self.shape.generate());
            self.executions += 1;
        }
    }

    fn output(&self) -> &PolyData {
        &self.output
    }

    fn mtime(&self) -> TimeStamp {
        self.mtime.get()
    }
}

// ============================================================================
// Trivial Producer
// ============================================================================

/// Feeds a fixed mesh into the pipeline.
#[derive(Debug)]
pub struct TrivialProducer {
    output: PolyData,
}

impl TrivialProducer {
    /// Wrap an existing mesh.
    #[must_use]
    pub fn new(clock: &Clock, mesh: Mesh) -> Self {
        Self {
            output: PolyData::from_mesh(clock, mesh),
        }
    }

    /// Replace the mesh.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.output.set_mesh(mesh);
    }
}

impl Algorithm for TrivialProducer {
    fn update(&mut self) {}

    fn output(&self) -> &PolyData {
        &self.output
    }

    fn mtime(&self) -> TimeStamp {
        self.output.mtime()
    }
}
