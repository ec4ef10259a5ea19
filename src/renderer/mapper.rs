//! Mappers turn pipeline data into drawable geometry
//!
//! Actors only see a mapper through the [`Mapper`] trait: its bounds, its
//! modification time, whether its colors need blending, and a handle on its
//! upstream input.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::core::{Clock, MTime, TimeStamp};
use crate::pipeline::{Algorithm, SharedAlgorithm, TrivialProducer};
use crate::scene::{Bounds, BoundsReport};

use super::mesh::Mesh;
use super::resources::{GraphicsResources, ReleaseError, RenderContext, ResidentContexts};

/// Shared handle to a mapper. One mapper may feed many actors.
pub type SharedMapper = Rc<RefCell<dyn Mapper>>;

/// Geometry source for an actor.
pub trait Mapper: GraphicsResources + fmt::Debug {
    /// Object-space bounds of the input, brought up to date first.
    fn bounds(&mut self) -> BoundsReport;

    /// Last modification of the mapper's own settings.
    fn mtime(&self) -> TimeStamp;

    /// Whether the mapped colors are fully opaque. May update the input.
    fn is_opaque(&mut self) -> bool {
        true
    }

    /// Whether the mapper can render selection ids.
    fn supports_selection(&self) -> bool {
        false
    }

    /// Check if an upstream input is connected.
    fn has_input(&self) -> bool;

    /// Force the upstream pipeline to execute if it is stale.
    fn update_input(&mut self);

    /// Modification time of the input data, as of the last update.
    fn input_mtime(&self) -> Option<TimeStamp>;
}

// ============================================================================
// Mesh Mapper
// ============================================================================

/// Maps triangle-mesh poly data.
#[derive(Debug)]
pub struct MeshMapper {
    input: Option<SharedAlgorithm>,
    /// Color by per-vertex colors when the mesh has them
    scalar_visibility: bool,
    clock: Clock,
    mtime: MTime,
    resident: ResidentContexts,
}

impl MeshMapper {
    /// Create a mapper with no input.
    #[must_use]
    pub fn new(clock: &Clock) -> Self {
        Self {
            input: None,
            scalar_visibility: true,
            clock: clock.clone(),
            mtime: MTime::modified_now(clock),
            resident: ResidentContexts::new(),
        }
    }

    /// Create a mapper connected to `algorithm`.
    #[must_use]
    pub fn with_input(clock: &Clock, algorithm: SharedAlgorithm) -> Self {
        let mut mapper = Self::new(clock);
        mapper.set_input_connection(Some(algorithm));
        mapper
    }

    /// Wrap the mapper in a shared handle.
    #[must_use]
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Connect (or disconnect) an upstream algorithm.
    pub fn set_input_connection(&mut self, algorithm: Option<SharedAlgorithm>) {
        let same = match (&self.input, &algorithm) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if !same {
            self.input = algorithm;
            self.mtime.modified();
        }
    }

    /// Feed a fixed mesh as input.
    pub fn set_input_data(&mut self, mesh: Mesh) {
        let producer: SharedAlgorithm =
            Rc::new(RefCell::new(TrivialProducer::new(&self.clock, mesh)));
        self.set_input_connection(Some(producer));
    }

    /// The connected algorithm, if any.
    #[must_use]
    pub fn input_connection(&self) -> Option<&SharedAlgorithm> {
        self.input.as_ref()
    }

    #[must_use]
    pub fn scalar_visibility(&self) -> bool {
        self.scalar_visibility
    }

    pub fn set_scalar_visibility(&mut self, visible: bool) {
        self.mtime.update(&mut self.scalar_visibility, visible);
    }

    /// Record that a renderer uploaded this mapper's buffers into `context`.
    pub fn mark_resident(&mut self, context: RenderContext) {
        self.resident.insert(context);
    }

    /// Check if the mapper has uploads in `context`.
    #[must_use]
    pub fn is_resident(&self, context: &RenderContext) -> bool {
        self.resident.contains(context)
    }

    /// Number of release requests this mapper has received.
    #[must_use]
    pub fn release_requests(&self) -> u32 {
        self.resident.release_requests()
    }
}

impl Mapper for MeshMapper {
    fn bounds(&mut self) -> BoundsReport {
        self.update_input();
        let bounds = self
            .input
            .as_ref()
            .map_or(Bounds::EMPTY, |input| input.borrow().output().bounds());
        BoundsReport::Known(bounds)
    }

    fn mtime(&self) -> TimeStamp {
        self.mtime.get()
    }

    fn is_opaque(&mut self) -> bool {
        if !self.scalar_visibility {
            return true;
        }
        self.update_input();
        self.input
            .as_ref()
            .is_none_or(|input| !input.borrow().output().mesh().has_translucent_colors())
    }

    fn supports_selection(&self) -> bool {
        true
    }

    fn has_input(&self) -> bool {
        self.input.is_some()
    }

    fn update_input(&mut self) {
        if let Some(input) = &self.input {
            input.borrow_mut().update();
        }
    }

    fn input_mtime(&self) -> Option<TimeStamp> {
        self.input
            .as_ref()
            .map(|input| input.borrow().output().mtime())
    }
}

impl GraphicsResources for MeshMapper {
    fn release_graphics_resources(&mut self, context: &RenderContext) -> Result<(), ReleaseError> {
        if self.resident.release(context) {
            log::trace!("Released mapper buffers in context {}", context.id());
        }
        Ok(())
    }
}
