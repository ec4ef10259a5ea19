//! Renderable scene actors with cached bounds and lazy appearance
//!
//! This crate provides:
//! - [`scene::Actor`], a scene node pairing a mapper with a property,
//!   textures and a 3D transform
//! - Change tracking through a shared monotonic [`core::Clock`]
//! - A demand-driven geometry pipeline feeding mappers
//! - Graphics-resource release bookkeeping per rendering context

pub mod core;
pub mod pipeline;
pub mod renderer;
pub mod scene;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::{ActorConfig, Clock, MTime, TimeStamp};
    pub use crate::pipeline::{Algorithm, ParametricSource, Shape, SharedAlgorithm};
    pub use crate::renderer::{
        GraphicsResources, ImageTexture, Mapper, Mesh, MeshMapper, Property, PropertyConfig,
        RenderContext, SharedMapper, SharedTexture, Texture,
    };
    pub use crate::scene::{Actor, Bounds, BoundsReport, Prop3d};
    pub use glam::{DMat4, DQuat, DVec3, Vec3};
}
