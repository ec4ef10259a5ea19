//! Rendering collaborators of an actor
//!
//! Appearance, geometry and texture objects, plus the bookkeeping used to
//! release whatever a renderer uploaded for them.

mod mapper;
mod mesh;
mod property;
mod resources;
mod texture;

pub use mapper::{Mapper, MeshMapper, SharedMapper};
pub use mesh::{Mesh, Vertex};
pub use property::{Interpolation, Property, PropertyConfig, Representation};
pub use resources::{GraphicsResources, ReleaseError, RenderContext, ResidentContexts};
pub use texture::{ImageTexture, SharedTexture, Texture, TextureError};
