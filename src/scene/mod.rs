//! Scene-graph nodes and their spatial bookkeeping

mod actor;
mod bounds;
mod prop3d;

pub use actor::Actor;
pub use bounds::{Bounds, BoundsReport};
pub use prop3d::Prop3d;
