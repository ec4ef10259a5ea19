//! Data pipeline feeding mappers

mod data;
mod source;

pub use data::PolyData;
pub use source::{Algorithm, ParametricSource, Shape, SharedAlgorithm, TrivialProducer};
