//! Core module containing timestamps and configuration

mod config;
mod timestamp;

pub use config::{ActorConfig, ConfigError};
pub use timestamp::{Clock, MTime, TimeStamp};
