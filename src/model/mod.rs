//! Stateful models.
//!
//! A [`Model`] wraps a replay-latest cell with a shallow-merge update and
//! subscription access.

mod config;
mod model;

pub use config::ModelConfig;
pub use model::Model;
