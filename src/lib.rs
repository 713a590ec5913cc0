//! # Modelcell
//!
//! Observable state models for Rust.
//!
//! A [`Model`] holds one state value and exposes:
//! - `state()` - the current state, read synchronously
//! - `set_state(partial)` - shallow-merge a partial update and publish it
//! - `subscribe(callback)` - replay the current state, then every later
//!   distinct state, until the returned [`Subscription`] is disposed
//! - `to_observable()` - a lazy, multicast [`Observable`] with the same
//!   semantics, consumable as callbacks or as an async [`StateStream`]
//!
//! ## State
//!
//! Anything implementing [`ModelState`] can live in a model. Equality and
//! merging are both shallow: top-level fields are replaced wholesale and
//! compared one by one. Typed structs get the trait from [`model_state!`];
//! [`StateMap`] covers string-keyed dynamic state.
//!
//! ```
//! use modelcell::{model_state, Model};
//!
//! model_state! {
//!     #[derive(Clone, Debug, PartialEq)]
//!     pub struct Counter => CounterPatch {
//!         pub count: i32,
//!         pub step: i32,
//!     }
//! }
//!
//! let model = Model::new(Counter { count: 0, step: 1 });
//! model.set_state(CounterPatch::default().count(5));
//! assert_eq!(model.state(), Counter { count: 5, step: 1 });
//! ```

pub mod model;
pub mod observable;
pub mod state;
pub mod subject;

// Re-export main types for convenience
pub use model::{Model, ModelConfig};
pub use observable::{Observable, StateStream};
pub use state::{ModelState, Shared, StateError, StateMap, Value};
pub use subject::Subscription;
