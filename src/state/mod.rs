//! State values and shallow merging.
//!
//! Anything held by a [`Model`](crate::Model) implements [`ModelState`]:
//! typed structs through [`model_state!`](crate::model_state), dynamic
//! string-keyed state through [`StateMap`].

mod error;
mod macros;
mod map;
mod merge;
mod shared;
mod value;

pub use error::StateError;
pub use map::StateMap;
pub use merge::ModelState;
pub use shared::Shared;
pub use value::Value;
