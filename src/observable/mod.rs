//! Observable views over model state.

mod observable;
mod stream;

pub use observable::Observable;
pub use stream::StateStream;
