//! Replay-latest value cells.
//!
//! [`BehaviorSubject`] is the primitive underneath every
//! [`Model`](crate::Model): the latest committed value plus an ordered list
//! of listeners, each registration handing back a [`Subscription`].

mod behavior;
mod subscription;

pub use behavior::BehaviorSubject;
pub use subscription::Subscription;
