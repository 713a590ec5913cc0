use super::stream::StateStream;
use crate::state::ModelState;
use crate::subject::{BehaviorSubject, Subscription};
use futures::channel::mpsc;

/// A lazy, multicast view of a model's states.
///
/// Creating an `Observable` does nothing by itself. Each subscriber gets the
/// current state on subscription, then every later distinct state, starting
/// from its own subscription point. All subscribers share the same
/// underlying sequence; nothing is recomputed per subscriber and the
/// sequence never completes on its own.
///
/// # Examples
///
/// ```
/// use modelcell::{state_map, Model};
/// use futures::{executor::block_on, StreamExt};
///
/// let model = Model::new(state_map! { "step" => 1 });
/// let mut states = model.to_observable().stream();
///
/// model.set_state(state_map! { "step" => 2 });
///
/// let first = block_on(states.next()).unwrap();
/// let second = block_on(states.next()).unwrap();
/// assert_eq!(first.get_as::<i64>("step"), Ok(1));
/// assert_eq!(second.get_as::<i64>("step"), Ok(2));
/// ```
pub struct Observable<T> {
    subject: BehaviorSubject<T>,
}

impl<T: ModelState> Observable<T> {
    pub(crate) fn new(subject: BehaviorSubject<T>) -> Self {
        Self { subject }
    }

    /// Register a callback; see [`Model::subscribe`](crate::Model::subscribe).
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subject.subscribe(callback)
    }

    /// Consume states asynchronously.
    ///
    /// The stream is backed by an unbounded channel. Every distinct state
    /// published before the stream is polled stays queued, so a stream that
    /// is never polled grows without limit. Drop it or call
    /// [`close`](StateStream::close) once it is no longer read.
    pub fn stream(&self) -> StateStream<T> {
        let (sender, receiver) = mpsc::unbounded();
        let subscription = self.subject.subscribe(move |state: &T| {
            // The receiver closes only when the stream is dropped or closed,
            // which also disposes this listener.
            let _ = sender.unbounded_send(state.clone());
        });
        StateStream::new(receiver, subscription)
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
        }
    }
}
