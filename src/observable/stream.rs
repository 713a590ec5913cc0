use crate::subject::Subscription;
use futures::channel::mpsc::UnboundedReceiver;
use futures::stream::{FusedStream, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Asynchronous view of a model's state sequence.
///
/// Yields the state current at creation first, then every later distinct
/// state. Values are buffered, so a slow consumer sees all of them in
/// order. Dropping the stream disposes its subscription; the stream ends
/// once the model and every observable over it have been dropped.
pub struct StateStream<T> {
    receiver: UnboundedReceiver<T>,
    subscription: Subscription,
}

impl<T> StateStream<T> {
    pub(crate) fn new(receiver: UnboundedReceiver<T>, subscription: Subscription) -> Self {
        Self {
            receiver,
            subscription,
        }
    }

    /// Stop receiving new states. Already buffered states are still yielded.
    pub fn close(&mut self) {
        self.subscription.dispose();
        self.receiver.close();
    }
}

impl<T> Stream for StateStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.receiver.poll_next_unpin(cx)
    }
}

impl<T> FusedStream for StateStream<T> {
    fn is_terminated(&self) -> bool {
        self.receiver.is_terminated()
    }
}
