use super::subscription::{Detach, Subscription};
use crate::state::ModelState;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listener<T> {
    id: usize,
    disposed: Arc<AtomicBool>,
    callback: Callback<T>,
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            disposed: Arc::clone(&self.disposed),
            callback: Arc::clone(&self.callback),
        }
    }
}

/// The committed value and a counter of distinct publishes.
struct Slot<T> {
    value: Arc<T>,
    generation: u64,
}

struct SubjectInner<T> {
    label: Arc<str>,
    current: RwLock<Slot<T>>,
    listeners: Mutex<Vec<Listener<T>>>,
    next_id: AtomicUsize,
}

impl<T: ModelState> Detach for SubjectInner<T> {
    fn detach_listener(&self, listener_id: usize) {
        let remaining = {
            let mut listeners = self.listeners.lock();
            listeners.retain(|listener| listener.id != listener_id);
            listeners.len()
        };
        tracing::debug!(
            model = %self.label,
            listener = listener_id,
            remaining,
            "listener disposed"
        );
    }
}

/// A value cell that replays its latest value to new listeners.
///
/// Every listener is called with the current value as soon as it
/// subscribes, then with each later value that is not
/// [shallow-equal](ModelState::shallow_eq) to the one before it. Delivery is
/// synchronous and follows registration order.
///
/// No lock is held while callbacks run, so a callback may read the subject,
/// publish to it, subscribe, or dispose. A publish made from inside a
/// callback is delivered in full before the outer delivery resumes, and the
/// outer delivery then stops: listeners it had not reached yet have already
/// seen the newer value.
///
/// # Examples
///
/// ```
/// use modelcell::subject::BehaviorSubject;
/// use modelcell::state_map;
/// use std::sync::{Arc, Mutex};
///
/// let subject = BehaviorSubject::new(state_map! { "n" => 1 });
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let _sub = subject.subscribe({
///     let seen = seen.clone();
///     move |state| seen.lock().unwrap().push(state.get_as::<i64>("n").unwrap())
/// });
///
/// subject.next(state_map! { "n" => 2 });
/// subject.next(state_map! { "n" => 2 }); // shallow-equal, suppressed
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
/// ```
pub struct BehaviorSubject<T> {
    inner: Arc<SubjectInner<T>>,
}

impl<T: ModelState> BehaviorSubject<T> {
    /// Create a subject holding `initial`.
    pub fn new(initial: T) -> Self {
        Self::with_label(initial, "subject")
    }

    /// Create a subject whose log events carry `label`.
    pub fn with_label(initial: T, label: impl Into<Arc<str>>) -> Self {
        Self {
            inner: Arc::new(SubjectInner {
                label: label.into(),
                current: RwLock::new(Slot {
                    value: Arc::new(initial),
                    generation: 0,
                }),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicUsize::new(0),
            }),
        }
    }

    /// Get a clone of the current value.
    pub fn value(&self) -> T {
        T::clone(&self.snapshot())
    }

    /// Get the shared current value without cloning it.
    pub fn snapshot(&self) -> Arc<T> {
        Arc::clone(&self.inner.current.read().value)
    }

    /// Read the current value with a function. `f` must not publish.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let slot = self.inner.current.read();
        f(&slot.value)
    }

    /// Publish a new value.
    pub fn next(&self, value: T) {
        self.commit_with(move |_| value);
    }

    /// Compute and publish the next value from the current one.
    ///
    /// The computation runs while the cell is locked for writing, so `f`
    /// must not touch this subject.
    pub(crate) fn commit_with(&self, f: impl FnOnce(&T) -> T) {
        let published = {
            let mut slot = self.inner.current.write();
            let next = Arc::new(f(&slot.value));
            let distinct = !slot.value.shallow_eq(&next);
            slot.value = Arc::clone(&next);
            if distinct {
                slot.generation += 1;
                Some((next, slot.generation))
            } else {
                None
            }
        };

        match published {
            Some((value, generation)) => self.deliver(&value, generation),
            None => {
                tracing::trace!(
                    model = %self.inner.label,
                    listeners = self.listener_count(),
                    distinct = false,
                    "state published"
                );
            }
        }
    }

    fn deliver(&self, value: &T, generation: u64) {
        let listeners = self.inner.listeners.lock().clone();
        tracing::trace!(
            model = %self.inner.label,
            listeners = listeners.len(),
            distinct = true,
            generation,
            "state published"
        );

        for listener in &listeners {
            if self.inner.current.read().generation != generation {
                // a callback published something newer
                break;
            }
            if !listener.disposed.load(Ordering::Acquire) {
                (listener.callback)(value);
            }
        }
    }

    /// Register a listener and replay the current value to it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let disposed = Arc::new(AtomicBool::new(false));
        let callback: Callback<T> = Arc::new(callback);

        self.inner.listeners.lock().push(Listener {
            id,
            disposed: Arc::clone(&disposed),
            callback: Arc::clone(&callback),
        });
        tracing::debug!(model = %self.inner.label, listener = id, "listener registered");

        let inner: Arc<dyn Detach> = self.inner.clone();
        let subscription = Subscription::new(id, disposed, Arc::downgrade(&inner));

        // Replay the latest value to the new listener.
        let current = self.snapshot();
        callback(&current);

        subscription
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }
}

impl<T> Clone for BehaviorSubject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state_map, StateMap};
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn counter(n: i64) -> StateMap {
        state_map! { "n" => n }
    }

    fn recorder(
        subject: &BehaviorSubject<StateMap>,
    ) -> (Arc<Mutex<Vec<i64>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sub = subject.subscribe({
            let seen = seen.clone();
            move |state: &StateMap| seen.lock().push(state.get_as::<i64>("n").unwrap())
        });
        (seen, sub)
    }

    #[test]
    fn replays_current_value_on_subscribe() {
        let subject = BehaviorSubject::new(counter(5));
        let (seen, _sub) = recorder(&subject);

        assert_eq!(*seen.lock(), vec![5]);
    }

    #[test]
    fn suppresses_consecutive_duplicates() {
        let subject = BehaviorSubject::new(counter(0));
        let (seen, _sub) = recorder(&subject);

        subject.next(counter(1));
        subject.next(counter(1));
        subject.next(counter(2));
        subject.next(counter(1));

        assert_eq!(*seen.lock(), vec![0, 1, 2, 1]);
    }

    #[test]
    fn suppressed_value_still_becomes_current() {
        let subject = BehaviorSubject::new(counter(1));
        let (seen, _sub) = recorder(&subject);
        let before = subject.snapshot();

        subject.next(counter(1));

        assert!(!Arc::ptr_eq(&before, &subject.snapshot()));
        assert_eq!(*seen.lock(), vec![1]);
    }

    #[test]
    fn delivers_in_registration_order() {
        let subject = BehaviorSubject::new(counter(0));
        let order = Arc::new(Mutex::new(Vec::new()));

        let subs: Vec<_> = (0..3)
            .map(|i| {
                let order = order.clone();
                subject.subscribe(move |_| order.lock().push(i))
            })
            .collect();
        order.lock().clear();

        subject.next(counter(1));
        assert_eq!(*order.lock(), vec![0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn disposed_listener_receives_nothing_more() {
        let subject = BehaviorSubject::new(counter(0));
        let (seen, sub) = recorder(&subject);

        subject.next(counter(1));
        sub.dispose();
        sub.dispose();
        subject.next(counter(2));

        assert_eq!(*seen.lock(), vec![0, 1]);
        assert_eq!(subject.listener_count(), 0);
    }

    #[test]
    fn dispose_during_delivery_skips_later_listener() {
        let subject = BehaviorSubject::new(counter(0));
        let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let _killer = subject.subscribe({
            let victim = victim.clone();
            move |state: &StateMap| {
                if state.get_as::<i64>("n") == Ok(1) {
                    if let Some(sub) = victim.lock().as_ref() {
                        sub.dispose();
                    }
                }
            }
        });
        let (seen, sub) = recorder(&subject);
        *victim.lock() = Some(sub);

        subject.next(counter(1));

        assert_eq!(*seen.lock(), vec![0]);
        assert_eq!(subject.listener_count(), 1);
    }

    #[test]
    fn nested_publish_supersedes_outer_round() {
        let subject = BehaviorSubject::new(counter(0));
        let first_seen = Arc::new(Mutex::new(Vec::new()));

        let _first = subject.subscribe({
            let subject = subject.clone();
            let first_seen = first_seen.clone();
            move |state: &StateMap| {
                let n = state.get_as::<i64>("n").unwrap();
                first_seen.lock().push(n);
                if n == 1 {
                    subject.next(counter(2));
                }
            }
        });
        let (second_seen, _second) = recorder(&subject);

        subject.next(counter(1));

        assert_eq!(*first_seen.lock(), vec![0, 1, 2]);
        // never sees the stale 1 after 2
        assert_eq!(*second_seen.lock(), vec![0, 2]);
        assert_eq!(subject.value().get_as::<i64>("n"), Ok(2));
    }

    #[test]
    fn subscribe_from_callback_gets_replay_once() {
        let subject = BehaviorSubject::new(counter(0));
        let late = Arc::new(Mutex::new(Vec::new()));
        let late_sub: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let _outer = subject.subscribe({
            let subject = subject.clone();
            let late = late.clone();
            let late_sub = late_sub.clone();
            move |state: &StateMap| {
                if state.get_as::<i64>("n") == Ok(1) && late_sub.lock().is_none() {
                    let late = late.clone();
                    let sub = subject.subscribe(move |s: &StateMap| {
                        late.lock().push(s.get_as::<i64>("n").unwrap())
                    });
                    *late_sub.lock() = Some(sub);
                }
            }
        });

        subject.next(counter(1));
        subject.next(counter(2));

        assert_eq!(*late.lock(), vec![1, 2]);
    }

    /// Collects the `distinct` field of every publish event.
    #[derive(Clone, Default)]
    struct PublishLog(Arc<Mutex<Vec<bool>>>);

    impl<S: tracing::Subscriber> Layer<S> for PublishLog {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct Distinct(Option<bool>);

            impl Visit for Distinct {
                fn record_bool(&mut self, field: &Field, value: bool) {
                    if field.name() == "distinct" {
                        self.0 = Some(value);
                    }
                }

                fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
            }

            let mut distinct = Distinct(None);
            event.record(&mut distinct);
            if let Some(value) = distinct.0 {
                self.0.lock().push(value);
            }
        }
    }

    #[test]
    fn every_publish_is_traced_with_distinct_flag() {
        let log = PublishLog::default();
        let subscriber = tracing_subscriber::registry().with(log.clone());

        tracing::subscriber::with_default(subscriber, || {
            let subject = BehaviorSubject::new(counter(0));
            let (_seen, _sub) = recorder(&subject);

            subject.next(counter(1));
            subject.next(counter(1));
            subject.next(counter(2));
        });

        assert_eq!(*log.0.lock(), vec![true, false, true]);
    }
}
