use super::config::ModelConfig;
use crate::observable::Observable;
use crate::state::ModelState;
use crate::subject::{BehaviorSubject, Subscription};
use std::fmt;
use std::sync::Arc;

/// A stateful model with shallow-merge updates.
///
/// The model owns one state value. [`set_state`](Model::set_state) merges a
/// partial update into it and publishes the result; subscribers receive the
/// current state straight away and every later distinct state after that.
/// Cloning a `Model` yields another handle to the same state.
///
/// # Examples
///
/// ```
/// use modelcell::{state_map, Model};
/// use std::sync::{Arc, Mutex};
///
/// let model = Model::new(state_map! { "count" => 0, "name" => "clicks" });
/// let log = Arc::new(Mutex::new(Vec::new()));
///
/// let subscription = model.subscribe({
///     let log = log.clone();
///     move |state| log.lock().unwrap().push(state.get_as::<i64>("count").unwrap())
/// });
///
/// model.set_state(state_map! { "count" => 1 });
/// model.set_state(state_map! { "count" => 1 });
/// subscription.dispose();
/// model.set_state(state_map! { "count" => 2 });
///
/// assert_eq!(*log.lock().unwrap(), vec![0, 1]);
/// assert_eq!(model.state().get_as::<String>("name").unwrap(), "clicks");
/// ```
pub struct Model<T> {
    subject: BehaviorSubject<T>,
}

impl<T: ModelState> Model<T> {
    /// Create a model holding `initial`.
    pub fn new(initial: T) -> Self {
        Self::with_config(initial, ModelConfig::default())
    }

    /// Create a model with explicit options.
    pub fn with_config(initial: T, config: ModelConfig) -> Self {
        tracing::debug!(model = %config.label, "model created");
        Self {
            subject: BehaviorSubject::with_label(initial, config.label),
        }
    }

    /// Get a clone of the current state.
    pub fn state(&self) -> T {
        self.subject.value()
    }

    /// Get the current state without cloning it.
    pub fn snapshot(&self) -> Arc<T> {
        self.subject.snapshot()
    }

    /// Read the current state with a function.
    ///
    /// The state stays locked for reading while `f` runs, so `f` must not
    /// call [`set_state`](Model::set_state).
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.subject.with(f)
    }

    /// Merge `partial` into the current state and publish the result.
    ///
    /// The merged state always becomes current. Subscribers are only called
    /// when it differs, shallowly, from the state it replaces.
    pub fn set_state(&self, partial: T::Partial) {
        self.subject.commit_with(move |current| current.merge(partial));
    }

    /// Subscribe to state changes.
    ///
    /// The callback runs immediately with the current state, then with every
    /// later distinct state until the returned [`Subscription`] is disposed
    /// or dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subject.subscribe(callback)
    }

    /// A lazy view of this model's states.
    pub fn to_observable(&self) -> Observable<T> {
        Observable::new(self.subject.clone())
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subject.listener_count()
    }

    pub fn label(&self) -> &str {
        self.subject.label()
    }
}

impl<T> Clone for Model<T> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
        }
    }
}

impl<T: ModelState + fmt::Debug> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|state| {
            f.debug_struct("Model")
                .field("label", &self.label())
                .field("state", state)
                .finish()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model_state, Shared};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    model_state! {
        #[derive(Clone, Debug, PartialEq)]
        struct AppState => AppPatch {
            count: usize,
            name: String,
            items: Shared<Vec<String>>,
        }
    }

    fn app_state() -> AppState {
        AppState {
            count: 0,
            name: "test".to_string(),
            items: Shared::new(Vec::new()),
        }
    }

    #[test]
    fn model_initial_state() {
        let initial = app_state();
        let model = Model::new(initial.clone());

        assert_eq!(model.state(), initial);
        assert_eq!(model.label(), "model");
    }

    #[test]
    fn model_set_state_merges() {
        let model = Model::new(app_state());

        model.set_state(AppPatch::default().count(42));
        assert_eq!(model.state().count, 42);
        assert_eq!(model.state().name, "test");

        model.set_state(AppPatch::default().name("updated".to_string()));
        assert_eq!(model.read(|s| s.count), 42);
        assert_eq!(model.read(|s| s.name.clone()), "updated");
    }

    #[test]
    fn model_subscribe() {
        let model = Model::new(app_state());

        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let _sub = model.subscribe(move |_state| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        // replayed immediately
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        model.set_state(AppPatch::default().count(1));
        assert_eq!(call_count.load(Ordering::SeqCst), 2);

        model.set_state(AppPatch::default().count(1));
        assert_eq!(call_count.load(Ordering::SeqCst), 2);

        model.set_state(AppPatch::default());
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn model_nested_changes_are_by_identity() {
        let model = Model::new(app_state());
        let seen = Arc::new(AtomicUsize::new(0));
        let _sub = model.subscribe({
            let seen = seen.clone();
            move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        let same = model.read(|s| s.items.clone());
        model.set_state(AppPatch::default().items(same));
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        model.set_state(AppPatch::default().items(Shared::new(Vec::new())));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn model_clones_share_state() {
        let model = Model::new(app_state());
        let other = model.clone();

        other.set_state(AppPatch::default().count(7));
        assert_eq!(model.state().count, 7);
    }

    #[test]
    fn model_dispose_stops_delivery() {
        let model = Model::new(app_state());
        let counts = Arc::new(Mutex::new(Vec::new()));

        let sub = model.subscribe({
            let counts = counts.clone();
            move |state: &AppState| counts.lock().push(state.count)
        });
        model.set_state(AppPatch::default().count(1));
        sub.dispose();
        sub.dispose();
        model.set_state(AppPatch::default().count(2));

        assert_eq!(*counts.lock(), vec![0, 1]);
        assert_eq!(model.subscriber_count(), 0);
    }

    #[test]
    fn model_survives_panicking_subscriber() {
        let model = Model::new(app_state());
        let sub = model.subscribe(|state: &AppState| {
            if state.count == 1 {
                panic!("subscriber failure");
            }
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            model.set_state(AppPatch::default().count(1));
        }));
        assert!(result.is_err());

        // the update was committed and the model is still usable
        assert_eq!(model.state().count, 1);
        sub.dispose();
        model.set_state(AppPatch::default().count(2));
        assert_eq!(model.state().count, 2);
    }

    #[test]
    fn model_debug_shows_label_and_state() {
        let model = Model::with_config(app_state(), ModelConfig::new().label("app"));
        let rendered = format!("{model:?}");

        assert!(rendered.contains("\"app\""));
        assert!(rendered.contains("count: 0"));
    }
}
