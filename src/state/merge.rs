/// A state value that can be updated by shallow merge.
///
/// Implementors describe two things: how a partial update folds into the
/// current value, and when two values count as the same state. Both are
/// shallow. Merging replaces top-level fields wholesale and equality
/// compares top-level fields only.
///
/// Most structs get this through [`model_state!`](crate::model_state); the
/// dynamic [`StateMap`](crate::StateMap) implements it for string-keyed
/// state.
///
/// # Examples
///
/// ```
/// use modelcell::ModelState;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Volume {
///     level: u8,
///     muted: bool,
/// }
///
/// #[derive(Default)]
/// struct VolumePatch {
///     level: Option<u8>,
///     muted: Option<bool>,
/// }
///
/// impl ModelState for Volume {
///     type Partial = VolumePatch;
///
///     fn merge(&self, partial: VolumePatch) -> Self {
///         Self {
///             level: partial.level.unwrap_or(self.level),
///             muted: partial.muted.unwrap_or(self.muted),
///         }
///     }
///
///     fn shallow_eq(&self, other: &Self) -> bool {
///         self == other
///     }
/// }
///
/// let loud = Volume { level: 11, muted: false };
/// let muted = loud.merge(VolumePatch { muted: Some(true), ..Default::default() });
/// assert_eq!(muted, Volume { level: 11, muted: true });
/// ```
pub trait ModelState: Clone + Send + Sync + 'static {
    /// The partial update accepted by [`merge`](ModelState::merge).
    type Partial;

    /// Produce a new state with the fields of `partial` laid over `self`.
    fn merge(&self, partial: Self::Partial) -> Self;

    /// Top-level field comparison used to suppress duplicate notifications.
    fn shallow_eq(&self, other: &Self) -> bool;
}
