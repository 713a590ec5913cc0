use std::sync::Arc;

/// Construction options for a [`Model`](crate::Model).
///
/// # Examples
///
/// ```
/// use modelcell::{state_map, Model, ModelConfig};
///
/// let model = Model::with_config(state_map! {}, ModelConfig::new().label("settings"));
/// assert_eq!(model.label(), "settings");
/// ```
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Name attached to every log event the model emits.
    pub label: Arc<str>,
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = label.into();
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            label: Arc::from("model"),
        }
    }
}
