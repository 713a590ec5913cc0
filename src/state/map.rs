use super::error::StateError;
use super::merge::ModelState;
use super::value::Value;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// String-keyed dynamic state.
///
/// Merging lays every key of the partial map over a copy of the current map.
/// Keys missing from the partial map are left alone; there is no way to
/// remove a key through a merge, only to overwrite it (for instance with
/// [`Value::Null`]).
///
/// # Examples
///
/// ```
/// use modelcell::{state_map, ModelState, Value};
///
/// let state = state_map! { "count" => 1, "label" => "clicks" };
/// let next = state.merge(state_map! { "count" => 2 });
///
/// assert_eq!(next.get("count"), Some(&Value::Int(2)));
/// assert_eq!(next.get_as::<String>("label").unwrap(), "clicks");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateMap {
    fields: BTreeMap<String, Value>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](StateMap::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Read a field as a concrete type.
    pub fn get_as<'a, T>(&'a self, key: &str) -> Result<T, StateError>
    where
        T: TryFrom<&'a Value, Error = StateError>,
    {
        let value = self
            .fields
            .get(key)
            .ok_or_else(|| StateError::MissingField(key.to_string()))?;
        T::try_from(value).map_err(|err| err.in_field(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }
}

impl ModelState for StateMap {
    type Partial = StateMap;

    fn merge(&self, partial: StateMap) -> Self {
        let mut fields = self.fields.clone();
        fields.extend(partial.fields);
        Self { fields }
    }

    fn shallow_eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for StateMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a StateMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for StateMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

/// Build a [`StateMap`] from `key => value` pairs.
///
/// ```
/// use modelcell::state_map;
///
/// let map = state_map! { "name" => "tin", "size" => 3 };
/// assert_eq!(map.len(), 2);
/// ```
#[macro_export]
macro_rules! state_map {
    () => {
        $crate::StateMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::StateMap::new();
        $(
            map.insert($key, $value);
        )+
        map
    }};
}
