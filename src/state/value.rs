use super::error::StateError;
use super::map::StateMap;
use super::shared::Shared;
use std::fmt;
use std::sync::Arc;

/// A dynamically typed state field.
///
/// Scalars and text compare by value. Lists and maps are held through
/// [`Shared`] and compare by identity, so equality between two values never
/// descends into nested structures.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Arc<str>),
    List(Shared<Vec<Value>>),
    Map(Shared<StateMap>),
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn mismatch(&self, expected: &'static str) -> StateError {
        StateError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(map) => write!(f, "{}", &**map),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Shared::new(items))
    }
}

impl From<Shared<Vec<Value>>> for Value {
    fn from(items: Shared<Vec<Value>>) -> Self {
        Value::List(items)
    }
}

impl From<StateMap> for Value {
    fn from(map: StateMap) -> Self {
        Value::Map(Shared::new(map))
    }
}

impl From<Shared<StateMap>> for Value {
    fn from(map: Shared<StateMap>) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl TryFrom<&Value> for bool {
    type Error = StateError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch("bool")),
        }
    }
}

impl TryFrom<&Value> for i64 {
    type Error = StateError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(n) => Ok(*n),
            other => Err(other.mismatch("int")),
        }
    }
}

/// Reads floats, and ints converted with `as`. Ints beyond ±2^53 lose
/// precision in the conversion.
impl TryFrom<&Value> for f64 {
    type Error = StateError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(x) => Ok(*x),
            // Integers convert with `as`, so magnitudes above 2^53 round to
            // the nearest representable float. The reverse is never implicit.
            Value::Int(n) => Ok(*n as f64),
            other => Err(other.mismatch("float")),
        }
    }
}

impl TryFrom<&Value> for Arc<str> {
    type Error = StateError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(Arc::clone(s)),
            other => Err(other.mismatch("text")),
        }
    }
}

impl TryFrom<&Value> for String {
    type Error = StateError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s.to_string()),
            other => Err(other.mismatch("text")),
        }
    }
}

impl TryFrom<&Value> for Shared<Vec<Value>> {
    type Error = StateError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::List(items) => Ok(items.clone()),
            other => Err(other.mismatch("list")),
        }
    }
}

impl TryFrom<&Value> for Shared<StateMap> {
    type Error = StateError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Map(map) => Ok(map.clone()),
            other => Err(other.mismatch("map")),
        }
    }
}
