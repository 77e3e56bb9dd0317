use std::fmt;

/// A single scalar field value of a record.
///
/// Values are closed over the shapes an upstream log agent hands over. Nested
/// structures are flattened to their compact JSON text before they get here.
#[derive(PartialEq, Debug, Clone)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// The field is present but carries no value.
    Null,
}

impl Value {
    /// Renders the value the way it is sent to Timestream.
    ///
    /// `Null` and empty text both render as the empty string, which callers treat as "no value".
    pub fn to_string_lossy(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if n.is_u64() {
                    // Out of range for i64, keep every digit.
                    Value::Text(n.to_string())
                } else {
                    n.as_f64().map_or_else(|| Value::Text(n.to_string()), Value::Float)
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::Text(nested.to_string())
            }
        }
    }
}

impl From<String> for Value {
    fn from(string: String) -> Self {
        Value::Text(string)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            None => Value::Null,
            Some(v) => v.into(),
        }
    }
}
