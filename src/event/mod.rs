use indexmap::IndexMap;

mod value;

pub use self::value::Value;

/// An ordered set of named fields, as delivered by the upstream agent.
///
/// Iteration follows insertion order, which decides the order of dimensions on the wire.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, returning the previous value under the same name.
    ///
    /// Re-inserting an existing name keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

/// A record together with the time it was observed, in seconds since the Unix epoch.
#[derive(PartialEq, Debug, Clone)]
pub struct Event {
    pub timestamp: i64,
    pub record: Record,
}

impl Event {
    pub const fn new(timestamp: i64, record: Record) -> Self {
        Self { timestamp, record }
    }
}
