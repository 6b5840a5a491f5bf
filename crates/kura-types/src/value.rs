//! Value and key types for kura's runtime.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A container key.
///
/// Containers are keyed by either integers or strings. Keys order
/// integers before strings: integer keys compare numerically, string
/// keys lexicographically, and every integer key sorts before every
/// string key. Container snapshots rely on this ordering to iterate
/// deterministically regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Returns the string form of this key, as it appears in JSON.
    pub fn to_json_key(&self) -> String {
        match self {
            Key::Int(n) => n.to_string(),
            Key::Str(s) => s.clone(),
        }
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Int(a), Key::Int(b)) => a.cmp(b),
            (Key::Str(a), Key::Str(b)) => a.cmp(b),
            (Key::Int(_), Key::Str(_)) => Ordering::Less,
            (Key::Str(_), Key::Int(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

/// A runtime value.
///
/// Supports primitives (null, bool, int, float, string) and `Map`, the
/// single container shape: an insertion-ordered sequence of key/value
/// pairs keyed by [`Key`]. Plain lists are maps with integer keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Ordered key/value container. Nesting maps inside maps is how
    /// tree-shaped data is represented.
    Map(Vec<(Key, Value)>),
}

impl Value {
    /// Build a container from key/value pairs, preserving insertion order.
    pub fn map(pairs: impl IntoIterator<Item = (Key, Value)>) -> Self {
        Value::Map(pairs.into_iter().collect())
    }

    /// Build a container from values alone, keyed 0..n.
    pub fn list(values: impl IntoIterator<Item = Value>) -> Self {
        Value::Map(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::Int(i as i64), v))
                .collect(),
        )
    }

    /// True if this value is a container (and therefore traversable).
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// The container's pairs, or `None` for scalar values.
    pub fn as_map(&self) -> Option<&[(Key, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Look up a key in a container. First match wins; `None` for
    /// scalars and missing keys.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
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

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Delegate to value_to_json for consistent JSON representation.
        // Float NaN → null, integer keys → decimal strings.
        value_to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(json_to_value(json))
    }
}

/// Convert a value to its JSON representation.
///
/// Containers become JSON objects with string keys (integer keys are
/// rendered as decimal strings). NaN and infinite floats become null,
/// which is what JSON can express.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::from(*n),
        Value::Float(x) => serde_json::Number::from_f64(*x)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Map(pairs) => {
            let mut obj = serde_json::Map::new();
            for (key, val) in pairs {
                obj.insert(key.to_json_key(), value_to_json(val));
            }
            serde_json::Value::Object(obj)
        }
    }
}

/// Convert parsed JSON into a value.
///
/// Objects become containers; keys that parse as decimal integers
/// collapse to integer keys. Arrays become containers keyed 0..n.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::list(items.into_iter().map(json_to_value))
        }
        serde_json::Value::Object(obj) => Value::Map(
            obj.into_iter()
                .map(|(k, v)| (parse_json_key(k), json_to_value(v)))
                .collect(),
        ),
    }
}

/// Integer-like object keys ("0", "-3", "42") collapse to integer keys.
/// Anything else, including "007" and "1.5", stays a string key.
fn parse_json_key(key: String) -> Key {
    match key.parse::<i64>() {
        Ok(n) if n.to_string() == key => Key::Int(n),
        _ => Key::Str(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Key::Int(-3), Key::Int(7))]
    #[case(Key::Int(7), Key::Int(10))]
    #[case(Key::Int(9999), Key::Str("0".into()))]
    #[case(Key::Str("alpha".into()), Key::Str("beta".into()))]
    fn test_key_ordering(#[case] lesser: Key, #[case] greater: Key) {
        assert!(lesser < greater);
    }

    #[test]
    fn test_integer_keys_sort_before_string_keys() {
        let mut keys = vec![
            Key::Str("b".into()),
            Key::Int(10),
            Key::Str("a".into()),
            Key::Int(2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                Key::Int(2),
                Key::Int(10),
                Key::Str("a".into()),
                Key::Str("b".into()),
            ]
        );
    }

    #[test]
    fn test_is_container() {
        assert!(Value::map([]).is_container());
        assert!(!Value::Int(3).is_container());
        assert!(!Value::Null.is_container());
    }

    #[test]
    fn test_get() {
        let v = Value::map([
            (Key::from("a"), Value::Int(1)),
            (Key::from(0), Value::from("zero")),
        ]);
        assert_eq!(v.get(&Key::from("a")), Some(&Value::Int(1)));
        assert_eq!(v.get(&Key::from(0)), Some(&Value::from("zero")));
        assert_eq!(v.get(&Key::from("missing")), None);
        assert_eq!(Value::Int(1).get(&Key::from("a")), None);
    }

    #[test]
    fn test_list_keys() {
        let v = Value::list([Value::Int(10), Value::Int(20)]);
        assert_eq!(v.get(&Key::Int(0)), Some(&Value::Int(10)));
        assert_eq!(v.get(&Key::Int(1)), Some(&Value::Int(20)));
    }

    #[test]
    fn test_json_round_trip() {
        let v = Value::map([
            (Key::from("name"), Value::from("kura")),
            (
                Key::from("tags"),
                Value::list([Value::from("a"), Value::from("b")]),
            ),
            (Key::from("count"), Value::Int(2)),
        ]);
        let json = serde_json::to_string(&v).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        // Object key order may differ; compare by lookup.
        assert_eq!(back.get(&Key::from("name")), Some(&Value::from("kura")));
        assert_eq!(back.get(&Key::from("count")), Some(&Value::Int(2)));
        let tags = back.get(&Key::from("tags")).unwrap();
        assert_eq!(tags.get(&Key::Int(0)), Some(&Value::from("a")));
    }

    #[test]
    fn test_json_integer_keys_collapse() {
        let back: Value = serde_json::from_str(r#"{"0": "a", "07": "b"}"#).unwrap();
        assert_eq!(back.get(&Key::Int(0)), Some(&Value::from("a")));
        // Non-canonical digits stay string keys.
        assert_eq!(back.get(&Key::from("07")), Some(&Value::from("b")));
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let json = value_to_json(&Value::Float(f64::NAN));
        assert_eq!(json, serde_json::Value::Null);
    }
}
