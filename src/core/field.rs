//! Attribute values carried by dynamic resources

use crate::core::entity::Resource;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// A polymorphic attribute value
///
/// Scalars map one-to-one onto JSON scalars. Nested objects that the decoder
/// recognised as resources (they carry `@id`/`@type`) become
/// [`FieldValue::Resource`]; any other object stays a plain [`FieldValue::Map`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<FieldValue>),
    Map(IndexMap<String, FieldValue>),
    Resource(Box<Resource>),
}

/// Returned by reads of attributes that were never set
pub static ABSENT: FieldValue = FieldValue::Null;

impl FieldValue {
    /// Convert a JSON value without resource detection
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from_json).collect())
            }
            Value::Object(map) => FieldValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, FieldValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert back to JSON; nested resources are emitted in wire shape
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Integer(i) => Value::Number((*i).into()),
            FieldValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::List(items) => Value::Array(items.iter().map(|v| v.to_json()).collect()),
            FieldValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
            FieldValue::Resource(resource) => resource.to_json(),
        }
    }

    /// Get the value as a string slice if possible
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, FieldValue>> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            FieldValue::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// Check if the value is null (also the absence sentinel)
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Whether this is a multi-valued attribute
    pub fn is_list(&self) -> bool {
        matches!(self, FieldValue::List(_))
    }

    /// Loose comparison used by finders
    ///
    /// A nested resource also matches a string equal to its `@id`, since the
    /// API embeds either the full object or only its URI depending on the
    /// `include` parameter.
    pub fn matches(&self, target: &FieldValue) -> bool {
        if self == target {
            return true;
        }
        match (self, target) {
            (FieldValue::Resource(r), FieldValue::String(s)) => r.id() == Some(s.as_str()),
            (FieldValue::String(s), FieldValue::Resource(r)) => r.id() == Some(s.as_str()),
            _ => false,
        }
    }

    /// Membership test for multi-valued attributes
    pub fn contains(&self, target: &FieldValue) -> bool {
        match self {
            FieldValue::List(items) => items.iter().any(|item| item.matches(target)),
            _ => false,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::from_json(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Resource> for FieldValue {
    fn from(value: Resource) -> Self {
        FieldValue::Resource(Box::new(value))
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(FieldValue::from_json(json!(null)), FieldValue::Null);
        assert_eq!(FieldValue::from_json(json!(true)), FieldValue::Boolean(true));
        assert_eq!(FieldValue::from_json(json!(42)), FieldValue::Integer(42));
        assert_eq!(FieldValue::from_json(json!(1.5)), FieldValue::Float(1.5));
        assert_eq!(FieldValue::from_json(json!("BRO")).as_str(), Some("BRO"));
    }

    #[test]
    fn test_nested_json_stays_plain() {
        let value = FieldValue::from_json(json!({"a": [1, 2], "b": {"c": "d"}}));
        let map = value.as_map().expect("map");
        assert_eq!(map["a"].as_list().map(|l| l.len()), Some(2));
        assert_eq!(value.to_json(), json!({"a": [1, 2], "b": {"c": "d"}}));
    }

    #[test]
    fn test_contains_for_lists() {
        let value = FieldValue::from(vec!["UMLS", "OBO"]);
        assert!(value.contains(&"OBO".into()));
        assert!(!value.contains(&"NCI".into()));
        assert!(!FieldValue::from("OBO").contains(&"OBO".into()));
    }

    #[test]
    fn test_resource_matches_its_id() {
        let mut user = Resource::new();
        user.set("@id", "https://api.example.org/users/alice");
        let value = FieldValue::from(vec![user]);

        assert!(value.contains(&"https://api.example.org/users/alice".into()));
        assert!(!value.contains(&"https://api.example.org/users/bob".into()));
    }

    #[test]
    fn test_absent_is_null() {
        assert!(ABSENT.is_null());
        assert_eq!(FieldValue::default(), ABSENT);
    }
}
