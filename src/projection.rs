//! State projection
//!
//! Selects the persisted slice of a state tree and renders it as the record
//! written to storage. Paths that do not resolve are kept in the projection as
//! `None` so they take part in change detection, but are left out of the
//! serialized record.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::config::KeyPath;

/// Selected slice of a state tree
///
/// Equality is structural, ignores object key order, and compares numbers by
/// value (`1` equals `1.0`).
#[derive(Debug, Clone)]
pub enum Projection {
    /// No paths configured: the state itself
    Whole(Value),
    /// Canonical path string -> resolved value, in declaration order
    Fields(IndexMap<String, Option<Value>>),
}

impl Projection {
    /// Build the projection of `state` for the given paths
    pub fn of(state: &Value, keys_to_save: Option<&[KeyPath]>) -> Self {
        let Some(keys) = keys_to_save else {
            return Projection::Whole(state.clone());
        };

        let mut fields = IndexMap::with_capacity(keys.len());
        for path in keys {
            fields.insert(path.canonical(), resolve(state, path).cloned());
        }
        Projection::Fields(fields)
    }

    /// Render the record stored under the configured key
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl PartialEq for Projection {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Projection::Whole(a), Projection::Whole(b)) => values_equal(a, b),
            (Projection::Fields(a), Projection::Fields(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, left)| match (left, b.get(key)) {
                        (Some(l), Some(Some(r))) => values_equal(l, r),
                        (None, Some(None)) => true,
                        _ => false,
                    })
            }
            _ => false,
        }
    }
}

/// Deep equality with numbers compared by value.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(l), Value::Number(r)) => {
            if let (Some(l), Some(r)) = (l.as_i64(), r.as_i64()) {
                return l == r;
            }
            if let (Some(l), Some(r)) = (l.as_u64(), r.as_u64()) {
                return l == r;
            }
            l.as_f64() == r.as_f64()
        }
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l
                    .iter()
                    .all(|(key, lv)| r.get(key).is_some_and(|rv| values_equal(lv, rv)))
        }
        _ => a == b,
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Projection::Whole(value) => value.serialize(serializer),
            Projection::Fields(fields) => {
                let present = fields.iter().filter_map(|(k, v)| v.as_ref().map(|v| (k, v)));
                let mut map = serializer.serialize_map(None)?;
                for (key, value) in present {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Resolve `path` against `state`.
///
/// Objects are entered by key, arrays by decimal index. `None` means some
/// segment was missing; a present `null` resolves to `Some(Value::Null)`.
pub fn resolve<'a>(state: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(state, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_top_level_and_nested() {
        let state = json!({"a": 1, "b": {"c": 2, "d": 3}});
        assert_eq!(resolve(&state, &"a".into()), Some(&json!(1)));
        assert_eq!(resolve(&state, &["b", "c"].into()), Some(&json!(2)));
        assert_eq!(resolve(&state, &["b", "x"].into()), None);
        assert_eq!(resolve(&state, &["a", "c"].into()), None);
    }

    #[test]
    fn test_resolve_dot_is_literal_in_field() {
        let state = json!({"a.b": "flat", "a": {"b": "deep"}});
        assert_eq!(resolve(&state, &"a.b".into()), Some(&json!("flat")));
        assert_eq!(resolve(&state, &["a", "b"].into()), Some(&json!("deep")));

        let only_nested = json!({"a": {"b": "deep"}});
        assert_eq!(resolve(&only_nested, &"a.b".into()), None);
    }

    #[test]
    fn test_resolve_null_is_present() {
        let state = json!({"a": null});
        assert_eq!(resolve(&state, &"a".into()), Some(&Value::Null));
        assert_eq!(resolve(&state, &"b".into()), None);
    }

    #[test]
    fn test_resolve_array_index() {
        let state = json!({"list": [10, {"x": 20}]});
        assert_eq!(resolve(&state, &["list", "1", "x"].into()), Some(&json!(20)));
        assert_eq!(resolve(&state, &["list", "5"].into()), None);
        assert_eq!(resolve(&state, &["list", "first"].into()), None);
    }

    #[test]
    fn test_whole_projection_serializes_state() {
        let state = json!({"somestate": "somevalue"});
        let projection = Projection::of(&state, None);
        assert_eq!(projection.to_json().unwrap(), r#"{"somestate":"somevalue"}"#);
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let state = json!({"z": 1, "a": {"b": 2}});
        let keys = vec![KeyPath::from(["a", "b"]), KeyPath::from("z")];
        let projection = Projection::of(&state, Some(&keys[..]));
        assert_eq!(projection.to_json().unwrap(), r#"{"a,b":2,"z":1}"#);
    }

    #[test]
    fn test_missing_fields_are_omitted_from_record() {
        let state = json!({"a": 1, "n": null});
        let keys = vec![KeyPath::from("a"), "missing".into(), "n".into()];
        let projection = Projection::of(&state, Some(&keys[..]));

        let Projection::Fields(fields) = &projection else {
            panic!("expected field projection");
        };
        assert_eq!(fields.get("missing"), Some(&None));
        assert_eq!(projection.to_json().unwrap(), r#"{"a":1,"n":null}"#);
    }

    #[test]
    fn test_absent_to_present_is_a_change() {
        let keys = vec![KeyPath::from("a")];
        let before = Projection::of(&json!({}), Some(&keys[..]));
        let after = Projection::of(&json!({"a": 1}), Some(&keys[..]));
        assert_ne!(before, after);
        assert_eq!(before, Projection::of(&json!({"b": 2}), Some(&keys[..])));
    }

    #[test]
    fn test_equality_ignores_key_order() {
        let left = Projection::of(&json!({"x": 1, "y": {"p": 1, "q": 2}}), None);
        let right = Projection::of(&json!({"y": {"q": 2, "p": 1}, "x": 1}), None);
        assert_eq!(left, right);
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!({"a": [2, {"b": 3.0}]}), &json!({"a": [2.0, {"b": 3}]})));
        assert!(!values_equal(&json!(1), &json!(1.5)));
        assert!(!values_equal(&json!(-1), &json!(u64::MAX)));
        assert!(!values_equal(&json!([1]), &json!([1, 1])));

        let keys = vec![KeyPath::field("a")];
        assert_eq!(
            Projection::of(&json!({"a": 1}), Some(&keys[..])),
            Projection::of(&json!({"a": 1.0}), Some(&keys[..]))
        );
        assert_eq!(
            Projection::of(&json!({"a": 1}), None),
            Projection::of(&json!({"a": 1.0}), None)
        );
    }

    #[test]
    fn test_duplicate_canonical_key_keeps_first_position() {
        let state = json!({"b,c": "flat", "a": 0, "b": {"c": "deep"}});
        let keys = vec![KeyPath::from("b,c"), "a".into(), ["b", "c"].into()];
        let projection = Projection::of(&state, Some(&keys[..]));
        assert_eq!(projection.to_json().unwrap(), r#"{"b,c":"deep","a":0}"#);
    }
}
