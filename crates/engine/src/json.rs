//! Interop with `serde_json` and serde-serializable types.

use serde::Serialize;
use serde_json::Value as Json;

use crate::error::UsageError;
use crate::value::{Inspect, Inspector, Kind, Value};

/// Convert a JSON document into a [`Value`].
///
/// `null` is the absence marker; numbers, strings and booleans take the Rust
/// type they deserialize to, so they compare strictly against native values.
pub fn from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::nil(),
        Json::Bool(b) => Value::of::<bool>(Kind::Bool(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::of::<i64>(Kind::Int(i128::from(i)))
            } else if let Some(u) = n.as_u64() {
                Value::of::<u64>(Kind::Int(i128::from(u)))
            } else {
                match n.as_f64() {
                    Some(f) => Value::of::<f64>(Kind::Float(f)),
                    None => Value::of::<serde_json::Number>(Kind::Opaque(n.to_string())),
                }
            }
        }
        Json::String(s) => Value::of::<str>(Kind::Text(s.clone())),
        Json::Array(items) => Value::seq::<[Json]>(Some(items.iter().map(from_json).collect())),
        Json::Object(map) => Value::map::<serde_json::Map<String, Json>>(Some(
            map.iter()
                .map(|(k, v)| (Value::of::<str>(Kind::Text(k.clone())), from_json(v)))
                .collect(),
        )),
    }
}

impl Inspect for Json {
    fn inspect(&self, _cx: &mut Inspector) -> Value {
        from_json(self)
    }
}

/// Inspect any serializable value through its JSON form.
///
/// Type names of records are not preserved: structs become mappings keyed
/// by field name.
pub fn inspect_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Value, UsageError> {
    let json = serde_json::to_value(value)?;
    Ok(from_json(&json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{deep_equal, inspect, strict_equal, Options};

    #[derive(Serialize)]
    struct Order {
        id: u32,
        lines: Vec<String>,
    }

    #[test]
    fn scalars_match_native_types() {
        let j = strict_equal(&from_json(&serde_json::json!(5)), &inspect(&5i64)).unwrap();
        assert!(j.is_equal());
        let j = strict_equal(&from_json(&serde_json::json!("a")), &inspect("a")).unwrap();
        assert!(j.is_equal());
    }

    #[test]
    fn null_is_absent() {
        assert!(from_json(&Json::Null).is_absent());
    }

    #[test]
    fn serializable_structs_compare_structurally() {
        let a = inspect_serialize(&Order {
            id: 1,
            lines: vec!["x".into()],
        })
        .unwrap();
        let b = from_json(&serde_json::json!({"lines": ["x"], "id": 1}));
        assert!(deep_equal(&a, &b, &Options::default()).is_equal());

        let c = from_json(&serde_json::json!({"lines": ["y"], "id": 1}));
        let j = deep_equal(&a, &c, &Options::default());
        assert_eq!(j.diff().unwrap().first().path, r#"["lines"][0]"#);
    }
}
