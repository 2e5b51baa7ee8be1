//! Codec between `serde_json` values and Firestore typed document values
//!
//! Firestore's REST API wraps every field in a type discriminator
//! (`stringValue`, `integerValue`, `mapValue`, ...). Integers are carried
//! as decimal strings on the wire.

use serde_json::{Map, Number, Value};

use crate::error::FirebaseError;

/// Encode a JSON value as a Firestore typed value.
pub fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => serde_json::json!({ "nullValue": null }),
        Value::Bool(b) => serde_json::json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::json!({ "integerValue": i.to_string() })
            } else {
                serde_json::json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => serde_json::json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(to_firestore_value).collect();
            serde_json::json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => serde_json::json!({ "mapValue": { "fields": to_fields(map) } }),
    }
}

/// Encode a JSON object as a Firestore `fields` map.
pub fn to_fields(map: &Map<String, Value>) -> Value {
    let mut fields = Map::new();
    for (key, value) in map {
        fields.insert(key.clone(), to_firestore_value(value));
    }
    Value::Object(fields)
}

/// Decode a Firestore typed value back into a JSON value.
pub fn from_firestore_value(value: &Value) -> Result<Value, FirebaseError> {
    let object = value
        .as_object()
        .ok_or_else(|| FirebaseError::Decode("typed value is not an object".into()))?;

    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| FirebaseError::Decode("typed value is empty".into()))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => Ok(inner.clone()),
        "integerValue" => {
            let text = inner
                .as_str()
                .ok_or_else(|| FirebaseError::Decode("integerValue is not a string".into()))?;
            let parsed: i64 = text
                .parse()
                .map_err(|e| FirebaseError::Decode(format!("bad integerValue: {e}")))?;
            Ok(Value::Number(parsed.into()))
        }
        "doubleValue" => {
            let number = inner
                .as_f64()
                .and_then(Number::from_f64)
                .ok_or_else(|| FirebaseError::Decode("bad doubleValue".into()))?;
            Ok(Value::Number(number))
        }
        "stringValue" | "timestampValue" | "referenceValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let decoded: Result<Vec<Value>, _> =
                values.iter().map(from_firestore_value).collect();
            Ok(Value::Array(decoded?))
        }
        "mapValue" => {
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            Ok(Value::Object(from_fields(&fields)?))
        }
        other => Err(FirebaseError::Decode(format!(
            "unsupported value type: {other}"
        ))),
    }
}

/// Decode a Firestore `fields` map back into a JSON object.
pub fn from_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, FirebaseError> {
    let mut map = Map::new();
    for (key, value) in fields {
        map.insert(key.clone(), from_firestore_value(value)?);
    }
    Ok(map)
}
