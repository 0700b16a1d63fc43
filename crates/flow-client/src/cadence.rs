//! JSON-Cadence interchange format.
//!
//! Values arrive as `{"type": <type>, "value": <value>}` trees. [`decode`] flattens such a tree
//! into plain JSON: numbers and addresses stay strings (Cadence integers may exceed `u64`),
//! composites become objects keyed by field name and optionals become the inner value or `null`.

use flowdex_types::Address;
use serde_json::{json, Map, Value};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CadenceError {
    #[error("value has no type tag: {0}")]
    MissingType(String),
    #[error("malformed {type_id} value: {value}")]
    Malformed { type_id: String, value: String },
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
}

const NUMBER_TYPES: &[&str] = &[
    "Int", "Int8", "Int16", "Int32", "Int64", "Int128", "Int256", "UInt", "UInt8", "UInt16",
    "UInt32", "UInt64", "UInt128", "UInt256", "Word8", "Word16", "Word32", "Word64", "Word128",
    "Word256", "Fix64", "UFix64",
];

const COMPOSITE_TYPES: &[&str] = &[
    "Struct",
    "Resource",
    "Event",
    "Contract",
    "Enum",
    "InclusiveRange",
];

/// Type tag of an encoded value.
pub fn type_of(value: &Value) -> Result<&str, CadenceError> {
    value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| CadenceError::MissingType(value.to_string()))
}

/// Encodes an address argument for a script.
pub fn encode_address(address: &Address) -> Value {
    json!({ "type": "Address", "value": address.as_str() })
}

pub fn decode(value: &Value) -> Result<Value, CadenceError> {
    let type_id = type_of(value)?;
    let inner = value.get("value").unwrap_or(&Value::Null);

    let malformed = || CadenceError::Malformed {
        type_id: type_id.to_owned(),
        value: inner.to_string(),
    };

    match type_id {
        "Void" => Ok(Value::Null),
        "Optional" => match inner {
            Value::Null => Ok(Value::Null),
            some => decode(some),
        },
        "Bool" => inner.as_bool().map(Value::Bool).ok_or_else(malformed),
        "String" | "Character" | "Address" => inner
            .as_str()
            .map(|s| Value::String(s.to_owned()))
            .ok_or_else(malformed),
        t if NUMBER_TYPES.contains(&t) => inner
            .as_str()
            .map(|s| Value::String(s.to_owned()))
            .ok_or_else(malformed),
        "Array" => inner
            .as_array()
            .ok_or_else(malformed)?
            .iter()
            .map(decode)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        "Dictionary" => decode_dictionary(inner).ok_or_else(malformed)?,
        t if COMPOSITE_TYPES.contains(&t) => decode_composite(inner).ok_or_else(malformed)?,
        "Path" => decode_path(inner).map(Value::String).ok_or_else(malformed),
        "Type" => Ok(inner
            .get("staticType")
            .map(static_type_id)
            .map(Value::String)
            .unwrap_or(Value::Null)),
        "Capability" => decode_capability(inner).ok_or_else(malformed)?,
        "Function" => inner
            .get("functionType")
            .map(static_type_id)
            .map(Value::String)
            .ok_or_else(malformed),
        other => Err(CadenceError::UnsupportedType(other.to_owned())),
    }
}

fn decode_dictionary(inner: &Value) -> Option<Result<Value, CadenceError>> {
    let entries = inner.as_array()?;
    let mut object = Map::with_capacity(entries.len());

    for entry in entries {
        let key = match decode(entry.get("key")?) {
            Ok(Value::String(key)) => key,
            Ok(other) => other.to_string(),
            Err(err) => return Some(Err(err)),
        };
        let value = match decode(entry.get("value")?) {
            Ok(value) => value,
            Err(err) => return Some(Err(err)),
        };

        object.insert(key, value);
    }

    Some(Ok(Value::Object(object)))
}

fn decode_composite(inner: &Value) -> Option<Result<Value, CadenceError>> {
    let fields = inner.get("fields")?.as_array()?;
    let mut object = Map::with_capacity(fields.len());

    for field in fields {
        let name = field.get("name")?.as_str()?;
        match decode(field.get("value")?) {
            Ok(value) => object.insert(name.to_owned(), value),
            Err(err) => return Some(Err(err)),
        };
    }

    Some(Ok(Value::Object(object)))
}

fn decode_path(inner: &Value) -> Option<String> {
    let domain = inner.get("domain")?.as_str()?;
    let identifier = inner.get("identifier")?.as_str()?;

    Some(format!("/{domain}/{identifier}"))
}

fn decode_capability(inner: &Value) -> Option<Result<Value, CadenceError>> {
    let mut object = Map::new();
    object.insert("address".to_owned(), inner.get("address")?.clone());

    if let Some(id) = inner.get("id") {
        object.insert("id".to_owned(), id.clone());
    }

    if let Some(path) = inner.get("path") {
        let path = match path {
            Value::String(path) => Value::String(path.clone()),
            encoded => match decode(encoded) {
                Ok(path) => path,
                Err(err) => return Some(Err(err)),
            },
        };
        object.insert("path".to_owned(), path);
    }

    if let Some(borrow_type) = inner.get("borrowType") {
        object.insert(
            "borrowType".to_owned(),
            Value::String(static_type_id(borrow_type)),
        );
    }

    Some(Ok(Value::Object(object)))
}

/// Static types are either a bare type id or an object describing the type.
fn static_type_id(static_type: &Value) -> String {
    match static_type {
        Value::String(type_id) => type_id.clone(),
        Value::Object(object) => object
            .get("typeID")
            .or_else(|| object.get("kind"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        other => other.to_string(),
    }
}
