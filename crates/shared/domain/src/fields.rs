//! Helpers for applying loosely-typed request bodies to typed records.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};

/// Fields managed by storage that request bodies may never set.
pub const RESERVED_FIELDS: &[&str] = &["_id", "createdAt", "updatedAt", "__v"];

/// JSON object with string keys, as sent by clients.
pub type Fields = Map<String, Value>;

/// Element of an embedded array addressed by a stable identifier.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Unwrap a request body that must be a JSON object.
pub fn require_object(value: Value, what: &str) -> DomainResult<Fields> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DomainError::validation(format!(
            "Invalid {} format. Expected an object.",
            what
        ))),
    }
}

/// Whether a field carries a usable value (present, not null, not blank, not zero, not false).
pub fn is_present(fields: &Fields, name: &str) -> bool {
    match fields.get(name) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |n| n != 0.0),
        Some(_) => true,
    }
}

/// Read a field as a string identifier, accepting numbers as well.
pub fn string_field(fields: &Fields, name: &str) -> Option<String> {
    match fields.get(name)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Drop storage-managed fields from a request body.
pub fn strip_reserved(fields: &mut Fields) {
    for name in RESERVED_FIELDS {
        fields.remove(*name);
    }
}

/// Decode a JSON value into a typed record, reporting failures as validation errors.
pub fn decode<T: DeserializeOwned>(value: Value, what: &str) -> DomainResult<T> {
    serde_json::from_value(value)
        .map_err(|e| DomainError::validation(format!("Invalid {} data: {}", what, e)))
}

/// Shallow-merge `patch` into a typed record and decode the result.
///
/// Keys listed in `protected` are left untouched.
pub fn merge_into<T>(record: &T, patch: Fields, protected: &[&str], what: &str) -> DomainResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut current = match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            return Err(DomainError::validation(format!(
                "Stored {} is not an object",
                what
            )))
        }
    };

    for (name, value) in patch {
        if protected.contains(&name.as_str()) {
            continue;
        }
        current.insert(name, value);
    }

    decode(Value::Object(current), what)
}

/// Position of the element with the given key.
pub fn position_of<T: Keyed>(items: &[T], key: &str) -> Option<usize> {
    items.iter().position(|item| item.key() == key)
}

/// Append an element, refusing a key that is already taken.
pub fn push_unique<T: Keyed>(items: &mut Vec<T>, item: T, entity: &str) -> DomainResult<()> {
    if position_of(items, item.key()).is_some() {
        return Err(DomainError::duplicate(format!(
            "{} with id '{}'",
            entity,
            item.key()
        )));
    }
    items.push(item);
    Ok(())
}

/// Replace the element with the given key in place.
pub fn replace_keyed<T: Keyed>(items: &mut [T], key: &str, item: T, entity: &str) -> DomainResult<()> {
    let index = position_of(items, key).ok_or_else(|| DomainError::not_found(entity))?;
    items[index] = item;
    Ok(())
}

/// Remove exactly one element with the given key, keeping the order of the rest.
pub fn remove_keyed<T: Keyed>(items: &mut Vec<T>, key: &str, entity: &str) -> DomainResult<T> {
    let index = position_of(items, key).ok_or_else(|| DomainError::not_found(entity))?;
    Ok(items.remove(index))
}

/// Reject a batch in which two elements share a key.
pub fn ensure_unique_keys<'a, T, I>(items: I, entity: &str) -> DomainResult<()>
where
    T: Keyed + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = std::collections::HashSet::new();
    for item in items {
        if !seen.insert(item.key()) {
            return Err(DomainError::duplicate(format!(
                "{} with id '{}'",
                entity,
                item.key()
            )));
        }
    }
    Ok(())
}

/// Serde adapter: optional identifier that may arrive as a string or a number.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;
    use serde::Deserialize;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!("expected a string, got {}", other))),
    }
}
