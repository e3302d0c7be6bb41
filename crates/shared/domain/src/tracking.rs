//! Project tracking sheet: a single document of rows keyed by a server-assigned `_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::constants::{
    is_temporary_id, RECORD_ID_FIELD, ROW_KEY_FIELD, TRACKING_DATE_FIELDS,
    TRACKING_NUMERIC_FIELDS, TRACKING_REQUIRED_FIELDS,
};
use crate::dates::{format_date, read_date, DateInput};
use crate::error::{DomainError, DomainResult};
use crate::fields::{self, Fields, RESERVED_FIELDS};
use crate::numbers::{coerce_number, number_value, read_number, NumberInput};

/// One row of the tracking sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingItem {
    #[serde(rename = "_id")]
    pub key: Uuid,
    #[serde(default, deserialize_with = "crate::fields::lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub sl_no: Option<f64>,
    #[serde(default)]
    pub project_work: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_ux: Option<String>,
    #[serde(default)]
    pub dev_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_status: Option<String>,
    #[serde(default, with = "crate::dates::flexible")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::dates::flexible")]
    pub ended_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<String>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub days_involved: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub hours_days: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub per_day_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub invest_day_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub per_hrs_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub project_cost: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub collect_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub pending_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub profit_for_project: Option<f64>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// The singleton tracking document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingDocument {
    #[serde(default)]
    pub items: Vec<TrackingItem>,
}

/// How strictly request values are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Unparseable numbers are rejected.
    Strict,
    /// Unparseable numbers become zero.
    Lenient,
}

/// Operation a row key is being resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Update,
    Delete,
}

/// Resolve a path id into a row key.
///
/// Rows the client created locally carry `temp_`/`new_` ids and were never saved.
pub fn parse_row_key(id: &str, action: RowAction) -> DomainResult<Uuid> {
    if is_temporary_id(id) {
        let message = match action {
            RowAction::Update => "Cannot update temporary item. Save the item first.",
            RowAction::Delete => "Cannot delete temporary item. Item is not saved to database.",
        };
        return Err(DomainError::validation(message));
    }
    Uuid::parse_str(id).map_err(|_| DomainError::validation("Invalid item ID format"))
}

/// Coerce the date and numeric fields of a request body in place.
pub fn normalize_fields(fields: &mut Fields, coercion: Coercion) -> DomainResult<()> {
    for name in TRACKING_DATE_FIELDS {
        let Some(value) = fields.get(*name) else {
            continue;
        };
        let normalized = match read_date(value) {
            DateInput::Empty => Value::Null,
            DateInput::Date(date) => Value::String(format_date(&date)),
            DateInput::Invalid => {
                return Err(DomainError::validation(format!(
                    "Invalid {} format. Use DD/MM/YYYY",
                    name
                )))
            }
        };
        fields.insert(name.to_string(), normalized);
    }

    for name in TRACKING_NUMERIC_FIELDS {
        let Some(value) = fields.get(*name) else {
            continue;
        };
        let normalized = match coercion {
            Coercion::Lenient => number_value(coerce_number(value)),
            Coercion::Strict => match read_number(value) {
                NumberInput::Empty => Value::Null,
                NumberInput::Number(n) => number_value(n),
                NumberInput::Invalid => {
                    return Err(DomainError::validation(format!(
                        "Invalid number for '{}'",
                        name
                    )))
                }
            },
        };
        fields.insert(name.to_string(), normalized);
    }

    Ok(())
}

impl TrackingItem {
    /// Build a new row from a request body and assign it a fresh key.
    pub fn from_request(body: Value) -> DomainResult<Self> {
        let mut fields = fields::require_object(body, "item")?;

        for name in TRACKING_REQUIRED_FIELDS {
            if !fields::is_present(&fields, name) {
                return Err(DomainError::validation(format!(
                    "Missing required field '{}'",
                    name
                )));
            }
        }

        fields::strip_reserved(&mut fields);
        normalize_fields(&mut fields, Coercion::Strict)?;
        fields.insert(
            ROW_KEY_FIELD.to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );

        fields::decode(Value::Object(fields), "item")
    }

    /// Apply an update body. Returns `None` when nothing would change.
    pub fn patched(&self, body: Value) -> DomainResult<Option<Self>> {
        let mut patch = fields::require_object(body, "item")?;
        for name in TRACKING_REQUIRED_FIELDS {
            let cleared = match patch.get(*name) {
                Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                _ => false,
            };
            if cleared {
                return Err(DomainError::validation(format!("{} cannot be cleared", name)));
            }
        }
        normalize_fields(&mut patch, Coercion::Lenient)?;

        let mut protected = RESERVED_FIELDS.to_vec();
        protected.push(RECORD_ID_FIELD);
        let updated: Self = fields::merge_into(self, patch, &protected, "item")?;

        Ok((updated != *self).then_some(updated))
    }
}

impl TrackingDocument {
    pub fn add_item(&mut self, item: TrackingItem) {
        self.items.push(item);
    }

    fn position(&self, key: Uuid) -> DomainResult<usize> {
        self.items
            .iter()
            .position(|item| item.key == key)
            .ok_or_else(|| DomainError::not_found("Item"))
    }

    /// Apply an update body to one row. Returns `None` when nothing changed.
    pub fn update_item(&mut self, key: Uuid, body: Value) -> DomainResult<Option<TrackingItem>> {
        let index = self.position(key)?;
        let Some(updated) = self.items[index].patched(body)? else {
            return Ok(None);
        };
        self.items[index] = updated.clone();
        Ok(Some(updated))
    }

    pub fn remove_item(&mut self, key: Uuid) -> DomainResult<TrackingItem> {
        let index = self.position(key)?;
        Ok(self.items.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row() -> TrackingItem {
        TrackingItem::from_request(json!({
            "_id": "temp_123",
            "projectWork": "Portal",
            "devName": "Sam",
            "startDate": "10/01/2024",
            "salary": "30000",
            "client": "Acme"
        }))
        .unwrap()
    }

    #[test]
    fn test_from_request_assigns_fresh_key() {
        let item = row();
        assert_eq!(item.project_work, "Portal");
        assert_eq!(item.salary, Some(30000.0));
        assert_eq!(item.extra.get("client"), Some(&json!("Acme")));
        assert!(!item.extra.contains_key("_id"));

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["_id"], json!(item.key.to_string()));
        assert_eq!(value["startDate"], json!("2024-01-10T00:00:00.000Z"));
    }

    #[test]
    fn test_from_request_requires_fields() {
        let err = TrackingItem::from_request(json!({"projectWork": "Portal"})).unwrap_err();
        assert_eq!(err, DomainError::validation("Missing required field 'devName'"));

        let err = TrackingItem::from_request(json!({"projectWork": "", "devName": "Sam"})).unwrap_err();
        assert_eq!(err, DomainError::validation("Missing required field 'projectWork'"));
    }

    #[test]
    fn test_from_request_rejects_bad_values() {
        let bad_date = json!({"projectWork": "P", "devName": "D", "endedDate": "soon"});
        assert_eq!(
            TrackingItem::from_request(bad_date).unwrap_err(),
            DomainError::validation("Invalid endedDate format. Use DD/MM/YYYY")
        );

        let bad_number = json!({"projectWork": "P", "devName": "D", "salary": "lots"});
        assert!(TrackingItem::from_request(bad_number).is_err());
    }

    #[test]
    fn test_patch_coerces_and_clears() {
        let item = row();
        let updated = item
            .patched(json!({"salary": "abc", "startDate": "", "_id": "x", "id": "y"}))
            .unwrap()
            .unwrap();

        assert_eq!(updated.key, item.key);
        assert_eq!(updated.id, None);
        assert_eq!(updated.salary, Some(0.0));
        assert_eq!(updated.start_date, None);
    }

    #[test]
    fn test_patch_without_changes() {
        let item = row();
        assert_eq!(item.patched(json!({"devName": "Sam"})).unwrap(), None);
    }

    #[test]
    fn test_patch_cannot_clear_required_fields() {
        let item = row();
        assert_eq!(
            item.patched(json!({"projectWork": null})).unwrap_err(),
            DomainError::validation("projectWork cannot be cleared")
        );
        assert_eq!(
            item.patched(json!({"devName": " "})).unwrap_err(),
            DomainError::validation("devName cannot be cleared")
        );
    }

    #[test]
    fn test_patch_rejects_invalid_date() {
        let err = row().patched(json!({"startDate": "31/02/2024"})).unwrap_err();
        assert_eq!(err, DomainError::validation("Invalid startDate format. Use DD/MM/YYYY"));
    }

    #[test]
    fn test_parse_row_key() {
        assert_eq!(
            parse_row_key("temp_1", RowAction::Update).unwrap_err(),
            DomainError::validation("Cannot update temporary item. Save the item first.")
        );
        assert_eq!(
            parse_row_key("new_1", RowAction::Delete).unwrap_err(),
            DomainError::validation("Cannot delete temporary item. Item is not saved to database.")
        );
        assert_eq!(
            parse_row_key("abc", RowAction::Delete).unwrap_err(),
            DomainError::validation("Invalid item ID format")
        );
        let key = Uuid::new_v4();
        assert_eq!(parse_row_key(&key.to_string(), RowAction::Update).unwrap(), key);
    }

    #[test]
    fn test_remove_item_removes_exactly_one() {
        let mut doc = TrackingDocument::default();
        let (a, b, c) = (row(), row(), row());
        let keys = [a.key, b.key, c.key];
        doc.add_item(a);
        doc.add_item(b);
        doc.add_item(c);

        doc.remove_item(keys[1]).unwrap();
        let remaining: Vec<Uuid> = doc.items.iter().map(|i| i.key).collect();
        assert_eq!(remaining, vec![keys[0], keys[2]]);
        assert_eq!(doc.remove_item(keys[1]).unwrap_err(), DomainError::not_found("Item"));
    }
}
