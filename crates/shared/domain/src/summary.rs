//! Financial summary: a single document holding a free-form list of line items.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::RECORD_ID_FIELD;
use crate::error::{DomainError, DomainResult};
use crate::fields::{self, Fields, Keyed, RESERVED_FIELDS};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryItem {
    #[serde(default, deserialize_with = "crate::fields::lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub sl_no: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// The singleton summary document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryDocument {
    #[serde(default)]
    pub items: Vec<SummaryItem>,
}

impl Keyed for SummaryItem {
    fn key(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

impl SummaryItem {
    /// Build an item from a request body, requiring an `id`.
    pub fn from_request(body: Value) -> DomainResult<Self> {
        let mut fields = fields::require_object(body, "summary item")?;
        fields::strip_reserved(&mut fields);
        if fields::string_field(&fields, RECORD_ID_FIELD).is_none() {
            return Err(DomainError::validation("Item id is required"));
        }
        fields::decode(Value::Object(fields), "summary item")
    }

    /// Merge an update body, keeping the id fixed.
    pub fn merged(&self, body: Value) -> DomainResult<Self> {
        let patch = fields::require_object(body, "summary item")?;
        let mut protected = RESERVED_FIELDS.to_vec();
        protected.push(RECORD_ID_FIELD);
        fields::merge_into(self, patch, &protected, "summary item")
    }

    /// Check an update body on its own, before the stored item is loaded.
    pub fn validate_patch(body: &Value) -> DomainResult<()> {
        Self::default().merged(body.clone()).map(|_| ())
    }
}

impl SummaryDocument {
    /// Decode a full replacement list.
    pub fn items_from_request(body: Value) -> DomainResult<Vec<SummaryItem>> {
        let Value::Array(values) = body else {
            return Err(DomainError::validation(
                "Invalid data format. Expected an array of items.",
            ));
        };
        let items = values
            .into_iter()
            .map(|value| {
                let mut fields = fields::require_object(value, "summary item")?;
                fields::strip_reserved(&mut fields);
                fields::decode(Value::Object(fields), "summary item")
            })
            .collect::<DomainResult<Vec<SummaryItem>>>()?;

        // Items without an id are not addressable, so only ids must be unique.
        fields::ensure_unique_keys(items.iter().filter(|item| item.id.is_some()), "Item")?;
        Ok(items)
    }

    pub fn add_item(&mut self, item: SummaryItem) -> DomainResult<()> {
        fields::push_unique(&mut self.items, item, "Item")
    }

    /// Merge an update body into the item with the given id.
    pub fn update_item(&mut self, item_id: &str, body: Value) -> DomainResult<SummaryItem> {
        let index = fields::position_of(&self.items, item_id)
            .ok_or_else(|| DomainError::not_found("Item"))?;
        let updated = self.items[index].merged(body)?;
        self.items[index] = updated.clone();
        Ok(updated)
    }

    pub fn remove_item(&mut self, item_id: &str) -> DomainResult<SummaryItem> {
        fields::remove_keyed(&mut self.items, item_id, "Item")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_replacement_list_must_be_array() {
        let err = SummaryDocument::items_from_request(json!({"items": []})).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("Invalid data format. Expected an array of items.")
        );
    }

    #[test]
    fn test_replacement_list_keeps_free_form_fields() {
        let items = SummaryDocument::items_from_request(json!([
            {"id": 1, "item": "Revenue", "value": "1000", "quarter": "Q1"},
            {"item": "Costs"}
        ]))
        .unwrap();

        assert_eq!(items[0].id.as_deref(), Some("1"));
        assert_eq!(items[0].value, Some(1000.0));
        assert_eq!(items[0].extra.get("quarter"), Some(&json!("Q1")));
        assert_eq!(items[1].id, None);
    }

    #[test]
    fn test_replacement_list_rejects_shared_ids() {
        let err = SummaryDocument::items_from_request(json!([
            {"id": "a", "value": 1},
            {"id": "a", "value": 2}
        ]))
        .unwrap_err();
        assert_eq!(err, DomainError::duplicate("Item with id 'a'"));

        let items =
            SummaryDocument::items_from_request(json!([{"item": "x"}, {"item": "y"}])).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_item_patch_must_be_object() {
        assert!(SummaryItem::validate_patch(&json!({"value": "7", "note": "x"})).is_ok());
        assert_eq!(
            SummaryItem::validate_patch(&json!("str")).unwrap_err(),
            DomainError::validation("Invalid summary item format. Expected an object.")
        );
    }

    #[test]
    fn test_update_and_remove_item() {
        let mut doc = SummaryDocument::default();
        doc.add_item(SummaryItem::from_request(json!({"id": "a", "value": 1})).unwrap())
            .unwrap();
        doc.add_item(SummaryItem::from_request(json!({"id": "b", "value": 2})).unwrap())
            .unwrap();

        let updated = doc.update_item("a", json!({"value": 5, "id": "z"})).unwrap();
        assert_eq!(updated.id.as_deref(), Some("a"));
        assert_eq!(updated.value, Some(5.0));

        doc.remove_item("a").unwrap();
        assert_eq!(doc.items.len(), 1);
        assert_eq!(doc.remove_item("a").unwrap_err(), DomainError::not_found("Item"));
    }

    #[test]
    fn test_item_requires_id() {
        let err = SummaryItem::from_request(json!({"item": "Costs"})).unwrap_err();
        assert_eq!(err, DomainError::validation("Item id is required"));
    }
}
