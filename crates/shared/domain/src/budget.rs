//! Budget sheet: a single document of sections, each holding cost lines.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::fields::{self, Fields, Keyed};

/// Line item inside a budget section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: String,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub sr_no: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<String>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub monthly_cost: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub quarterly_cost: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub half_yearly_cost: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub annual_cost: Option<f64>,
}

/// Named group of budget lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BudgetSection {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<BudgetItem>,
}

/// The singleton budget document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetDocument {
    #[serde(default)]
    pub sections: Vec<BudgetSection>,
}

impl Keyed for BudgetItem {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for BudgetSection {
    fn key(&self) -> &str {
        &self.id
    }
}

impl BudgetItem {
    /// Build an item from a request body, requiring an `id`.
    pub fn from_request(body: Value) -> DomainResult<Self> {
        let fields = fields::require_object(body, "item")?;
        if !fields::is_present(&fields, "id") {
            return Err(DomainError::validation("Item id is required"));
        }
        Self::decode(fields)
    }

    /// Build a replacement item whose id is pinned to `id`.
    pub fn replacement(id: &str, body: Value) -> DomainResult<Self> {
        let mut fields = fields::require_object(body, "item")?;
        fields.insert("id".to_string(), Value::String(id.to_string()));
        Self::decode(fields)
    }

    fn decode(mut fields: Fields) -> DomainResult<Self> {
        if let Some(id) = fields::string_field(&fields, "id") {
            fields.insert("id".to_string(), Value::String(id));
        }
        fields::decode(Value::Object(fields), "item")
    }
}

impl BudgetSection {
    /// Create an empty section.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Build a replacement section whose id is pinned to `id`.
    pub fn replacement(id: &str, body: Value) -> DomainResult<Self> {
        let mut fields = fields::require_object(body, "section")?;
        fields.insert("id".to_string(), Value::String(id.to_string()));
        let section: Self = fields::decode(Value::Object(fields), "section")?;
        fields::ensure_unique_keys(&section.items, "Item")?;
        Ok(section)
    }

    pub fn add_item(&mut self, item: BudgetItem) -> DomainResult<()> {
        fields::push_unique(&mut self.items, item, "Item")
    }

    pub fn replace_item(&mut self, item_id: &str, item: BudgetItem) -> DomainResult<()> {
        fields::replace_keyed(&mut self.items, item_id, item, "Item")
    }

    pub fn remove_item(&mut self, item_id: &str) -> DomainResult<BudgetItem> {
        fields::remove_keyed(&mut self.items, item_id, "Item")
    }
}

impl BudgetDocument {
    /// Replace every section at once.
    pub fn replace_sections(&mut self, sections: Vec<BudgetSection>) -> DomainResult<()> {
        fields::ensure_unique_keys(&sections, "Section")?;
        for section in &sections {
            fields::ensure_unique_keys(&section.items, "Item")?;
        }
        self.sections = sections;
        Ok(())
    }

    pub fn add_section(&mut self, section: BudgetSection) -> DomainResult<()> {
        fields::push_unique(&mut self.sections, section, "Section")
    }

    pub fn replace_section(&mut self, section_id: &str, section: BudgetSection) -> DomainResult<()> {
        fields::replace_keyed(&mut self.sections, section_id, section, "Section")
    }

    pub fn remove_section(&mut self, section_id: &str) -> DomainResult<BudgetSection> {
        fields::remove_keyed(&mut self.sections, section_id, "Section")
    }

    pub fn section_mut(&mut self, section_id: &str) -> DomainResult<&mut BudgetSection> {
        self.sections
            .iter_mut()
            .find(|section| section.id == section_id)
            .ok_or_else(|| DomainError::not_found("Section"))
    }
}
