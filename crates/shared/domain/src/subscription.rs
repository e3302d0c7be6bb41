//! Subscription revenue lines and subscription plans.
//!
//! Both carry a client-chosen `id` that is unique within their collection,
//! and both derive the projected annual revenue from the monthly figure when
//! the client leaves the annual figure out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::constants::{
    DEFAULT_PLAN_SOURCE, DEFAULT_REVENUE_SOURCE, DEFAULT_SOLP_TYPE, MONTHS_PER_YEAR,
    RECORD_ID_FIELD,
};
use crate::dates::format_date;
use crate::error::{DomainError, DomainResult};
use crate::fields::{self, Fields, RESERVED_FIELDS};
use crate::numbers::{number_value, read_number, NumberInput};

const MONTHLY_FIELD: &str = "projectedMonthlyRevenue";
const ANNUAL_FIELD: &str = "projectedAnnualRevenue";

/// Fields of a subscription plan that an update may touch.
const PLAN_REVENUE_FIELDS: &[&str] = &[
    "revenueSource",
    "subscriptionsAvailed",
    "projectedMonthlyRevenue",
    "projectedAnnualRevenue",
    "subscribed",
    "profit",
];

/// Pick the annual revenue figure to store.
///
/// A non-zero annual figure wins. Otherwise a known monthly figure is
/// projected over twelve months. Otherwise the annual figure is kept as given.
pub fn resolve_annual_revenue(monthly: Option<f64>, annual: Option<f64>) -> Option<f64> {
    match (monthly, annual) {
        (_, Some(annual)) if annual != 0.0 => Some(annual),
        (Some(monthly), _) => Some(monthly * MONTHS_PER_YEAR),
        (None, annual) => annual,
    }
}

/// Fill in the annual revenue of a request body from its monthly figure.
///
/// Unparseable values are left alone so decoding reports them.
fn derive_annual_revenue(fields: &mut Fields) {
    let read = |name: &str| match fields.get(name).map(read_number) {
        None | Some(NumberInput::Empty) => Ok(None),
        Some(NumberInput::Number(n)) => Ok(Some(n)),
        Some(NumberInput::Invalid) => Err(()),
    };

    let (Ok(monthly), Ok(annual)) = (read(MONTHLY_FIELD), read(ANNUAL_FIELD)) else {
        return;
    };

    if let Some(resolved) = resolve_annual_revenue(monthly, annual) {
        if annual != Some(resolved) {
            fields.insert(ANNUAL_FIELD.to_string(), number_value(resolved));
        }
    }
}

fn require_id(fields: &mut Fields, entity: &str) -> DomainResult<()> {
    let id = fields::string_field(fields, RECORD_ID_FIELD)
        .ok_or_else(|| DomainError::validation(format!("{} id is required", entity)))?;
    fields.insert(RECORD_ID_FIELD.to_string(), Value::String(id));
    Ok(())
}

fn default_field(fields: &mut Fields, name: &str, value: Value) {
    if !fields::is_present(fields, name) {
        fields.insert(name.to_string(), value);
    }
}

/// A projected subscription revenue line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRevenue {
    pub id: String,
    #[serde(default = "default_revenue_source")]
    pub revenue_source: String,
    #[serde(default, deserialize_with = "crate::numbers::lenient_or_zero")]
    pub subscriptions_availed: f64,
    #[serde(default, deserialize_with = "crate::numbers::lenient_or_zero")]
    pub projected_monthly_revenue: f64,
    #[serde(default, deserialize_with = "crate::numbers::lenient_or_zero")]
    pub projected_annual_revenue: f64,
    #[serde(default, deserialize_with = "crate::numbers::lenient_or_zero")]
    pub subscribed: f64,
    #[serde(default, deserialize_with = "crate::numbers::lenient_or_zero")]
    pub profit: f64,
}

fn default_revenue_source() -> String {
    DEFAULT_REVENUE_SOURCE.to_string()
}

impl SubscriptionRevenue {
    /// Build a revenue line from a request body.
    pub fn from_request(body: Value) -> DomainResult<Self> {
        let mut fields = fields::require_object(body, "revenue item")?;
        fields::strip_reserved(&mut fields);
        require_id(&mut fields, "Revenue")?;
        default_field(
            &mut fields,
            "revenueSource",
            Value::String(default_revenue_source()),
        );
        derive_annual_revenue(&mut fields);

        let revenue: Self = fields::decode(Value::Object(fields), "revenue item")?;
        revenue.validate()?;
        Ok(revenue)
    }

    /// Merge an update body. The `id` is the lookup key and stays fixed.
    pub fn merged(&self, body: Value) -> DomainResult<Self> {
        let mut patch = fields::require_object(body, "revenue item")?;
        if patch.contains_key(MONTHLY_FIELD) {
            // A blank monthly figure is stored as zero, so annual follows it.
            let blank = patch
                .get(MONTHLY_FIELD)
                .is_some_and(|v| read_number(v) == NumberInput::Empty);
            if blank {
                patch.insert(MONTHLY_FIELD.to_string(), number_value(0.0));
            }
            derive_annual_revenue(&mut patch);
        }

        let mut protected = RESERVED_FIELDS.to_vec();
        protected.push(RECORD_ID_FIELD);
        let revenue: Self = fields::merge_into(self, patch, &protected, "revenue item")?;
        revenue.validate()?;
        Ok(revenue)
    }

    /// Check an update body on its own, before any stored line is loaded.
    pub fn validate_patch(body: &Value) -> DomainResult<()> {
        let blank = Self {
            id: RECORD_ID_FIELD.to_string(),
            revenue_source: default_revenue_source(),
            ..Self::default()
        };
        blank.merged(body.clone()).map(|_| ())
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.id.trim().is_empty() {
            return Err(DomainError::validation("Revenue id is required"));
        }
        if self.revenue_source.trim().is_empty() {
            return Err(DomainError::validation("revenueSource is required"));
        }

        let counters = [
            ("subscriptionsAvailed", self.subscriptions_availed),
            ("projectedMonthlyRevenue", self.projected_monthly_revenue),
            ("projectedAnnualRevenue", self.projected_annual_revenue),
            ("subscribed", self.subscribed),
        ];
        for (name, value) in counters {
            if value < 0.0 {
                return Err(DomainError::validation(format!(
                    "{} must be greater than or equal to 0",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// A subscription plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionModel {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solp_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_source: Option<String>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub subscriptions_availed: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub projected_monthly_revenue: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub projected_annual_revenue: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub subscribed: Option<f64>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(default, with = "crate::dates::flexible", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub get_subscription_date: Option<DateTime<Utc>>,
}

impl SubscriptionModel {
    /// Build a plan from a request body. A missing annual figure becomes 0.
    pub fn from_request(body: Value) -> DomainResult<Self> {
        let mut fields = fields::require_object(body, "subscription model")?;
        fields::strip_reserved(&mut fields);
        require_id(&mut fields, "Subscription model")?;
        derive_annual_revenue(&mut fields);

        let mut model: Self = fields::decode(Value::Object(fields), "subscription model")?;
        model.projected_annual_revenue.get_or_insert(0.0);
        Ok(model)
    }

    /// Build a plan for a bulk load, filling every missing field with its default.
    pub fn with_bulk_defaults(body: Value, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut fields = fields::require_object(body, "subscription model")?;
        fields::strip_reserved(&mut fields);

        default_field(
            &mut fields,
            RECORD_ID_FIELD,
            Value::String(Uuid::new_v4().to_string()),
        );
        require_id(&mut fields, "Subscription model")?;
        default_field(&mut fields, "solpType", Value::String(DEFAULT_SOLP_TYPE.to_string()));
        default_field(
            &mut fields,
            "revenueSource",
            Value::String(DEFAULT_PLAN_SOURCE.to_string()),
        );
        derive_annual_revenue(&mut fields);
        for name in PLAN_REVENUE_FIELDS.iter().filter(|name| **name != "revenueSource") {
            default_field(&mut fields, name, number_value(0.0));
        }
        default_field(
            &mut fields,
            "getSubscriptionDate",
            Value::String(format_date(&now)),
        );

        fields::decode(Value::Object(fields), "subscription model")
    }

    /// Apply an update body. Only the revenue fields are taken from it.
    pub fn apply_patch(&self, body: Value) -> DomainResult<Self> {
        let body = fields::require_object(body, "subscription model")?;
        let mut patch: Fields = body
            .into_iter()
            .filter(|(name, _)| PLAN_REVENUE_FIELDS.contains(&name.as_str()))
            .collect();
        if fields::is_present(&patch, MONTHLY_FIELD) {
            derive_annual_revenue(&mut patch);
        }

        fields::merge_into(self, patch, &[], "subscription model")
    }

    /// Check an update body on its own, before any stored plan is loaded.
    pub fn validate_patch(body: &Value) -> DomainResult<()> {
        Self::default().apply_patch(body.clone()).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_resolve_annual_revenue() {
        assert_eq!(resolve_annual_revenue(Some(100.0), None), Some(1200.0));
        assert_eq!(resolve_annual_revenue(Some(100.0), Some(0.0)), Some(1200.0));
        assert_eq!(resolve_annual_revenue(Some(100.0), Some(999.0)), Some(999.0));
        assert_eq!(resolve_annual_revenue(None, Some(0.0)), Some(0.0));
        assert_eq!(resolve_annual_revenue(None, None), None);
    }

    #[test]
    fn test_revenue_defaults_and_derivation() {
        let revenue =
            SubscriptionRevenue::from_request(json!({"id": "r1", "projectedMonthlyRevenue": "250"}))
                .unwrap();
        assert_eq!(revenue.revenue_source, DEFAULT_REVENUE_SOURCE);
        assert_eq!(revenue.projected_monthly_revenue, 250.0);
        assert_eq!(revenue.projected_annual_revenue, 3000.0);
        assert_eq!(revenue.subscribed, 0.0);
    }

    #[test]
    fn test_revenue_requires_id() {
        let err = SubscriptionRevenue::from_request(json!({"revenueSource": "Ads"})).unwrap_err();
        assert_eq!(err, DomainError::validation("Revenue id is required"));
    }

    #[test]
    fn test_revenue_rejects_negative_counters() {
        let err = SubscriptionRevenue::from_request(json!({"id": "r1", "subscribed": -1}))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("subscribed must be greater than or equal to 0")
        );
        assert!(SubscriptionRevenue::from_request(json!({"id": "r1", "profit": -5})).is_ok());
    }

    #[test]
    fn test_revenue_merge_derives_annual_from_monthly() {
        let revenue = SubscriptionRevenue::from_request(json!({
            "id": "r1",
            "projectedMonthlyRevenue": 100,
            "projectedAnnualRevenue": 5000
        }))
        .unwrap();

        let merged = revenue
            .merged(json!({"projectedMonthlyRevenue": 200, "id": "other"}))
            .unwrap();
        assert_eq!(merged.id, "r1");
        assert_eq!(merged.projected_annual_revenue, 2400.0);

        let untouched = revenue.merged(json!({"profit": 10})).unwrap();
        assert_eq!(untouched.projected_annual_revenue, 5000.0);
    }

    #[test]
    fn test_revenue_merge_blank_monthly_clears_annual() {
        let revenue =
            SubscriptionRevenue::from_request(json!({"id": "r1", "projectedMonthlyRevenue": 100}))
                .unwrap();
        assert_eq!(revenue.projected_annual_revenue, 1200.0);

        for blank in [json!(""), json!(null)] {
            let merged = revenue
                .merged(json!({"projectedMonthlyRevenue": blank}))
                .unwrap();
            assert_eq!(merged.projected_monthly_revenue, 0.0);
            assert_eq!(merged.projected_annual_revenue, 0.0);
        }

        let explicit = revenue
            .merged(json!({"projectedMonthlyRevenue": "", "projectedAnnualRevenue": 900}))
            .unwrap();
        assert_eq!(explicit.projected_annual_revenue, 900.0);
    }

    #[test]
    fn test_patch_checks_without_stored_record() {
        assert!(SubscriptionRevenue::validate_patch(&json!({"profit": -2})).is_ok());
        assert_eq!(
            SubscriptionRevenue::validate_patch(&json!({"subscribed": -5})).unwrap_err(),
            DomainError::validation("subscribed must be greater than or equal to 0")
        );
        assert_eq!(
            SubscriptionRevenue::validate_patch(&json!([1, 2])).unwrap_err(),
            DomainError::validation("Invalid revenue item format. Expected an object.")
        );
        assert_eq!(
            SubscriptionRevenue::validate_patch(&json!({"revenueSource": ""})).unwrap_err(),
            DomainError::validation("revenueSource is required")
        );

        assert!(SubscriptionModel::validate_patch(&json!({"profit": "12"})).is_ok());
        assert!(SubscriptionModel::validate_patch(&json!(5)).is_err());
        assert!(SubscriptionModel::validate_patch(&json!({"subscribed": "many"})).is_err());
    }

    #[test]
    fn test_model_bulk_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let model =
            SubscriptionModel::with_bulk_defaults(json!({"projectedMonthlyRevenue": 10}), now)
                .unwrap();

        assert!(Uuid::parse_str(&model.id).is_ok());
        assert_eq!(model.solp_type.as_deref(), Some(DEFAULT_SOLP_TYPE));
        assert_eq!(model.revenue_source.as_deref(), Some(DEFAULT_PLAN_SOURCE));
        assert_eq!(model.projected_annual_revenue, Some(120.0));
        assert_eq!(model.subscribed, Some(0.0));
        assert_eq!(model.get_subscription_date, Some(now));
    }

    #[test]
    fn test_model_patch_only_touches_revenue_fields() {
        let model = SubscriptionModel::from_request(json!({
            "id": "m1",
            "solpType": "Retail",
            "projectedMonthlyRevenue": 10
        }))
        .unwrap();
        assert_eq!(model.projected_annual_revenue, Some(120.0));

        let patched = model
            .apply_patch(json!({"solpType": "Online", "projectedMonthlyRevenue": 20, "id": "x"}))
            .unwrap();
        assert_eq!(patched.id, "m1");
        assert_eq!(patched.solp_type.as_deref(), Some("Retail"));
        assert_eq!(patched.projected_monthly_revenue, Some(20.0));
        assert_eq!(patched.projected_annual_revenue, Some(240.0));
    }
}
