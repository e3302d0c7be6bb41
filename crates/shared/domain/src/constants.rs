//! Domain-level constants.
//!
//! These constants define business rules and default values.

// =============================================================================
// Revenue
// =============================================================================

/// Months used to project annual revenue from a monthly figure
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Default revenue source for subscription revenue lines
pub const DEFAULT_REVENUE_SOURCE: &str = "New Revenue Source";

/// Default revenue source for bulk-loaded subscription plans
pub const DEFAULT_PLAN_SOURCE: &str = "New Plan";

/// Default sales channel for bulk-loaded subscription plans
pub const DEFAULT_SOLP_TYPE: &str = "Online";

// =============================================================================
// Project Tracking
// =============================================================================

/// Fields every new tracking row must carry
pub const TRACKING_REQUIRED_FIELDS: &[&str] = &["projectWork", "devName"];

/// Date fields on tracking rows
pub const TRACKING_DATE_FIELDS: &[&str] = &["startDate", "endedDate"];

/// Numeric fields on tracking rows
pub const TRACKING_NUMERIC_FIELDS: &[&str] = &[
    "salary",
    "daysInvolved",
    "hoursDays",
    "perDayAmount",
    "investDayAmount",
    "perHrsAmount",
    "projectCost",
    "collectAmount",
    "pendingAmount",
    "profitForProject",
];

/// Prefixes clients use for rows that were never saved
pub const TEMPORARY_ID_PREFIXES: &[&str] = &["temp_", "new_"];

/// Storage key field of an embedded tracking row
pub const ROW_KEY_FIELD: &str = "_id";

/// Client identifier field shared by most records
pub const RECORD_ID_FIELD: &str = "id";

/// Check whether an identifier belongs to a row that was never saved
pub fn is_temporary_id(id: &str) -> bool {
    TEMPORARY_ID_PREFIXES.iter().any(|prefix| id.starts_with(prefix))
}
