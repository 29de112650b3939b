//! Form Settings Model (one row per form)

use serde::{Deserialize, Serialize};

use super::DepositMode;

/// Default fixed deposit when none is configured
pub const DEFAULT_DEPOSIT_AMOUNT: f64 = 100.0;
/// Default SST percentage when none is configured
pub const DEFAULT_SST_PERCENTAGE: f64 = 8.0;

/// Form settings entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FormSettings {
    pub id: i64,
    pub form_id: i64,
    /// JSON-encoded list of sales executive names
    pub sales_executives: Option<String>,
    pub tax_id_number: Option<String>,
    pub currency: Option<String>,
    /// Wall-clock cutoff for next-day bookings, e.g. `18:00`
    pub next_day_cutoff_time: Option<String>,
    pub max_guest_per_day: Option<i64>,
    pub deposit_mode: DepositMode,
    pub deposit_amount: Option<f64>,
    pub sst_enabled: bool,
    pub sst_percentage: Option<f64>,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create-or-replace payload, keyed by `form_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSettingsUpsert {
    pub form_id: i64,
    pub sales_executives: Option<String>,
    pub tax_id_number: Option<String>,
    pub currency: Option<String>,
    pub next_day_cutoff_time: Option<String>,
    pub max_guest_per_day: Option<i64>,
    pub deposit_mode: Option<DepositMode>,
    pub deposit_amount: Option<f64>,
    pub sst_enabled: Option<bool>,
    pub sst_percentage: Option<f64>,
}
