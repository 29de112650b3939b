//! Order Package Model (order line items)

use serde::{Deserialize, Serialize};

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderPackage {
    pub id: i64,
    pub order_id: i64,
    pub package_id: i64,
    pub package_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub no_of_pax: i64,
    pub boat_fare_enabled: bool,
    pub boat_fare_amount: Option<f64>,
    pub boat_fare_calc_type: Option<String>,
    pub gratuity_enabled: bool,
    pub gratuity_amount: Option<f64>,
    pub gratuity_calc_type: Option<String>,
    pub line_total: f64,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Line item as sent inside an order payload
///
/// On order update an `id` that matches a stored line item updates it;
/// anything else is inserted as a new line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPackageInput {
    pub id: Option<i64>,
    pub package_id: i64,
    #[serde(default)]
    pub package_name: String,
    pub quantity: Option<i64>,
    pub unit_price: f64,
    #[serde(default)]
    pub no_of_pax: i64,
    #[serde(default)]
    pub boat_fare_enabled: bool,
    pub boat_fare_amount: Option<f64>,
    pub boat_fare_calc_type: Option<String>,
    #[serde(default)]
    pub gratuity_enabled: bool,
    pub gratuity_amount: Option<f64>,
    pub gratuity_calc_type: Option<String>,
    /// `unit_price × quantity` when absent
    pub line_total: Option<f64>,
}

/// Create a standalone line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPackageCreate {
    pub order_id: i64,
    #[serde(flatten)]
    pub item: OrderPackageInput,
}

/// Partial line item update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPackageUpdate {
    pub package_id: Option<i64>,
    pub package_name: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
    pub no_of_pax: Option<i64>,
    pub boat_fare_enabled: Option<bool>,
    pub boat_fare_amount: Option<f64>,
    pub boat_fare_calc_type: Option<String>,
    pub gratuity_enabled: Option<bool>,
    pub gratuity_amount: Option<f64>,
    pub gratuity_calc_type: Option<String>,
    pub line_total: Option<f64>,
}
