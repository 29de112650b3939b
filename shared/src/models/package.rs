//! Package Model (priced offerings on a form)

use serde::{Deserialize, Serialize};

/// Package entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Package {
    pub id: i64,
    pub form_id: i64,
    pub merchant_id: String,
    pub package_name: String,
    pub description: Option<String>,
    pub price: f64,
    pub no_of_pax: i64,
    pub availability: bool,
    pub boat_fare_enabled: bool,
    pub boat_fare_amount: Option<f64>,
    /// `per_pax` or `per_unit`
    pub boat_fare_calc_type: Option<String>,
    pub gratuity_enabled: bool,
    pub gratuity_amount: Option<f64>,
    /// `per_pax` or `per_unit`
    pub gratuity_calc_type: Option<String>,
    pub deposit_amount: Option<f64>,
    /// `per_pax` or `per_package`
    pub deposit_mode: Option<String>,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create package payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageCreate {
    pub form_id: i64,
    #[serde(default)]
    pub merchant_id: String,
    pub package_name: String,
    pub description: Option<String>,
    pub price: f64,
    pub no_of_pax: Option<i64>,
    pub availability: Option<bool>,
    #[serde(default)]
    pub boat_fare_enabled: bool,
    pub boat_fare_amount: Option<f64>,
    pub boat_fare_calc_type: Option<String>,
    #[serde(default)]
    pub gratuity_enabled: bool,
    pub gratuity_amount: Option<f64>,
    pub gratuity_calc_type: Option<String>,
    pub deposit_amount: Option<f64>,
    pub deposit_mode: Option<String>,
}

/// Update package payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageUpdate {
    pub merchant_id: Option<String>,
    pub package_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub no_of_pax: Option<i64>,
    pub availability: Option<bool>,
    pub boat_fare_enabled: Option<bool>,
    pub boat_fare_amount: Option<f64>,
    pub boat_fare_calc_type: Option<String>,
    pub gratuity_enabled: Option<bool>,
    pub gratuity_amount: Option<f64>,
    pub gratuity_calc_type: Option<String>,
    pub deposit_amount: Option<f64>,
    pub deposit_mode: Option<String>,
}
