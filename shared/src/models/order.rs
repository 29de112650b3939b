//! Order Model

use serde::{Deserialize, Serialize};

use super::{OrderPackage, OrderPackageInput, OrderStatus};

fn default_country_code() -> String {
    "+60".to_string()
}

/// Order entity (customer purchase on a form)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub form_id: i64,
    pub merchant_id: String,
    pub reference_number: String,
    pub status: OrderStatus,

    // Customer
    pub sales_executive: Option<String>,
    pub salutation: Option<String>,
    pub customer_name: String,
    pub email: String,
    pub nationality: Option<String>,
    pub country_code: String,
    pub phone: String,

    /// Calendar date `YYYY-MM-DD`
    pub travel_date: Option<String>,

    // Payment
    pub payment_method: Option<String>,
    pub transaction_ref: Option<String>,

    // Totals
    pub subtotal: f64,
    pub total_boat_fare: f64,
    pub total_gratuity: f64,
    pub grand_total: f64,
    pub deposit_paid: f64,
    pub balance_due: f64,
    pub deposit_mode: Option<String>,

    // Remarks
    pub travel_date_remarks: Option<String>,
    pub award_remarks: Option<String>,
    pub notes: Option<String>,

    /// Public URL of the uploaded payment receipt
    pub payment_receipt: Option<String>,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub packages: Vec<OrderPackage>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub form_id: i64,
    #[serde(default)]
    pub merchant_id: String,
    /// Generated when absent
    pub reference_number: Option<String>,
    pub status: Option<OrderStatus>,
    pub sales_executive: Option<String>,
    pub salutation: Option<String>,
    pub customer_name: String,
    pub email: String,
    pub nationality: Option<String>,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    pub phone: String,
    pub travel_date: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_ref: Option<String>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub total_boat_fare: f64,
    #[serde(default)]
    pub total_gratuity: f64,
    #[serde(default)]
    pub grand_total: f64,
    #[serde(default)]
    pub deposit_paid: f64,
    #[serde(default)]
    pub balance_due: f64,
    pub deposit_mode: Option<String>,
    pub travel_date_remarks: Option<String>,
    pub award_remarks: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub packages: Vec<OrderPackageInput>,
}

/// Update order payload (PUT)
///
/// `packages: None` leaves line items untouched; `Some(list)` reconciles
/// the stored line items against the list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    /// Must match the path id when present
    pub id: Option<i64>,
    pub form_id: Option<i64>,
    pub merchant_id: Option<String>,
    pub reference_number: Option<String>,
    pub status: Option<OrderStatus>,
    pub sales_executive: Option<String>,
    pub salutation: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub nationality: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub travel_date: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_ref: Option<String>,
    pub subtotal: Option<f64>,
    pub total_boat_fare: Option<f64>,
    pub total_gratuity: Option<f64>,
    pub grand_total: Option<f64>,
    pub deposit_paid: Option<f64>,
    pub balance_due: Option<f64>,
    pub deposit_mode: Option<String>,
    pub travel_date_remarks: Option<String>,
    pub award_remarks: Option<String>,
    pub notes: Option<String>,
    pub packages: Option<Vec<OrderPackageInput>>,
}

/// Order status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Aggregate figures over non-deleted orders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderStatistics {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub total_deposits: f64,
    pub outstanding_balance: f64,
    pub today_orders: i64,
    pub today_revenue: f64,
    pub pending_count: i64,
    pub confirmed_count: i64,
    pub completed_count: i64,
    pub cancelled_count: i64,
}

/// Receipt upload result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptUploaded {
    pub message: String,
    pub image_url: String,
}
