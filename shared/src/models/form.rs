//! Form Model (booking pages)

use serde::{Deserialize, Serialize};

use super::{FormSettings, FormStatus, Package};

/// Form entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Form {
    pub id: i64,
    pub title: String,
    pub status: FormStatus,
    pub is_default: bool,
    pub submission_count: i64,
    pub logo_url: Option<String>,
    pub logo_name: Option<String>,
    pub branding_subtitle: Option<String>,
    pub branding_description: Option<String>,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub form_settings: Option<FormSettings>,

    /// Only present on the detail view
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<Package>>,
}

/// Create form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormCreate {
    pub title: String,
    pub status: Option<FormStatus>,
    pub is_default: Option<bool>,
    pub logo_url: Option<String>,
    pub logo_name: Option<String>,
    pub branding_subtitle: Option<String>,
    pub branding_description: Option<String>,
}

/// Update form payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormUpdate {
    /// Must match the path id when present
    pub id: Option<i64>,
    pub title: Option<String>,
    pub status: Option<FormStatus>,
    pub is_default: Option<bool>,
    pub logo_url: Option<String>,
    pub logo_name: Option<String>,
    pub branding_subtitle: Option<String>,
    pub branding_description: Option<String>,
}

/// Form status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormStatusUpdate {
    pub status: FormStatus,
}

/// Form status change result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormStatusChanged {
    pub form_id: i64,
    pub new_status: FormStatus,
}
