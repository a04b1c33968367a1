//! Partner hospital sites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartnerLocation {
    pub id: i64,
    #[schema(example = "32")]
    pub province_code: String,
    #[schema(example = "Jawa Barat")]
    pub province_name: String,
    #[schema(example = "RS Harapan Sehat")]
    pub hospital_name: String,
    pub address: String,
    pub maintenance_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a new partner location
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewPartnerLocation {
    #[validate(length(min = 1, max = 10, message = "Province code is required"))]
    #[schema(example = "32")]
    pub province_code: String,

    #[validate(length(min = 1, max = 100, message = "Province name is required"))]
    #[schema(example = "Jawa Barat")]
    pub province_name: String,

    #[validate(length(min = 1, max = 200, message = "Hospital name is required"))]
    #[schema(example = "RS Harapan Sehat")]
    pub hospital_name: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    #[validate(range(min = 0, message = "Maintenance count cannot be negative"))]
    #[serde(default)]
    pub maintenance_count: i32,
}
