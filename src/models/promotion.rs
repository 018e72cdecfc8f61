use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

use crate::utils::dates::bson_to_rfc3339;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    #[default]
    Percent,
    Flat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum PromotionStatus {
    Active,
    #[default]
    Scheduled,
    Expired,
}

/// Promotion document (`Purchases.promotions`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default)]
    pub discount_value: f64,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub status: PromotionStatus,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

impl Promotion {
    /// Public id: the `promo-…` id, or the ObjectId for legacy documents without one
    pub fn public_id(&self) -> String {
        if self.id.is_empty() {
            self.object_id.map(|id| id.to_hex()).unwrap_or_default()
        } else {
            self.id.clone()
        }
    }
}

/// Body of `POST /api/admin/promotions`. Loosely typed so bad input maps to 400, not a JSON error.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromotionRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub discount_type: Option<DiscountType>,
    #[schema(value_type = Option<f64>)]
    pub discount_value: Option<serde_json::Value>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub start_date: String,
    pub end_date: String,
    pub status: PromotionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl PromotionResponse {
    pub fn with_status(promo: Promotion, status: PromotionStatus) -> Self {
        PromotionResponse {
            id: promo.public_id(),
            name: promo.name,
            code: promo.code,
            discount_type: promo.discount_type,
            discount_value: promo.discount_value,
            start_date: promo.start_date,
            end_date: promo.end_date,
            status,
            created_at: promo.created_at.as_ref().map(bson_to_rfc3339),
            updated_at: promo.updated_at.as_ref().map(bson_to_rfc3339),
        }
    }
}
