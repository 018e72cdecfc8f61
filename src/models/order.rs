use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::dates::bson_to_rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum OrderStatus {
    Ongoing,
    Completed,
    Pending,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Ongoing)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Ongoing, OrderStatus::Completed)
                | (OrderStatus::Ongoing, OrderStatus::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Ongoing => "Ongoing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Pending => "Pending",
            OrderStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Subscription plan length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum SubscriptionPlan {
    #[serde(rename = "3-month")]
    ThreeMonth,
    #[serde(rename = "6-month")]
    SixMonth,
    #[serde(rename = "yearly")]
    Yearly,
}

impl SubscriptionPlan {
    pub fn months(&self) -> u32 {
        match self {
            SubscriptionPlan::ThreeMonth => 3,
            SubscriptionPlan::SixMonth => 6,
            SubscriptionPlan::Yearly => 12,
        }
    }

    /// Fraction taken off the box price for committing to the plan
    pub fn plan_discount(&self) -> f64 {
        match self {
            SubscriptionPlan::ThreeMonth => 0.0,
            SubscriptionPlan::SixMonth => 0.10,
            SubscriptionPlan::Yearly => 0.20,
        }
    }
}

/// Order document (`Purchases.orders`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    pub id: String,
    pub customer: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub subscription: SubscriptionPlan,
    pub status: OrderStatus,
    pub amount: f64,
    #[serde(default)]
    pub start_date: Option<String>,
    pub order_date: String,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub customer: String,
    pub customer_id: Option<String>,
    pub subscription: SubscriptionPlan,
    pub status: OrderStatus,
    pub amount: f64,
    pub start_date: Option<String>,
    pub order_date: String,
    pub promo_code: Option<String>,
    pub items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id,
            customer: order.customer,
            customer_id: order.customer_id,
            subscription: order.subscription,
            status: order.status,
            amount: order.amount,
            start_date: order.start_date,
            order_date: order.order_date,
            promo_code: order.promo_code,
            items: order.items,
            created_at: order.created_at.as_ref().map(bson_to_rfc3339),
            updated_at: order.updated_at.as_ref().map(bson_to_rfc3339),
        }
    }
}

/// Request to change an order's status (admin)
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_wire_names() {
        let plan: SubscriptionPlan = serde_json::from_str("\"6-month\"").unwrap();
        assert_eq!(plan, SubscriptionPlan::SixMonth);
        assert_eq!(serde_json::to_string(&SubscriptionPlan::Yearly).unwrap(), "\"yearly\"");
        assert!(serde_json::from_str::<SubscriptionPlan>("\"monthly\"").is_err());
    }

    #[test]
    fn test_status_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Ongoing));
        assert!(OrderStatus::Ongoing.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Ongoing));
        assert!(OrderStatus::Completed.is_terminal());
        assert!(!OrderStatus::Ongoing.is_terminal());
    }
}
