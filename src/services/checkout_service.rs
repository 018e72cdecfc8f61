use chrono::NaiveDate;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog;
use crate::database::{OrderRepository, PromotionRepository};
use crate::models::{Order, OrderResponse, OrderStatus, SubscriptionPlan, User};
use crate::services::promotion_service::{self, round_cents};
use crate::utils::dates::{format_ymd, parse_ymd};
use crate::utils::{AppError, AppResult};

pub const MAX_BOX_ITEMS: usize = 8;

/// Body of the quote and order endpoints
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Catalog product ids
    #[serde(default)]
    pub items: Vec<String>,
    pub plan: SubscriptionPlan,
    #[serde(default)]
    pub promo_code: Option<String>,
    /// `YYYY-MM-DD`, defaults to the order date
    #[serde(default)]
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub product_id: String,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub items: Vec<QuoteLine>,
    pub plan: SubscriptionPlan,
    pub months: u32,
    pub monthly_price: f64,
    /// After the plan discount, before any promo
    pub subtotal: f64,
    pub promo_code: Option<String>,
    pub discount: f64,
    pub total: f64,
}

fn box_lines(items: &[String]) -> AppResult<Vec<QuoteLine>> {
    if items.is_empty() || items.len() > MAX_BOX_ITEMS {
        return Err(AppError::Validation(format!(
            "A box holds between 1 and {} products",
            MAX_BOX_ITEMS
        )));
    }

    let mut lines: Vec<QuoteLine> = Vec::with_capacity(items.len());
    for raw in items {
        let id = raw.trim();
        if lines.iter().any(|l| l.product_id == id) {
            return Err(AppError::Validation(format!("Duplicate product in box: {}", id)));
        }
        let product = catalog::find(id).ok_or_else(|| AppError::Validation(format!("Unknown product: {}", id)))?;
        lines.push(QuoteLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
        });
    }
    Ok(lines)
}

/// Prices a box for a plan; the promo, when given, must be active on `today`
pub async fn quote(
    promotions: &dyn PromotionRepository,
    request: &CheckoutRequest,
    today: NaiveDate,
) -> AppResult<Quote> {
    let items = box_lines(&request.items)?;
    let plan = request.plan;

    let monthly_price = round_cents(items.iter().map(|l| l.price).sum());
    let subtotal = round_cents(monthly_price * plan.months() as f64 * (1.0 - plan.plan_discount()));

    let promo_code = request
        .promo_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let (promo_code, total) = match promo_code {
        Some(code) => {
            let promo = promotion_service::find_active(promotions, code, today).await?;
            let total = promotion_service::apply_discount(subtotal, &promo);
            (Some(promo.code), total)
        }
        None => (None, subtotal),
    };

    Ok(Quote {
        items,
        plan,
        months: plan.months(),
        monthly_price,
        subtotal,
        promo_code,
        discount: round_cents(subtotal - total),
        total,
    })
}

pub async fn place_order(
    orders: &dyn OrderRepository,
    promotions: &dyn PromotionRepository,
    customer: &User,
    request: &CheckoutRequest,
    today: NaiveDate,
) -> AppResult<OrderResponse> {
    let quote = quote(promotions, request, today).await?;

    let start_date = match request.start_date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let date = parse_ymd(raw).ok_or_else(|| AppError::Validation("Invalid start date".into()))?;
            if date < today {
                return Err(AppError::Validation("Start date cannot be in the past".into()));
            }
            date
        }
        None => today,
    };

    let now = BsonDateTime::now();
    let order = Order {
        object_id: None,
        id: format!("ord-{}", Uuid::new_v4().simple()),
        customer: customer.name.clone(),
        customer_id: Some(customer.id_hex()),
        subscription: quote.plan,
        status: OrderStatus::Pending,
        amount: quote.total,
        start_date: Some(format_ymd(start_date)),
        order_date: format_ymd(today),
        promo_code: quote.promo_code,
        items: quote.items.into_iter().map(|l| l.product_id).collect(),
        created_at: Some(now),
        updated_at: Some(now),
    };

    orders.insert_order(&order).await?;
    log::info!(
        "🛒 Order {} placed by {} ({} months, ${:.2})",
        order.id,
        customer.email,
        order.subscription.months(),
        order.amount
    );

    Ok(OrderResponse::from(order))
}

pub async fn list_orders_for(orders: &dyn OrderRepository, customer: &User) -> AppResult<Vec<OrderResponse>> {
    Ok(orders
        .list_orders_for_customer(&customer.id_hex())
        .await?
        .into_iter()
        .map(OrderResponse::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::UserRepository;
    use crate::models::CreatePromotionRequest;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        parse_ymd(s).unwrap()
    }

    fn request(body: serde_json::Value) -> CheckoutRequest {
        serde_json::from_value(body).unwrap()
    }

    async fn with_promo(store: &MemoryStore, body: serde_json::Value) {
        let req: CreatePromotionRequest = serde_json::from_value(body).unwrap();
        promotion_service::create(store, &req).await.unwrap();
    }

    #[tokio::test]
    async fn test_quote_applies_plan_discount() {
        let store = MemoryStore::new();
        // 54.99 + 39.99 = 94.98 per month
        let quote = quote(&store, &request(json!({ "items": ["1", "3"], "plan": "6-month" })), date("2025-01-10"))
            .await
            .unwrap();

        assert_eq!(quote.months, 6);
        assert_eq!(quote.monthly_price, 94.98);
        // 94.98 × 6 × 0.9 = 512.892
        assert_eq!(quote.subtotal, 512.89);
        assert_eq!(quote.discount, 0.0);
        assert_eq!(quote.total, 512.89);
    }

    #[tokio::test]
    async fn test_quote_rejects_bad_boxes() {
        let store = MemoryStore::new();
        let today = date("2025-01-10");
        let bad = [
            json!({ "items": [], "plan": "yearly" }),
            json!({ "items": ["1", "1"], "plan": "yearly" }),
            json!({ "items": ["99"], "plan": "yearly" }),
            json!({ "items": ["1", "2", "3", "4", "5", "6", "7", "8", "9"], "plan": "yearly" }),
        ];
        for body in bad {
            assert!(matches!(quote(&store, &request(body), today).await, Err(AppError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_quote_with_active_promo() {
        let store = MemoryStore::new();
        let today = crate::utils::dates::today_utc();
        with_promo(&store, json!({ "name": "Welcome", "code": "WELCOME", "discountType": "flat", "discountValue": 20 })).await;

        let quote = quote(
            &store,
            &request(json!({ "items": ["1"], "plan": "3-month", "promoCode": "welcome" })),
            today,
        )
        .await
        .unwrap();

        // 54.99 × 3 = 164.97
        assert_eq!(quote.subtotal, 164.97);
        assert_eq!(quote.total, 144.97);
        assert_eq!(quote.discount, 20.0);
        assert_eq!(quote.promo_code.as_deref(), Some("WELCOME"));
    }

    #[tokio::test]
    async fn test_place_order_and_list() {
        let store = MemoryStore::new();
        let mut user = User::new_local("Ana".into(), "ana@example.com".into(), "hash".into());
        user.id = Some(store.insert_user(&user).await.unwrap());
        let today = date("2025-01-10");

        let order = place_order(
            &store,
            &store,
            &user,
            &request(json!({ "items": ["6", "9"], "plan": "yearly" })),
            today,
        )
        .await
        .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.order_date, "2025-01-10");
        assert_eq!(order.start_date.as_deref(), Some("2025-01-10"));
        assert_eq!(order.customer, "Ana");
        assert_eq!(order.items, vec!["6", "9"]);

        let mine = list_orders_for(&store, &user).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, order.id);

        let past = place_order(
            &store,
            &store,
            &user,
            &request(json!({ "items": ["6"], "plan": "yearly", "startDate": "2024-12-01" })),
            today,
        )
        .await;
        assert!(matches!(past, Err(AppError::Validation(_))));
    }
}
