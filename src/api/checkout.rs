use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::models::{PromotionResponse, PromotionStatus};
use crate::services::auth_service::{self, Claims};
use crate::services::checkout_service::{self, CheckoutRequest};
use crate::services::promotion_service;
use crate::state::AppState;
use crate::utils::dates::today_utc;
use crate::utils::AppResult;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PromoCheckRequest {
    #[serde(default)]
    pub code: String,
}

#[utoipa::path(
    post,
    path = "/api/checkout/quote",
    tag = "Checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Priced box", body = checkout_service::Quote),
        (status = 400, description = "Invalid box or inactive promo code"),
        (status = 404, description = "Unknown promo code")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn quote(state: web::Data<AppState>, request: web::Json<CheckoutRequest>) -> AppResult<HttpResponse> {
    let quote = checkout_service::quote(state.promotions.as_ref(), &request, today_utc()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "quote": quote })))
}

#[utoipa::path(
    post,
    path = "/api/checkout/promo",
    tag = "Checkout",
    request_body = PromoCheckRequest,
    responses(
        (status = 200, description = "Promo code is usable today", body = PromotionResponse),
        (status = 400, description = "Promo code is not active"),
        (status = 404, description = "Promo code not found")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn validate_promo(
    state: web::Data<AppState>,
    request: web::Json<PromoCheckRequest>,
) -> AppResult<HttpResponse> {
    let promo = promotion_service::find_active(state.promotions.as_ref(), &request.code, today_utc()).await?;
    let promotion = PromotionResponse::with_status(promo, PromotionStatus::Active);
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "promotion": promotion })))
}

#[utoipa::path(
    post,
    path = "/api/checkout/orders",
    tag = "Checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed as Pending", body = crate::models::OrderResponse),
        (status = 400, description = "Invalid box, start date or promo code"),
        (status = 401, description = "Not signed in")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn place_order(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    request: web::Json<CheckoutRequest>,
) -> AppResult<HttpResponse> {
    let customer = auth_service::current_user(state.users.as_ref(), &claims).await?;
    let order = checkout_service::place_order(
        state.orders.as_ref(),
        state.promotions.as_ref(),
        &customer,
        &request,
        today_utc(),
    )
    .await?;
    Ok(HttpResponse::Created().json(json!({ "ok": true, "order": order })))
}

#[utoipa::path(
    get,
    path = "/api/checkout/orders",
    tag = "Checkout",
    responses(
        (status = 200, description = "The caller's orders, newest first", body = [crate::models::OrderResponse]),
        (status = 401, description = "Not signed in")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn list_my_orders(state: web::Data<AppState>, claims: web::ReqData<Claims>) -> AppResult<HttpResponse> {
    let customer = auth_service::current_user(state.users.as_ref(), &claims).await?;
    let orders = checkout_service::list_orders_for(state.orders.as_ref(), &customer).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "orders": orders })))
}
