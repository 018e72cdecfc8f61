use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::models::{AdminAnalytics, AdminUserView, CreatePromotionRequest, OrderResponse, PromotionResponse, UpdateOrderStatusRequest};
use crate::services::{analytics_service, order_service, promotion_service, user_service};
use crate::state::AppState;
use crate::utils::AppResult;

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminNoteRequest {
    #[serde(default)]
    pub admin_note: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    responses(
        (status = 200, description = "Every user with metrics and admin note", body = [AdminUserView]),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an admin")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn list_users(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = user_service::list_for_admin(state.users.as_ref()).await?;
    log::info!("👥 GET /api/admin/users - {} users", users.len());
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "users": users })))
}

#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/notes",
    tag = "Admin",
    params(("id" = String, Path, description = "User ObjectId")),
    request_body = AdminNoteRequest,
    responses(
        (status = 200, description = "Note saved"),
        (status = 400, description = "Invalid user id"),
        (status = 404, description = "User not found"),
        (status = 403, description = "Not an admin")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn update_user_note(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Option<web::Json<AdminNoteRequest>>,
) -> AppResult<HttpResponse> {
    let request = body.map(web::Json::into_inner).unwrap_or_default();
    user_service::set_admin_note(state.users.as_ref(), &path, request.admin_note.as_deref()).await?;

    log::info!("📝 Admin note updated for user {}", path.as_str());
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    tag = "Admin",
    responses(
        (status = 200, description = "All orders, newest first", body = [OrderResponse]),
        (status = 403, description = "Not an admin")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn list_orders(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let orders = order_service::list(state.orders.as_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "orders": orders })))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    tag = "Admin",
    params(("id" = String, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed"),
        (status = 403, description = "Not an admin")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn update_order_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> AppResult<HttpResponse> {
    let order = order_service::update_status(state.orders.as_ref(), &path, request.status).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "order": order })))
}

#[utoipa::path(
    get,
    path = "/api/admin/promotions",
    tag = "Admin",
    responses(
        (status = 200, description = "Promotions, newest first, with their effective status", body = [PromotionResponse]),
        (status = 403, description = "Not an admin")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn list_promotions(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let promotions = promotion_service::list(state.promotions.as_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "promotions": promotions })))
}

#[utoipa::path(
    post,
    path = "/api/admin/promotions",
    tag = "Admin",
    request_body = CreatePromotionRequest,
    responses(
        (status = 200, description = "Promotion created", body = PromotionResponse),
        (status = 400, description = "Invalid promotion data"),
        (status = 409, description = "Promo code already exists"),
        (status = 403, description = "Not an admin")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn create_promotion(
    state: web::Data<AppState>,
    request: web::Json<CreatePromotionRequest>,
) -> AppResult<HttpResponse> {
    let promotion = promotion_service::create(state.promotions.as_ref(), &request).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "promotion": promotion })))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    tag = "Admin",
    responses(
        (status = 200, description = "Monthly signups, memberships and plan mix", body = AdminAnalytics),
        (status = 403, description = "Not an admin")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn get_analytics(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let analytics = analytics_service::load(state.users.as_ref(), state.orders.as_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "analytics": analytics })))
}
