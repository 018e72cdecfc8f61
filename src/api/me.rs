use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::api::bmi::bmi_body;
use crate::services::auth_service::{self, Claims};
use crate::services::bmi_service::{self, BmiInput};
use crate::services::user_service;
use crate::state::AppState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GoalsRequest {
    #[serde(default)]
    pub goals: Vec<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub product_id: String,
    pub liked: bool,
}

#[utoipa::path(
    put,
    path = "/api/me/fitness-metrics",
    tag = "Me",
    request_body = BmiInput,
    responses(
        (status = 200, description = "BMI recorded; returns the result and the stored metrics"),
        (status = 400, description = "Height or weight not positive"),
        (status = 401, description = "Not signed in")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn update_fitness_metrics(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    input: web::Json<BmiInput>,
) -> AppResult<HttpResponse> {
    let id = auth_service::subject_id(&claims)?;
    let result = bmi_service::evaluate(&input)?;
    let user = user_service::record_fitness_metrics(state.users.as_ref(), &id, &input).await?;

    log::info!("⚖️  Fitness metrics recorded for {}: BMI {}", user.email, result.bmi);

    let mut body = bmi_body(&result);
    body["fitnessMetrics"] = json!(user.fitness_metrics);
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    put,
    path = "/api/me/goals",
    tag = "Me",
    request_body = GoalsRequest,
    responses(
        (status = 200, description = "Normalized goals"),
        (status = 401, description = "Not signed in")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn update_goals(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    request: web::Json<GoalsRequest>,
) -> AppResult<HttpResponse> {
    let id = auth_service::subject_id(&claims)?;
    let goals = user_service::update_goals(state.users.as_ref(), &id, &request.goals).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "goals": goals })))
}

#[utoipa::path(
    post,
    path = "/api/me/feedback",
    tag = "Me",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback stored"),
        (status = 404, description = "Unknown product"),
        (status = 401, description = "Not signed in")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn record_feedback(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    request: web::Json<FeedbackRequest>,
) -> AppResult<HttpResponse> {
    let id = auth_service::subject_id(&claims)?;
    user_service::record_feedback(state.users.as_ref(), &id, &request.product_id, request.liked).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
