use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::services::auth_service::{self, Claims};
use crate::services::recommendation_service::{self, ScoringProfile, ShoppingContext};
use crate::state::AppState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecommendationQuery {
    /// `post-workout` or `morning`
    #[param(value_type = Option<String>)]
    pub context: Option<ShoppingContext>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AskRequest {
    #[serde(default)]
    pub message: String,
}

async fn caller_profile(state: &AppState, claims: &Claims) -> AppResult<ScoringProfile> {
    let user = auth_service::current_user(state.users.as_ref(), claims).await?;
    Ok(ScoringProfile::from(&user))
}

#[utoipa::path(
    get,
    path = "/api/recommendations",
    tag = "Advisor",
    params(RecommendationQuery),
    responses(
        (status = 200, description = "Scored products, best first (at most 12)"),
        (status = 401, description = "Not signed in")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn recommendations(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    query: web::Query<RecommendationQuery>,
) -> AppResult<HttpResponse> {
    let profile = caller_profile(&state, &claims).await?;
    let recommendations = recommendation_service::recommend(&profile, query.context);

    log::debug!("🧠 {} recommendations for {}", recommendations.len(), claims.email);
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "recommendations": recommendations })))
}

#[utoipa::path(
    get,
    path = "/api/insights",
    tag = "Advisor",
    responses(
        (status = 200, description = "Tips and warnings derived from the caller's BMI and goals"),
        (status = 401, description = "Not signed in")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn insights(state: web::Data<AppState>, claims: web::ReqData<Claims>) -> AppResult<HttpResponse> {
    let profile = caller_profile(&state, &claims).await?;
    let insights = recommendation_service::insights(&profile);
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "insights": insights })))
}

#[utoipa::path(
    post,
    path = "/api/advisor/ask",
    tag = "Advisor",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Advisor reply with suggested products"),
        (status = 400, description = "Empty message"),
        (status = 401, description = "Not signed in")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn ask(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    request: web::Json<AskRequest>,
) -> AppResult<HttpResponse> {
    let profile = caller_profile(&state, &claims).await?;
    let reply = recommendation_service::advise(&profile, &request.message)?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "reply": reply })))
}
