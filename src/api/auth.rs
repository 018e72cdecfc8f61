use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, HttpRequest, HttpResponse, HttpResponseBuilder};
use serde_json::json;

use crate::config::Config;
use crate::models::UserInfo;
use crate::services::auth_service::{
    self, AuthSession, Claims, LoginRequest, SignupRequest, SyncUserRequest, ACCESS_COOKIE, REFRESH_COOKIE,
};
use crate::state::AppState;
use crate::utils::{AppError, AppResult};

fn session_cookie(name: &'static str, value: String, ttl_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(CookieDuration::seconds(ttl_secs))
        .finish()
}

fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new(), 0, secure);
    cookie.make_removal();
    cookie
}

fn session_response(mut builder: HttpResponseBuilder, config: &Config, session: AuthSession) -> HttpResponse {
    builder
        .cookie(session_cookie(
            ACCESS_COOKIE,
            session.access_token,
            config.access_ttl_secs,
            config.cookie_secure,
        ))
        .cookie(session_cookie(
            REFRESH_COOKIE,
            session.refresh_token,
            config.refresh_ttl_secs,
            config.cookie_secure,
        ))
        .json(json!({ "ok": true, "user": UserInfo::from(&session.user) }))
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, session cookies set", body = UserInfo),
        (status = 400, description = "Invalid name, email or password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(state: web::Data<AppState>, request: web::Json<SignupRequest>) -> AppResult<HttpResponse> {
    log::info!("📝 POST /api/auth/signup - email: {}", request.email.trim());

    let session = auth_service::signup(state.users.as_ref(), &state.config, &request).await?;
    Ok(session_response(HttpResponse::Created(), &state.config, session))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookies set", body = UserInfo),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(state: web::Data<AppState>, request: web::Json<LoginRequest>) -> AppResult<HttpResponse> {
    log::info!("🔐 POST /api/auth/login - email: {}", request.email.trim());

    match auth_service::login(state.users.as_ref(), &state.config, &request).await {
        Ok(session) => Ok(session_response(HttpResponse::Ok(), &state.config, session)),
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email.trim(), e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Auth",
    responses(
        (status = 200, description = "New session cookies set", body = UserInfo),
        (status = 401, description = "Missing or invalid refresh token")
    )
)]
pub async fn refresh(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    log::info!("🔄 POST /api/auth/refresh");

    let token = req
        .cookie(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing refresh token".into()))?;

    let session = auth_service::refresh(state.users.as_ref(), &state.config, &token).await?;
    Ok(session_response(HttpResponse::Ok(), &state.config, session))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Session cookies cleared"))
)]
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    log::info!("👋 POST /api/auth/logout");

    HttpResponse::Ok()
        .cookie(removal_cookie(ACCESS_COOKIE, state.config.cookie_secure))
        .cookie(removal_cookie(REFRESH_COOKIE, state.config.cookie_secure))
        .json(json!({ "ok": true }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 401, description = "Not signed in")
    ),
    security(("cookie_auth" = []), ("bearer_auth" = []))
)]
pub async fn me(state: web::Data<AppState>, claims: web::ReqData<Claims>) -> AppResult<HttpResponse> {
    let user = auth_service::current_user(state.users.as_ref(), &claims).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "user": UserInfo::from(&user) })))
}

#[utoipa::path(
    post,
    path = "/api/auth/sync-user",
    tag = "Auth",
    request_body = SyncUserRequest,
    responses(
        (status = 200, description = "User synced", body = auth_service::SyncedUser),
        (status = 400, description = "ID token has no email"),
        (status = 401, description = "Missing or invalid ID token")
    )
)]
pub async fn sync_user(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Option<web::Json<SyncUserRequest>>,
) -> AppResult<HttpResponse> {
    log::info!("🔄 POST /api/auth/sync-user");

    let from_body = body.and_then(|b| b.into_inner().id_token);
    let from_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    let token = from_body.or(from_header);

    let user = auth_service::sync_auth0_user(state.users.as_ref(), &state.config, token.as_deref()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "User synced successfully",
        "user": user
    })))
}
