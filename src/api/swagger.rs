use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vital Box API",
        version = "1.0.0",
        description = "Backend for the Vital Box supplement subscription shop.\n\n**Authentication:** signed-in routes read the `access_token` cookie set by signup/login, or an `Authorization: Bearer` header.\n\n**Features:**\n- Product catalog and BMI calculator\n- Personalised recommendations, insights and advisor answers\n- Box checkout with subscription plans and promo codes\n- Admin dashboard: users, orders, promotions and analytics"
    ),
    paths(
        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Auth
        crate::api::auth::signup,
        crate::api::auth::login,
        crate::api::auth::refresh,
        crate::api::auth::logout,
        crate::api::auth::me,
        crate::api::auth::sync_user,

        // Catalog & BMI
        crate::api::products::list_products,
        crate::api::products::get_product,
        crate::api::bmi::calculate,

        // Me
        crate::api::me::update_fitness_metrics,
        crate::api::me::update_goals,
        crate::api::me::record_feedback,

        // Advisor
        crate::api::advisor::recommendations,
        crate::api::advisor::insights,
        crate::api::advisor::ask,

        // Checkout
        crate::api::checkout::quote,
        crate::api::checkout::validate_promo,
        crate::api::checkout::place_order,
        crate::api::checkout::list_my_orders,

        // Admin
        crate::api::admin::list_users,
        crate::api::admin::update_user_note,
        crate::api::admin::list_orders,
        crate::api::admin::update_order_status,
        crate::api::admin::list_promotions,
        crate::api::admin::create_promotion,
        crate::api::admin::get_analytics,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::services::auth_service::SignupRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::SyncUserRequest,
            crate::services::auth_service::SyncedUser,
            crate::models::UserInfo,
            crate::models::Role,
            crate::models::Unit,
            crate::models::FitnessMetrics,
            crate::models::MetricsEntry,
            crate::models::Product,
            crate::services::bmi_service::BmiInput,
            crate::services::bmi_service::BmiCategory,
            crate::api::me::GoalsRequest,
            crate::api::me::FeedbackRequest,
            crate::api::advisor::AskRequest,
            crate::services::recommendation_service::Recommendation,
            crate::services::recommendation_service::RecommendationTier,
            crate::services::checkout_service::CheckoutRequest,
            crate::services::checkout_service::Quote,
            crate::services::checkout_service::QuoteLine,
            crate::api::checkout::PromoCheckRequest,
            crate::models::OrderResponse,
            crate::models::OrderStatus,
            crate::models::SubscriptionPlan,
            crate::models::UpdateOrderStatusRequest,
            crate::models::CreatePromotionRequest,
            crate::models::PromotionResponse,
            crate::models::DiscountType,
            crate::models::PromotionStatus,
            crate::models::AdminUserView,
            crate::models::AdminAnalytics,
            crate::models::SignupMonth,
            crate::models::MembershipMonth,
            crate::models::SubscriptionMonth,
            crate::api::admin::AdminNoteRequest,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and Prometheus counters."),
        (name = "Auth", description = "Local signup/login with cookie sessions, token refresh and Auth0 user sync."),
        (name = "Catalog", description = "The static supplement catalog."),
        (name = "BMI", description = "BMI calculator with category guidance."),
        (name = "Me", description = "The signed-in user's fitness metrics, goals and product feedback."),
        (name = "Advisor", description = "Rule-based recommendations, insights and advisor answers."),
        (name = "Checkout", description = "Box pricing, promo codes and orders."),
        (name = "Admin", description = "Admin dashboard. Requires a user with the admin role."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token issued by /api/auth/login"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("access_token"))),
            );
        }
    }
}
