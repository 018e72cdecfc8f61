use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{Auth0Profile, Measurement, Order, OrderStatus, Promotion, User};
use crate::utils::AppResult;

/// Access to the `userdata` collection
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_id(&self, id: &ObjectId) -> AppResult<Option<User>>;

    /// `email` must already be normalized (trimmed, lower-case)
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fails with `Conflict` when the email is taken
    async fn insert_user(&self, user: &User) -> AppResult<ObjectId>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Returns false when no user matched
    async fn set_admin_note(&self, id: &ObjectId, note: &str) -> AppResult<bool>;

    /// Replaces `fitnessMetrics.goals` only
    async fn set_goals(&self, id: &ObjectId, goals: &[String]) -> AppResult<bool>;

    /// Sets the latest reading and appends it to `fitnessMetrics.history` in one update
    async fn record_measurement(&self, id: &ObjectId, measurement: &Measurement) -> AppResult<bool>;

    async fn set_product_feedback(&self, id: &ObjectId, product_id: &str, liked: bool) -> AppResult<bool>;

    /// Insert-or-update keyed on the Auth0 id or the email. Returns the stored user.
    async fn upsert_auth0_user(&self, profile: &Auth0Profile) -> AppResult<Option<User>>;
}

/// Access to the `orders` collection
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert_order(&self, order: &Order) -> AppResult<()>;

    /// Newest first
    async fn list_orders(&self) -> AppResult<Vec<Order>>;

    /// Newest first
    async fn list_orders_for_customer(&self, customer_id: &str) -> AppResult<Vec<Order>>;

    async fn find_order(&self, id: &str) -> AppResult<Option<Order>>;

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> AppResult<bool>;
}

/// Access to the `promotions` collection
#[async_trait]
pub trait PromotionRepository: Send + Sync {
    /// Newest first
    async fn list_promotions(&self) -> AppResult<Vec<Promotion>>;

    /// `code` must already be normalized (trimmed, upper-case)
    async fn find_promotion_by_code(&self, code: &str) -> AppResult<Option<Promotion>>;

    /// Fails with `Conflict` when the code is taken
    async fn insert_promotion(&self, promotion: &Promotion) -> AppResult<()>;
}
