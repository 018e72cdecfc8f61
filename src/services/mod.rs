pub mod analytics_service;
pub mod auth_service;
pub mod bmi_service;
pub mod checkout_service;
pub mod order_service;
pub mod promotion_service;
pub mod recommendation_service;
pub mod user_service;
