use std::sync::Arc;

use crate::config::Config;
use crate::database::{OrderRepository, PromotionRepository, UserRepository};

/// Shared application state handed to every handler through `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub promotions: Arc<dyn PromotionRepository>,
}

impl AppState {
    pub fn new<S>(config: Config, store: Arc<S>) -> Self
    where
        S: UserRepository + OrderRepository + PromotionRepository + 'static,
    {
        Self {
            config: Arc::new(config),
            users: store.clone(),
            orders: store.clone(),
            promotions: store,
        }
    }
}
