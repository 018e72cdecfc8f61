//! Shared fixtures for the HTTP-level tests.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use std::sync::Arc;

use crate::config::Config;
use crate::database::memory::MemoryStore;
use crate::models::Role;
use crate::services::auth_service::tests::seed_user;
use crate::state::AppState;

pub(crate) struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

pub(crate) fn context() -> TestContext {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(Config::for_tests(), store.clone());
    TestContext { store, state }
}

impl TestContext {
    /// Seeds a user with the given role and returns a `Bearer` header value for it
    pub async fn bearer(&self, email: &str, role: Role) -> String {
        let (_, token) = seed_user(&self.store, &self.state.config, email, role).await;
        format!("Bearer {}", token)
    }
}

pub(crate) async fn body_json<B: MessageBody>(resp: ServiceResponse<B>) -> serde_json::Value {
    test::read_body_json(resp).await
}

macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .wrap(crate::middleware::SecurityHeaders)
                .configure(crate::api::configure),
        )
        .await
    };
}

pub(crate) use test_app;
