//! Test app state builder for HTTP-level integration testing.
//!
//! Wires every use case over a shared [`InMemoryStore`] so route tests
//! can seed data directly and assert through the HTTP surface.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum_extra::extract::cookie::Cookie;
use secrecy::SecretString;
use time::Duration;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    application::jwt,
    application::use_cases::{
        EmailSender,
        agents::{AgentRepo, AgentUseCases},
        auth::{AuthUseCases, UserRepo},
        categories::{CategoryRepo, CategoryUseCases},
        leads::{LeadRepo, LeadUseCases},
    },
    infra::config::AppConfig,
    test_utils::{InMemoryEmailSender, InMemoryStore},
};

const TEST_JWT_SECRET: &str = "test-secret";
const TEST_TEMP_PASSWORD: &str = "TemporaryPass123";

/// Builder for creating `AppState` backed by in-memory mocks.
///
/// # Example
///
/// ```ignore
/// let builder = TestAppStateBuilder::new();
/// let caller = organizer_caller(builder.store());
/// let cookie = TestAppStateBuilder::auth_cookie_for(caller.user_id);
/// let server = TestServer::new(router().with_state(builder.build())).unwrap();
/// ```
pub struct TestAppStateBuilder {
    store: Arc<InMemoryStore>,
    email: Arc<InMemoryEmailSender>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            email: Arc::new(InMemoryEmailSender::new()),
        }
    }

    /// Backing store, for seeding fixtures before `build`.
    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }

    /// Capturing email sender, for asserting on outbound mail.
    pub fn email(&self) -> &Arc<InMemoryEmailSender> {
        &self.email
    }

    /// Access-token cookie for `user_id`, signed with the test secret.
    pub fn auth_cookie_for(user_id: Uuid) -> Cookie<'static> {
        let secret = SecretString::new(TEST_JWT_SECRET.into());
        let token = jwt::issue(user_id, &secret, Duration::hours(1)).unwrap();
        Cookie::build(("access_token", token)).path("/").build()
    }

    pub fn build(self) -> AppState {
        let user_repo = self.store.clone() as Arc<dyn UserRepo>;
        let agent_repo = self.store.clone() as Arc<dyn AgentRepo>;
        let lead_repo = self.store.clone() as Arc<dyn LeadRepo>;
        let category_repo = self.store.clone() as Arc<dyn CategoryRepo>;
        let email = self.email as Arc<dyn EmailSender>;

        let auth_use_cases = AuthUseCases::new(user_repo.clone(), agent_repo.clone());

        let agent_use_cases = AgentUseCases::new(
            user_repo,
            agent_repo.clone(),
            email.clone(),
            SecretString::new(TEST_TEMP_PASSWORD.into()),
        );

        let lead_use_cases = LeadUseCases::new(
            lead_repo.clone(),
            agent_repo,
            category_repo.clone(),
            email,
            None,
        );

        let category_use_cases = CategoryUseCases::new(category_repo, lead_repo);

        let config = Arc::new(AppConfig {
            bind_addr: "127.0.0.1:3001".parse::<SocketAddr>().unwrap(),
            database_url: String::new(),
            jwt_secret: SecretString::new(TEST_JWT_SECRET.into()),
            access_token_ttl: Duration::hours(24),
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            resend_api_key: SecretString::new("re_test".into()),
            email_from: "crm@example.com".to_string(),
            lead_notify_email: None,
            agent_temp_password: SecretString::new(TEST_TEMP_PASSWORD.into()),
        });

        AppState {
            config,
            auth_use_cases: Arc::new(auth_use_cases),
            lead_use_cases: Arc::new(lead_use_cases),
            agent_use_cases: Arc::new(agent_use_cases),
            category_use_cases: Arc::new(category_use_cases),
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
