use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{organization::Organization, user::Role, user::User},
    guard::Caller,
    use_cases::agents::AgentRepo,
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert the user and their organization in one transaction. Every
    /// user gets exactly one organization row, created here and nowhere
    /// else.
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<User>;
    async fn get_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn update_user(&self, user_id: Uuid, username: &str, email: &str) -> AppResult<User>;
    async fn organization_of_user(&self, user_id: Uuid) -> AppResult<Option<Organization>>;
}

#[derive(Clone)]
pub struct AuthUseCases {
    user_repo: Arc<dyn UserRepo>,
    agent_repo: Arc<dyn AgentRepo>,
}

impl AuthUseCases {
    pub fn new(user_repo: Arc<dyn UserRepo>, agent_repo: Arc<dyn AgentRepo>) -> Self {
        Self {
            user_repo,
            agent_repo,
        }
    }

    /// Self-service signup always creates an organizer; agent accounts
    /// exist only through provisioning by an organizer.
    #[instrument(skip(self, password))]
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        validate_username(username)?;
        validate_email(email)?;
        if password.len() < 8 {
            return Err(AppError::InvalidInput(
                "Password must be at least 8 characters".into(),
            ));
        }
        let hash = encode_password(password);
        self.user_repo
            .create_user(username, email, &hash, Role::Organizer)
            .await
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .user_repo
            .get_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Resolve the tenant linkage behind a verified token subject.
    /// Organizers anchor their own organization; agents borrow their
    /// employer's.
    #[instrument(skip(self))]
    pub async fn caller_for(&self, user_id: Uuid) -> AppResult<Caller> {
        let user = self
            .user_repo
            .get_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        match user.role {
            Role::Organizer => {
                let org = self
                    .user_repo
                    .organization_of_user(user.id)
                    .await?
                    .ok_or(AppError::InvalidCredentials)?;
                Ok(Caller {
                    user_id: user.id,
                    role: Role::Organizer,
                    organization_id: org.id,
                    agent_id: None,
                })
            }
            Role::Agent => {
                let agent = self
                    .agent_repo
                    .get_by_user(user.id)
                    .await?
                    .ok_or(AppError::InvalidCredentials)?;
                Ok(Caller {
                    user_id: user.id,
                    role: Role::Agent,
                    organization_id: agent.organization_id,
                    agent_id: Some(agent.id),
                })
            }
        }
    }
}

pub(crate) fn validate_username(username: &str) -> AppResult<()> {
    let username = username.trim();
    if username.is_empty() || username.len() > 150 {
        return Err(AppError::InvalidInput(
            "Username must be 1-150 characters".into(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> AppResult<()> {
    // Real validation happens when mail bounces; this catches typos.
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(AppError::InvalidInput("Invalid email address".into()));
    }
    Ok(())
}

/// Salted SHA-256, stored as `salt$hash` hex.
pub fn encode_password(raw: &str) -> String {
    let salt = generate_salt();
    format!("{}${}", salt, hash_password(raw, &salt))
}

pub fn verify_password(raw: &str, stored: &str) -> bool {
    let Some((salt, hash)) = stored.split_once('$') else {
        return false;
    };
    hash_password(raw, salt) == hash
}

fn generate_salt() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn hash_password(raw: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
