use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{agent::Agent, user::Role},
    guard::{Caller, require_organizer},
    scope::org_scope,
    use_cases::{
        EmailSender,
        auth::{UserRepo, encode_password, validate_email, validate_username},
    },
};

/// Agent row joined with its backing user, the shape every read returns.
#[derive(Debug, Clone)]
pub struct AgentProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub organization_id: Uuid,
    pub created_at: Option<chrono::NaiveDateTime>,
}

#[async_trait]
pub trait AgentRepo: Send + Sync {
    async fn create(&self, user_id: Uuid, organization_id: Uuid) -> AppResult<Agent>;
    async fn list(&self, organization_id: Uuid) -> AppResult<Vec<AgentProfile>>;
    async fn get(&self, organization_id: Uuid, agent_id: Uuid) -> AppResult<Option<AgentProfile>>;
    /// Unscoped lookup, used for identity resolution and for the
    /// explicit cross-tenant assignment check.
    async fn get_by_id(&self, agent_id: Uuid) -> AppResult<Option<Agent>>;
    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Option<Agent>>;
    async fn delete(&self, organization_id: Uuid, agent_id: Uuid) -> AppResult<()>;
}

#[derive(Clone)]
pub struct AgentUseCases {
    user_repo: Arc<dyn UserRepo>,
    agent_repo: Arc<dyn AgentRepo>,
    email: Arc<dyn EmailSender>,
    temp_password: SecretString,
}

impl AgentUseCases {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        agent_repo: Arc<dyn AgentRepo>,
        email: Arc<dyn EmailSender>,
        temp_password: SecretString,
    ) -> Self {
        Self {
            user_repo,
            agent_repo,
            email,
            temp_password,
        }
    }

    /// Provision an agent: a backing user with the configured temporary
    /// credential, an agent record bound to the organizer's tenant, and
    /// an invitation mail. The mail is best-effort; a delivery failure
    /// never undoes the records.
    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn create_agent(
        &self,
        caller: &Caller,
        username: &str,
        email: &str,
    ) -> AppResult<AgentProfile> {
        require_organizer(caller)?;
        validate_username(username)?;
        validate_email(email)?;

        let hash = encode_password(self.temp_password.expose_secret());
        let user = self
            .user_repo
            .create_user(username, email, &hash, Role::Agent)
            .await?;
        let agent = self.agent_repo.create(user.id, org_scope(caller)).await?;

        if let Err(err) = self
            .email
            .send(
                &user.email,
                "You are invited to be an agent",
                "You were added as an agent on the CRM. Please log in to start working.",
            )
            .await
        {
            tracing::warn!(error = ?err, agent_id = %agent.id, "Agent invitation mail failed");
        }

        Ok(AgentProfile {
            id: agent.id,
            user_id: user.id,
            username: user.username,
            email: user.email,
            organization_id: agent.organization_id,
            created_at: agent.created_at,
        })
    }

    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn list_agents(&self, caller: &Caller) -> AppResult<Vec<AgentProfile>> {
        require_organizer(caller)?;
        self.agent_repo.list(org_scope(caller)).await
    }

    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn get_agent(&self, caller: &Caller, agent_id: Uuid) -> AppResult<AgentProfile> {
        require_organizer(caller)?;
        self.agent_repo
            .get(org_scope(caller), agent_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Edits land on the backing user; the agent row itself only ties
    /// user to tenant.
    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn update_agent(
        &self,
        caller: &Caller,
        agent_id: Uuid,
        username: &str,
        email: &str,
    ) -> AppResult<AgentProfile> {
        require_organizer(caller)?;
        validate_username(username)?;
        validate_email(email)?;

        let agent = self
            .agent_repo
            .get(org_scope(caller), agent_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let user = self
            .user_repo
            .update_user(agent.user_id, username, email)
            .await?;

        Ok(AgentProfile {
            username: user.username,
            email: user.email,
            ..agent
        })
    }

    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn delete_agent(&self, caller: &Caller, agent_id: Uuid) -> AppResult<()> {
        require_organizer(caller)?;
        self.agent_repo.delete(org_scope(caller), agent_id).await
    }
}
