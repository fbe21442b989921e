use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::lead::{Lead, LeadSource},
    guard::{Caller, require_organizer},
    scope::{LeadScope, lead_scope, org_scope},
    use_cases::{EmailSender, agents::AgentRepo, categories::CategoryRepo},
};

#[derive(Debug, Clone)]
pub struct NewLead {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub phoned: bool,
    pub source: Option<LeadSource>,
    pub agent_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub organization_id: Uuid,
    pub profile_picture: Option<String>,
    pub special_files: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LeadUpdate {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub phoned: bool,
    pub source: Option<LeadSource>,
    pub agent_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub profile_picture: Option<String>,
    pub special_files: Option<String>,
}

#[async_trait]
pub trait LeadRepo: Send + Sync {
    async fn create(&self, lead: &NewLead) -> AppResult<Lead>;
    /// Leads with an agent, visible under `scope`.
    async fn list_assigned(&self, scope: LeadScope) -> AppResult<Vec<Lead>>;
    /// Tenant-wide leads with no agent. Organizer views only.
    async fn list_unassigned(&self, organization_id: Uuid) -> AppResult<Vec<Lead>>;
    async fn get(&self, scope: LeadScope, lead_id: Uuid) -> AppResult<Option<Lead>>;
    async fn update(
        &self,
        organization_id: Uuid,
        lead_id: Uuid,
        update: &LeadUpdate,
    ) -> AppResult<Option<Lead>>;
    async fn delete(&self, organization_id: Uuid, lead_id: Uuid) -> AppResult<bool>;
    async fn set_agent(
        &self,
        organization_id: Uuid,
        lead_id: Uuid,
        agent_id: Uuid,
    ) -> AppResult<Option<Lead>>;
    async fn set_category(
        &self,
        scope: LeadScope,
        lead_id: Uuid,
        category_id: Option<Uuid>,
    ) -> AppResult<Option<Lead>>;
    async fn list_by_category(
        &self,
        organization_id: Uuid,
        category_id: Uuid,
    ) -> AppResult<Vec<Lead>>;
    async fn count_uncategorized(&self, organization_id: Uuid) -> AppResult<i64>;
}

/// What the list operation hands back: leads visible to the caller, plus
/// the tenant's unassigned pool when the caller may manage it.
#[derive(Debug)]
pub struct LeadListing {
    pub leads: Vec<Lead>,
    pub unassigned: Option<Vec<Lead>>,
}

#[derive(Clone)]
pub struct LeadUseCases {
    lead_repo: Arc<dyn LeadRepo>,
    agent_repo: Arc<dyn AgentRepo>,
    category_repo: Arc<dyn CategoryRepo>,
    email: Arc<dyn EmailSender>,
    notify_recipient: Option<String>,
}

impl LeadUseCases {
    pub fn new(
        lead_repo: Arc<dyn LeadRepo>,
        agent_repo: Arc<dyn AgentRepo>,
        category_repo: Arc<dyn CategoryRepo>,
        email: Arc<dyn EmailSender>,
        notify_recipient: Option<String>,
    ) -> Self {
        Self {
            lead_repo,
            agent_repo,
            category_repo,
            email,
            notify_recipient,
        }
    }

    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn list_leads(&self, caller: &Caller) -> AppResult<LeadListing> {
        let scope = lead_scope(caller)?;
        let leads = self.lead_repo.list_assigned(scope).await?;
        let unassigned = if caller.is_organizer() {
            Some(self.lead_repo.list_unassigned(org_scope(caller)).await?)
        } else {
            None
        };
        Ok(LeadListing { leads, unassigned })
    }

    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn get_lead(&self, caller: &Caller, lead_id: Uuid) -> AppResult<Lead> {
        let scope = lead_scope(caller)?;
        self.lead_repo
            .get(scope, lead_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Both roles may create; the organization is always the caller's
    /// tenant, never client input.
    #[instrument(skip(self, caller, input), fields(organization_id = %caller.organization_id))]
    pub async fn create_lead(&self, caller: &Caller, input: LeadInput) -> AppResult<Lead> {
        validate_lead_fields(&input.first_name, &input.last_name, input.age)?;
        let organization_id = org_scope(caller);
        self.check_agent_in_tenant(organization_id, input.agent_id)
            .await?;
        self.check_category_in_tenant(organization_id, input.category_id)
            .await?;

        let lead = self
            .lead_repo
            .create(&NewLead {
                first_name: input.first_name,
                last_name: input.last_name,
                age: input.age,
                phoned: input.phoned,
                source: input.source,
                agent_id: input.agent_id,
                category_id: input.category_id,
                organization_id,
                profile_picture: input.profile_picture,
                special_files: input.special_files,
            })
            .await?;

        if let Some(recipient) = &self.notify_recipient {
            if let Err(err) = self
                .email
                .send(
                    recipient,
                    "A lead has been created",
                    "Go to the site to see the new lead.",
                )
                .await
            {
                tracing::warn!(error = ?err, lead_id = %lead.id, "Lead notification mail failed");
            }
        }

        Ok(lead)
    }

    #[instrument(skip(self, caller, input), fields(organization_id = %caller.organization_id))]
    pub async fn update_lead(
        &self,
        caller: &Caller,
        lead_id: Uuid,
        input: LeadInput,
    ) -> AppResult<Lead> {
        require_organizer(caller)?;
        validate_lead_fields(&input.first_name, &input.last_name, input.age)?;
        let organization_id = org_scope(caller);
        self.check_agent_in_tenant(organization_id, input.agent_id)
            .await?;
        self.check_category_in_tenant(organization_id, input.category_id)
            .await?;

        self.lead_repo
            .update(
                organization_id,
                lead_id,
                &LeadUpdate {
                    first_name: input.first_name,
                    last_name: input.last_name,
                    age: input.age,
                    phoned: input.phoned,
                    source: input.source,
                    agent_id: input.agent_id,
                    category_id: input.category_id,
                    profile_picture: input.profile_picture,
                    special_files: input.special_files,
                },
            )
            .await?
            .ok_or(AppError::NotFound)
    }

    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn delete_lead(&self, caller: &Caller, lead_id: Uuid) -> AppResult<()> {
        require_organizer(caller)?;
        if !self.lead_repo.delete(org_scope(caller), lead_id).await? {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Move a lead from the unassigned pool (or another agent) to the
    /// chosen agent. The agent must belong to the lead's organization;
    /// a cross-tenant choice is rejected outright.
    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn assign_agent(
        &self,
        caller: &Caller,
        lead_id: Uuid,
        agent_id: Uuid,
    ) -> AppResult<Lead> {
        require_organizer(caller)?;
        let organization_id = org_scope(caller);

        let lead = self
            .lead_repo
            .get(LeadScope::Organization(organization_id), lead_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let agent = self
            .agent_repo
            .get_by_id(agent_id)
            .await?
            .ok_or_else(|| AppError::InvalidInput("No such agent".into()))?;

        if agent.organization_id != lead.organization_id {
            return Err(AppError::InvalidInput(
                "Agent belongs to a different organization".into(),
            ));
        }

        self.lead_repo
            .set_agent(organization_id, lead_id, agent_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Reclassify in place. Any category to any other, or to none; both
    /// roles, within their lead scope.
    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn update_category(
        &self,
        caller: &Caller,
        lead_id: Uuid,
        category_id: Option<Uuid>,
    ) -> AppResult<Lead> {
        let scope = lead_scope(caller)?;
        self.check_category_in_tenant(scope.organization_id(), category_id)
            .await?;
        self.lead_repo
            .set_category(scope, lead_id, category_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn check_agent_in_tenant(
        &self,
        organization_id: Uuid,
        agent_id: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(agent_id) = agent_id
            && self.agent_repo.get(organization_id, agent_id).await?.is_none()
        {
            return Err(AppError::InvalidInput("No such agent".into()));
        }
        Ok(())
    }

    async fn check_category_in_tenant(
        &self,
        organization_id: Uuid,
        category_id: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(category_id) = category_id
            && self
                .category_repo
                .get(organization_id, category_id)
                .await?
                .is_none()
        {
            return Err(AppError::InvalidInput("No such category".into()));
        }
        Ok(())
    }
}

/// Client-supplied lead fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct LeadInput {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub phoned: bool,
    pub source: Option<LeadSource>,
    pub agent_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub profile_picture: Option<String>,
    pub special_files: Option<String>,
}

fn validate_lead_fields(first_name: &str, last_name: &str, age: i32) -> AppResult<()> {
    if first_name.trim().is_empty() || first_name.len() > 20 {
        return Err(AppError::InvalidInput(
            "First name must be 1-20 characters".into(),
        ));
    }
    if last_name.trim().is_empty() || last_name.len() > 20 {
        return Err(AppError::InvalidInput(
            "Last name must be 1-20 characters".into(),
        ));
    }
    if !(0..=150).contains(&age) {
        return Err(AppError::InvalidInput("Age must be between 0 and 150".into()));
    }
    Ok(())
}
