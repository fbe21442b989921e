//! In-memory repository and email-sender implementations. One store
//! backs all four repo traits so cross-entity semantics (soft-orphaning,
//! joins against users) behave like the real schema.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{
        agent::Agent, category::Category, lead::Lead, organization::Organization, user::Role,
        user::User,
    },
    scope::LeadScope,
    use_cases::{
        EmailSender,
        agents::{AgentProfile, AgentRepo},
        auth::UserRepo,
        categories::CategoryRepo,
        leads::{LeadRepo, LeadUpdate, NewLead},
    },
};

#[derive(Default)]
pub struct InMemoryStore {
    pub users: Mutex<HashMap<Uuid, User>>,
    pub organizations: Mutex<HashMap<Uuid, Organization>>,
    pub agents: Mutex<HashMap<Uuid, Agent>>,
    pub leads: Mutex<HashMap<Uuid, Lead>>,
    pub categories: Mutex<HashMap<Uuid, Category>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_user(&self, user: User) -> User {
        self.users.lock().unwrap().insert(user.id, user.clone());
        user
    }

    pub fn seed_organization(&self, user_id: Uuid) -> Organization {
        let org = Organization {
            id: Uuid::new_v4(),
            user_id,
            created_at: Some(chrono::Utc::now().naive_utc()),
        };
        self.organizations
            .lock()
            .unwrap()
            .insert(org.id, org.clone());
        org
    }

    pub fn seed_agent(&self, user_id: Uuid, organization_id: Uuid) -> Agent {
        let agent = Agent {
            id: Uuid::new_v4(),
            user_id,
            organization_id,
            created_at: Some(chrono::Utc::now().naive_utc()),
        };
        self.agents.lock().unwrap().insert(agent.id, agent.clone());
        agent
    }

    pub fn seed_category(&self, organization_id: Uuid, name: &str) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            organization_id,
        };
        self.categories
            .lock()
            .unwrap()
            .insert(category.id, category.clone());
        category
    }

    pub fn organization_count(&self) -> usize {
        self.organizations.lock().unwrap().len()
    }

    pub fn get_by_id_agent(&self, agent_id: Uuid) -> Option<Agent> {
        self.agents.lock().unwrap().get(&agent_id).cloned()
    }

    fn profile_for(&self, agent: &Agent) -> AgentProfile {
        let users = self.users.lock().unwrap();
        let user = users.get(&agent.user_id);
        AgentProfile {
            id: agent.id,
            user_id: agent.user_id,
            username: user.map(|u| u.username.clone()).unwrap_or_default(),
            email: user.map(|u| u.email.clone()).unwrap_or_default(),
            organization_id: agent.organization_id,
            created_at: agent.created_at,
        }
    }
}

fn lead_visible(lead: &Lead, scope: LeadScope) -> bool {
    match scope {
        LeadScope::Organization(org) => lead.organization_id == org,
        LeadScope::AssignedTo {
            organization_id,
            agent_id,
        } => lead.organization_id == organization_id && lead.agent_id == Some(agent_id),
    }
}

#[async_trait]
impl UserRepo for InMemoryStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|u| u.username == username || u.email == email)
        {
            return Err(AppError::InvalidInput(
                "A record with this value already exists".into(),
            ));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: Some(chrono::Utc::now().naive_utc()),
        };
        users.insert(user.id, user.clone());
        drop(users);

        // Same-transaction organization creation, idempotent on user_id.
        let mut orgs = self.organizations.lock().unwrap();
        if !orgs.values().any(|o| o.user_id == user.id) {
            let org = Organization {
                id: Uuid::new_v4(),
                user_id: user.id,
                created_at: Some(chrono::Utc::now().naive_utc()),
            };
            orgs.insert(org.id, org);
        }
        Ok(user)
    }

    async fn get_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update_user(&self, user_id: Uuid, username: &str, email: &str) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|u| u.id != user_id && (u.username == username || u.email == email))
        {
            return Err(AppError::InvalidInput(
                "A record with this value already exists".into(),
            ));
        }
        let user = users.get_mut(&user_id).ok_or(AppError::NotFound)?;
        user.username = username.to_string();
        user.email = email.to_string();
        Ok(user.clone())
    }

    async fn organization_of_user(&self, user_id: Uuid) -> AppResult<Option<Organization>> {
        Ok(self
            .organizations
            .lock()
            .unwrap()
            .values()
            .find(|o| o.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl AgentRepo for InMemoryStore {
    async fn create(&self, user_id: Uuid, organization_id: Uuid) -> AppResult<Agent> {
        Ok(self.seed_agent(user_id, organization_id))
    }

    async fn list(&self, organization_id: Uuid) -> AppResult<Vec<AgentProfile>> {
        let agents: Vec<Agent> = self
            .agents
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.organization_id == organization_id)
            .cloned()
            .collect();
        Ok(agents.iter().map(|a| self.profile_for(a)).collect())
    }

    async fn get(&self, organization_id: Uuid, agent_id: Uuid) -> AppResult<Option<AgentProfile>> {
        let agent = self
            .agents
            .lock()
            .unwrap()
            .get(&agent_id)
            .filter(|a| a.organization_id == organization_id)
            .cloned();
        Ok(agent.map(|a| self.profile_for(&a)))
    }

    async fn get_by_id(&self, agent_id: Uuid) -> AppResult<Option<Agent>> {
        Ok(self.agents.lock().unwrap().get(&agent_id).cloned())
    }

    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Option<Agent>> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .values()
            .find(|a| a.user_id == user_id)
            .cloned())
    }

    async fn delete(&self, organization_id: Uuid, agent_id: Uuid) -> AppResult<()> {
        let mut agents = self.agents.lock().unwrap();
        let matches = agents
            .get(&agent_id)
            .is_some_and(|a| a.organization_id == organization_id);
        if !matches {
            return Err(AppError::NotFound);
        }
        agents.remove(&agent_id);
        drop(agents);

        // FK on leads is SET NULL.
        for lead in self.leads.lock().unwrap().values_mut() {
            if lead.agent_id == Some(agent_id) {
                lead.agent_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LeadRepo for InMemoryStore {
    async fn create(&self, new: &NewLead) -> AppResult<Lead> {
        let lead = Lead {
            id: Uuid::new_v4(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            age: new.age,
            phoned: new.phoned,
            source: new.source,
            agent_id: new.agent_id,
            category_id: new.category_id,
            organization_id: new.organization_id,
            profile_picture: new.profile_picture.clone(),
            special_files: new.special_files.clone(),
            created_at: Some(chrono::Utc::now().naive_utc()),
        };
        self.leads.lock().unwrap().insert(lead.id, lead.clone());
        Ok(lead)
    }

    async fn list_assigned(&self, scope: LeadScope) -> AppResult<Vec<Lead>> {
        Ok(self
            .leads
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.agent_id.is_some() && lead_visible(l, scope))
            .cloned()
            .collect())
    }

    async fn list_unassigned(&self, organization_id: Uuid) -> AppResult<Vec<Lead>> {
        Ok(self
            .leads
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.organization_id == organization_id && l.agent_id.is_none())
            .cloned()
            .collect())
    }

    async fn get(&self, scope: LeadScope, lead_id: Uuid) -> AppResult<Option<Lead>> {
        Ok(self
            .leads
            .lock()
            .unwrap()
            .get(&lead_id)
            .filter(|l| lead_visible(l, scope))
            .cloned())
    }

    async fn update(
        &self,
        organization_id: Uuid,
        lead_id: Uuid,
        update: &LeadUpdate,
    ) -> AppResult<Option<Lead>> {
        let mut leads = self.leads.lock().unwrap();
        let Some(lead) = leads
            .get_mut(&lead_id)
            .filter(|l| l.organization_id == organization_id)
        else {
            return Ok(None);
        };
        lead.first_name = update.first_name.clone();
        lead.last_name = update.last_name.clone();
        lead.age = update.age;
        lead.phoned = update.phoned;
        lead.source = update.source;
        lead.agent_id = update.agent_id;
        lead.category_id = update.category_id;
        lead.profile_picture = update.profile_picture.clone();
        lead.special_files = update.special_files.clone();
        Ok(Some(lead.clone()))
    }

    async fn delete(&self, organization_id: Uuid, lead_id: Uuid) -> AppResult<bool> {
        let mut leads = self.leads.lock().unwrap();
        let matches = leads
            .get(&lead_id)
            .is_some_and(|l| l.organization_id == organization_id);
        if matches {
            leads.remove(&lead_id);
        }
        Ok(matches)
    }

    async fn set_agent(
        &self,
        organization_id: Uuid,
        lead_id: Uuid,
        agent_id: Uuid,
    ) -> AppResult<Option<Lead>> {
        let mut leads = self.leads.lock().unwrap();
        let Some(lead) = leads
            .get_mut(&lead_id)
            .filter(|l| l.organization_id == organization_id)
        else {
            return Ok(None);
        };
        lead.agent_id = Some(agent_id);
        Ok(Some(lead.clone()))
    }

    async fn set_category(
        &self,
        scope: LeadScope,
        lead_id: Uuid,
        category_id: Option<Uuid>,
    ) -> AppResult<Option<Lead>> {
        let mut leads = self.leads.lock().unwrap();
        let Some(lead) = leads.get_mut(&lead_id).filter(|l| lead_visible(l, scope)) else {
            return Ok(None);
        };
        lead.category_id = category_id;
        Ok(Some(lead.clone()))
    }

    async fn list_by_category(
        &self,
        organization_id: Uuid,
        category_id: Uuid,
    ) -> AppResult<Vec<Lead>> {
        Ok(self
            .leads
            .lock()
            .unwrap()
            .values()
            .filter(|l| {
                l.organization_id == organization_id && l.category_id == Some(category_id)
            })
            .cloned()
            .collect())
    }

    async fn count_uncategorized(&self, organization_id: Uuid) -> AppResult<i64> {
        Ok(self
            .leads
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.organization_id == organization_id && l.category_id.is_none())
            .count() as i64)
    }
}

#[async_trait]
impl CategoryRepo for InMemoryStore {
    async fn create(&self, organization_id: Uuid, name: &str) -> AppResult<Category> {
        Ok(self.seed_category(organization_id, name))
    }

    async fn list(&self, organization_id: Uuid) -> AppResult<Vec<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn get(&self, organization_id: Uuid, category_id: Uuid) -> AppResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .get(&category_id)
            .filter(|c| c.organization_id == organization_id)
            .cloned())
    }

    async fn update(
        &self,
        organization_id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Category>> {
        let mut categories = self.categories.lock().unwrap();
        let Some(category) = categories
            .get_mut(&category_id)
            .filter(|c| c.organization_id == organization_id)
        else {
            return Ok(None);
        };
        category.name = name.to_string();
        Ok(Some(category.clone()))
    }

    async fn delete(&self, organization_id: Uuid, category_id: Uuid) -> AppResult<bool> {
        let mut categories = self.categories.lock().unwrap();
        let matches = categories
            .get(&category_id)
            .is_some_and(|c| c.organization_id == organization_id);
        if !matches {
            return Ok(false);
        }
        categories.remove(&category_id);
        drop(categories);

        for lead in self.leads.lock().unwrap().values_mut() {
            if lead.category_id == Some(category_id) {
                lead.category_id = None;
            }
        }
        Ok(true)
    }
}

// ============================================================================
// Email
// ============================================================================

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records every message for assertions.
#[derive(Default)]
pub struct InMemoryEmailSender {
    sent: Mutex<Vec<SentEmail>>,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for InMemoryEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: html.to_string(),
        });
        Ok(())
    }
}

/// Always fails, for asserting that notification errors never abort the
/// triggering operation.
pub struct FailingEmailSender;

#[async_trait]
impl EmailSender for FailingEmailSender {
    async fn send(&self, _to: &str, _subject: &str, _html: &str) -> AppResult<()> {
        Err(AppError::Internal("smtp unreachable".into()))
    }
}
