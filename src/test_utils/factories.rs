//! Fixture factories. Each returns a complete, valid object with
//! sensible defaults; use the closure parameter to override fields.

use uuid::Uuid;

use crate::{
    domain::entities::{agent::Agent, user::Role, user::User},
    guard::Caller,
    use_cases::{auth::encode_password, leads::LeadInput},
};

use super::mocks::InMemoryStore;

pub fn create_test_user(
    store: &InMemoryStore,
    role: Role,
    overrides: impl FnOnce(&mut User),
) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    let mut user = User {
        id: Uuid::new_v4(),
        username: format!("user-{suffix}"),
        email: format!("user-{suffix}@example.com"),
        password_hash: encode_password("password123"),
        role,
        created_at: Some(chrono::Utc::now().naive_utc()),
    };
    overrides(&mut user);
    store.seed_user(user)
}

/// A fresh organizer with their own tenant.
pub fn organizer_caller(store: &InMemoryStore) -> Caller {
    let user = create_test_user(store, Role::Organizer, |_| {});
    let org = store.seed_organization(user.id);
    Caller {
        user_id: user.id,
        role: Role::Organizer,
        organization_id: org.id,
        agent_id: None,
    }
}

/// An agent employed by the given organizer's tenant.
pub fn agent_caller_for(store: &InMemoryStore, organizer: &Caller) -> (Agent, Caller) {
    let user = create_test_user(store, Role::Agent, |_| {});
    let agent = store.seed_agent(user.id, organizer.organization_id);
    let caller = Caller {
        user_id: user.id,
        role: Role::Agent,
        organization_id: agent.organization_id,
        agent_id: Some(agent.id),
    };
    (agent, caller)
}

pub fn create_test_lead_input(overrides: impl FnOnce(&mut LeadInput)) -> LeadInput {
    let mut input = LeadInput {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        age: 30,
        phoned: false,
        source: None,
        agent_id: None,
        category_id: None,
        profile_picture: None,
        special_files: None,
    };
    overrides(&mut input);
    input
}
