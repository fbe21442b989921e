//! The one place that decides what a caller may see.
//!
//! Every repository query is parameterized by the values computed here;
//! handlers never filter by tenant themselves. Invariant: every row a
//! repo returns for a caller has `organization_id == org_scope(caller)`.

use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::guard::Caller;

/// Visibility of leads for a caller. Organizers see their whole tenant;
/// agents see only leads assigned to their own agent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadScope {
    Organization(Uuid),
    AssignedTo {
        organization_id: Uuid,
        agent_id: Uuid,
    },
}

impl LeadScope {
    pub fn organization_id(&self) -> Uuid {
        match self {
            LeadScope::Organization(org) => *org,
            LeadScope::AssignedTo {
                organization_id, ..
            } => *organization_id,
        }
    }
}

/// The caller's tenant. Agents and organizers alike are confined to it.
pub fn org_scope(caller: &Caller) -> Uuid {
    caller.organization_id
}

pub fn lead_scope(caller: &Caller) -> AppResult<LeadScope> {
    if caller.is_organizer() {
        return Ok(LeadScope::Organization(caller.organization_id));
    }
    // An agent caller without a backing agent record cannot be scoped to
    // anything; treat it as a broken credential.
    let agent_id = caller.agent_id.ok_or(AppError::InvalidCredentials)?;
    Ok(LeadScope::AssignedTo {
        organization_id: caller.organization_id,
        agent_id,
    })
}
