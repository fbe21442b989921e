use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::user::Role;

/// The authenticated caller, as resolved from the access token by the
/// HTTP layer. `organization_id` is the caller's own tenant for
/// organizers, and the employing tenant for agents. `agent_id` is set
/// only for agents.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
    pub organization_id: Uuid,
    pub agent_id: Option<Uuid>,
}

impl Caller {
    pub fn is_organizer(&self) -> bool {
        self.role == Role::Organizer
    }
}

/// Gate for organizer-only operations. An unauthenticated request never
/// reaches this point (no `Caller` can be built without a valid token),
/// so rejecting non-organizers here means a request is blocked whenever
/// either condition fails.
pub fn require_organizer(caller: &Caller) -> AppResult<()> {
    if !caller.is_organizer() {
        return Err(AppError::InvalidCredentials);
    }
    Ok(())
}
