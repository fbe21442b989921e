use async_trait::async_trait;

use crate::app_error::AppResult;

pub mod agents;
pub mod auth;
pub mod categories;
pub mod leads;

/// Outbound notification port. Fire-and-forget from the caller's point
/// of view; delivery failures are the sender's problem to report, never
/// a reason to roll back the triggering operation.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}
