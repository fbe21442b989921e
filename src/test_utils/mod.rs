//! In-memory fakes and fixture factories for unit and HTTP-level tests.

pub mod app_state_builder;
pub mod factories;
pub mod mocks;

pub use app_state_builder::TestAppStateBuilder;
pub use factories::{
    agent_caller_for, create_test_lead_input, create_test_user, organizer_caller,
};
pub use mocks::{FailingEmailSender, InMemoryEmailSender, InMemoryStore, SentEmail};
