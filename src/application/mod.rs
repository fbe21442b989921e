pub mod app_error;
pub mod guard;
pub mod jwt;
pub mod scope;
pub mod use_cases;
