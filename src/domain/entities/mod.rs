pub mod agent;
pub mod category;
pub mod lead;
pub mod organization;
pub mod user;
