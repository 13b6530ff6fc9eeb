pub mod api;
pub mod config;
pub mod dashboard;
pub mod import;
pub mod models;
pub mod resourcing;
pub mod store;
