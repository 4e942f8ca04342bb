mod audit_sink;
mod database;
mod state_builder;

pub use audit_sink::build_audit_sink;
pub use database::connect_and_migrate;
pub use state_builder::build_app_state;
