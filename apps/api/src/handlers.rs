mod health;
mod profile;
mod security;
mod transactions;

#[cfg(test)]
mod tests;

pub use health::health_handler;
pub use profile::{change_password_handler, set_password_handler};
pub use security::{security_metrics_handler, unblock_user_handler};
pub use transactions::{create_transaction_handler, list_transactions_handler};
