use finguard_application::{AdmissionGuard, ProfileService, TransactionService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub transaction_service: TransactionService,
    pub profile_service: ProfileService,
    pub admission_guard: AdmissionGuard,
    pub admin_token: Option<String>,
}
