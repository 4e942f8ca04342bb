use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use finguard_application::CreateTransactionInput;
use finguard_core::{AppError, UserIdentity};
use finguard_domain::TransactionKind;

use crate::dto::{CreateTransactionRequest, TransactionResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_transaction_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<TransactionResponse>)> {
    let input = create_transaction_input(payload)?;
    let transaction = state
        .transaction_service
        .create_transaction(&user, input)
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionResponse::from(transaction))))
}

pub async fn list_transactions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<TransactionResponse>>> {
    let transactions = state
        .transaction_service
        .list_transactions(&user)
        .await?
        .into_iter()
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(transactions))
}

fn create_transaction_input(
    payload: CreateTransactionRequest,
) -> Result<CreateTransactionInput, AppError> {
    let kind = match payload.kind.as_str() {
        "income" => TransactionKind::Income,
        "expense" => TransactionKind::Expense,
        other => {
            return Err(AppError::Validation(format!(
                "kind must be either 'income' or 'expense', got '{other}'"
            )));
        }
    };
    let occurred_on = NaiveDate::from_str(payload.occurred_on.as_str())
        .map_err(|error| AppError::Validation(format!("invalid occurred_on: {error}")))?;

    Ok(CreateTransactionInput {
        description: payload.description,
        category: payload.category,
        kind,
        amount_minor: payload.amount_minor,
        occurred_on,
    })
}
