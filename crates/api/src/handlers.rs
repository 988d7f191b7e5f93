//! API Handlers
//!
//! Thin edge over the business services: validate, delegate, wrap in the
//! success envelope. Authorization for the account routes happens earlier,
//! in the gateway middleware.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::{Extension, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use contabank_business::{
    AccountOperationService, AccountService, OwnerService, PaginatedOperations,
};
use contabank_core::{Account, Cpf, OperationType, Owner};

use crate::context::RequestId;
use crate::error::{ApiError, FieldError};
use crate::gateway::AccountAccess;
use crate::state::AppState;
use crate::validators;

// ============ Response Types ============

/// Success envelope: `{ uuid, message, content? }`.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub uuid: Uuid,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn message_only(request_id: RequestId, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            uuid: request_id.uuid(),
            message: message.into(),
            content: None,
        })
    }

    pub fn with_content(
        request_id: RequestId,
        message: impl Into<String>,
        content: T,
    ) -> Json<Self> {
        Json(Self {
            uuid: request_id.uuid(),
            message: message.into(),
            content: Some(content),
        })
    }
}

// ============ Request Types ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOwnerRequest {
    pub name: String,
    pub document_number: String,
    /// YYYY-MM-DD
    pub birth_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(rename = "type")]
    pub account_type: String,
    pub balance: Decimal,
    pub daily_withdrawal_limit: Option<Decimal>,
    pub document_numbers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementQuery {
    pub period: Option<i64>,
    pub page: Option<i64>,
    pub items_per_page: Option<i64>,
}

// ============ Handlers ============

/// Health check endpoint
pub async fn healthcheck(
    Extension(request_id): Extension<RequestId>,
) -> Json<Envelope<()>> {
    Envelope::message_only(request_id, "OK")
}

/// Register a new account owner
pub async fn create_owner(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<CreateOwnerRequest>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Envelope<Owner>>), ApiError> {
    let new_owner = validators::validate_new_owner(&payload)
        .map_err(|details| ApiError::validation(request_id.uuid(), details))?;

    let owner = OwnerService::new(&state.ctx)
        .create_new(&new_owner)
        .await
        .map_err(|error| ApiError::business(request_id.uuid(), error))?;

    let location = format!("/recover-owner/{}", owner.document_number);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Envelope::with_content(request_id, "Account owner successfully created", owner),
    ))
}

/// Fetch an owner by document number
pub async fn recover_owner(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(document_number): Path<String>,
) -> Result<Json<Envelope<Owner>>, ApiError> {
    let cpf = Cpf::new(&document_number);
    if !cpf.is_valid() {
        return Err(ApiError::validation(
            request_id.uuid(),
            vec![FieldError::new(
                "documentNumber",
                "documentNumber must be a valid CPF",
            )],
        ));
    }

    let owner = OwnerService::new(&state.ctx)
        .find_one(cpf.code())
        .await
        .map_err(|error| ApiError::business(request_id.uuid(), error))?;

    Ok(Envelope::with_content(
        request_id,
        "Account owner successfully recovered",
        owner,
    ))
}

/// Open a new account for one or more registered owners
pub async fn create_account(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Envelope<Account>>), ApiError> {
    let (new_account, document_numbers) = validators::validate_new_account(&payload)
        .map_err(|details| ApiError::validation(request_id.uuid(), details))?;

    let account = AccountService::new(&state.ctx)
        .create_new(&new_account, &document_numbers)
        .await
        .map_err(|error| ApiError::business(request_id.uuid(), error))?;

    let location = format!("/{}", account.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Envelope::with_content(request_id, "Account successfully created", account),
    ))
}

/// Fetch an account by id
pub async fn recover_account(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<Account>>, ApiError> {
    let account = AccountService::new(&state.ctx)
        .find_one(id)
        .await
        .map_err(|error| ApiError::business(request_id.uuid(), error))?;

    Ok(Envelope::with_content(
        request_id,
        "Account successfully recovered",
        account,
    ))
}

/// Credit an amount to the account balance
pub async fn deposit(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(payload): Json<AmountRequest>,
) -> Result<Json<Envelope<Account>>, ApiError> {
    let amount = validators::validate_amount(payload.amount)
        .map_err(|details| ApiError::validation(request_id.uuid(), details))?;

    let account = AccountService::new(&state.ctx)
        .alter_balance(id, amount, OperationType::Credit)
        .await
        .map_err(|error| ApiError::business(request_id.uuid(), error))?;

    Ok(Envelope::with_content(
        request_id,
        "Deposit successfully performed",
        account,
    ))
}

/// Debit an amount from the account balance
pub async fn withdrawal(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(payload): Json<AmountRequest>,
) -> Result<Json<Envelope<Account>>, ApiError> {
    let amount = validators::validate_amount(payload.amount)
        .map_err(|details| ApiError::validation(request_id.uuid(), details))?;

    let account = AccountService::new(&state.ctx)
        .alter_balance(id, amount, OperationType::Debit)
        .await
        .map_err(|error| ApiError::business(request_id.uuid(), error))?;

    Ok(Envelope::with_content(
        request_id,
        "Withdrawal successfully performed",
        account,
    ))
}

/// Block the account for further gated operations
pub async fn block(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(access): Extension<AccountAccess>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<Account>>, ApiError> {
    tracing::info!(
        event = "account.block",
        request_id = %request_id.uuid(),
        account_id = id,
        requested_by = %access.owner_document_number,
    );

    let account = AccountService::new(&state.ctx)
        .deactivate(id)
        .await
        .map_err(|error| ApiError::business(request_id.uuid(), error))?;

    Ok(Envelope::with_content(
        request_id,
        "Account successfully blocked",
        account,
    ))
}

/// One page of the account statement for the requested period
pub async fn statement(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Query(query): Query<StatementQuery>,
) -> Result<Json<Envelope<PaginatedOperations>>, ApiError> {
    let (period, page, items_per_page) = validators::validate_statement_query(&query)
        .map_err(|details| ApiError::validation(request_id.uuid(), details))?;

    let operations = AccountOperationService::new(&state.ctx)
        .paginatedly_find_many(id, period, page, items_per_page)
        .await
        .map_err(|error| ApiError::business(request_id.uuid(), error))?;

    Ok(Envelope::with_content(
        request_id,
        "Account statement successfully recovered",
        operations,
    ))
}
