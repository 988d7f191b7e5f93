//! Account access gateway
//!
//! Middleware guarding the account routes. Gates run in a fixed order:
//! the caller must own the account before the block status is even
//! looked at, so a stranger probing a blocked account learns nothing
//! beyond "forbidden".

use axum::extract::{Path, Query, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;
use serde::Deserialize;

use contabank_business::{AccountService, OwnerService};
use contabank_core::{BusinessError, Cpf};

use crate::context::RequestId;
use crate::error::{ApiError, FieldError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessQuery {
    pub document_number: Option<String>,
}

/// Verified caller identity, attached for downstream handlers.
#[derive(Debug, Clone)]
pub struct AccountAccess {
    pub account_id: i64,
    pub owner_document_number: String,
}

/// Gate an account route on ownership, then on block status.
pub async fn account_access(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
    Query(query): Query<AccessQuery>,
    Extension(request_id): Extension<RequestId>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let document_number = query.document_number.unwrap_or_default();
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

    let authorized = OwnerService::new(&state.ctx)
        .is_account_owner_authorized(cpf.code(), account_id)
        .await
        .map_err(|error| ApiError::business(request_id.uuid(), error))?;

    if !authorized {
        tracing::warn!(
            event = "gateway.forbidden",
            request_id = %request_id.uuid(),
            account_id,
        );
        return Err(ApiError::business(
            request_id.uuid(),
            BusinessError::ForbiddenAccountAccess,
        ));
    }

    let blocked = AccountService::new(&state.ctx)
        .is_blocked(account_id)
        .await
        .map_err(|error| ApiError::business(request_id.uuid(), error))?;

    if blocked {
        tracing::warn!(
            event = "gateway.blocked_account",
            request_id = %request_id.uuid(),
            account_id,
        );
        return Err(ApiError::business(
            request_id.uuid(),
            BusinessError::BlockedAccount,
        ));
    }

    request.extensions_mut().insert(AccountAccess {
        account_id,
        owner_document_number: cpf.code().to_string(),
    });

    Ok(next.run(request).await)
}
