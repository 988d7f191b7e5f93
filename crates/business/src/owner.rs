//! Owner store service - creation, lookup and ownership checks
//!
//! `OwnerService` owns all writes to owner rows. The ownership association
//! itself is written at account-creation time by the balance engine.

use crate::services::ServiceContext;
use chrono::Utc;
use contabank_core::{BusinessError, BusinessResult, NewOwner, Owner};
use contabank_persistence::OwnerRepo;

/// Owner Service - creates and retrieves account-owner records
pub struct OwnerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OwnerService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new owner. The document number must not be registered yet.
    pub async fn create_new(&self, owner: &NewOwner) -> BusinessResult<Owner> {
        tracing::info!(
            event = "OwnerService.create_new",
            document_number = %owner.document_number,
        );

        let existing = OwnerRepo::get_by_document_number(
            self.ctx.pool(),
            &owner.document_number,
        )
        .await
        .map_err(|error| {
            tracing::error!(event = "OwnerService.create_new.error", %error);
            BusinessError::OwnerCreation
        })?;

        if existing.is_some() {
            tracing::warn!(
                event = "OwnerService.create_new.owner_already_exists",
                document_number = %owner.document_number,
            );
            return Err(BusinessError::OwnerAlreadyExists);
        }

        let row = OwnerRepo::insert(self.ctx.pool(), owner, Utc::now())
            .await
            .map_err(|error| {
                tracing::error!(event = "OwnerService.create_new.error", %error);
                // A concurrent insert can still hit the unique index.
                if error.is_unique_violation() {
                    BusinessError::OwnerAlreadyExists
                } else {
                    BusinessError::OwnerCreation
                }
            })?;

        Ok(row.into())
    }

    /// Find an owner by document number.
    pub async fn find_one(&self, document_number: &str) -> BusinessResult<Owner> {
        tracing::info!(event = "OwnerService.find_one", %document_number);

        let row = OwnerRepo::get_by_document_number(self.ctx.pool(), document_number)
            .await
            .map_err(|error| {
                tracing::error!(event = "OwnerService.find_one.error", %error);
                BusinessError::OwnerService
            })?
            .ok_or(BusinessError::OwnerNotFound)?;

        Ok(row.into())
    }

    /// Whether the owner identified by `document_number` holds `account_id`.
    ///
    /// "Not authorized" is an answer (`false`), not an error; an unknown
    /// owner propagates `OwnerNotFound` and unexpected persistence failures
    /// surface as the internal `OwnerService` error.
    pub async fn is_account_owner_authorized(
        &self,
        document_number: &str,
        account_id: i64,
    ) -> BusinessResult<bool> {
        tracing::info!(
            event = "OwnerService.is_account_owner_authorized",
            %document_number,
            account_id,
        );

        let owner = self.find_one(document_number).await?;

        let owned = OwnerRepo::owned_account_ids(self.ctx.pool(), owner.id)
            .await
            .map_err(|error| {
                tracing::error!(
                    event = "OwnerService.is_account_owner_authorized.error",
                    %error,
                );
                BusinessError::OwnerService
            })?;

        if owned.is_empty() {
            tracing::info!(
                event = "OwnerService.is_account_owner_authorized.no_accounts",
                owner_id = owner.id,
            );
            return Ok(false);
        }

        Ok(owned.contains(&account_id))
    }
}
