//! Account balance engine and operation ledger service
//!
//! `AccountService` is the only writer of account balances. Balance
//! mutations are compare-and-swap updates that commit together with their
//! ledger entry, so the ledger always matches the sequence of applied
//! mutations. `AccountOperationService` owns reads and writes of the
//! ledger itself.

use crate::services::ServiceContext;
use chrono::{DateTime, Duration, Utc};
use contabank_core::{
    safe_offset, Account, BusinessError, BusinessResult, NewAccount, Operation, OperationType,
};
use contabank_persistence::{AccountRepo, OperationRepo, OwnerRepo};
use rust_decimal::Decimal;
use serde::Serialize;

/// Stale-balance retries before a mutation gives up.
const BALANCE_UPDATE_RETRIES: u32 = 3;

/// One page of ledger entries plus the page count for the whole window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedOperations {
    pub operations: Vec<Operation>,
    pub total_pages: u64,
}

/// Account Service - creation, recovery and balance mutations
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new account held by the owners identified by
    /// `document_numbers`.
    ///
    /// The distinct document-number count must match the account type:
    /// joint accounts take more than one, every other type exactly one.
    /// Every document number must resolve to a registered owner; a partial
    /// resolution fails the whole creation.
    pub async fn create_new(
        &self,
        account: &NewAccount,
        document_numbers: &[String],
    ) -> BusinessResult<Account> {
        tracing::info!(
            event = "AccountService.create_new",
            account_type = %account.account_type,
            owners = document_numbers.len(),
        );

        let mut distinct: Vec<String> = document_numbers.to_vec();
        distinct.sort();
        distinct.dedup();

        if !account.account_type.accepts_owner_count(distinct.len()) {
            tracing::warn!(
                event = "AccountService.create_new.wrong_account_type",
                account_type = %account.account_type,
                distinct_owners = distinct.len(),
            );
            return Err(BusinessError::WrongAccountType);
        }

        let owners = OwnerRepo::get_by_document_numbers(self.ctx.pool(), &distinct)
            .await
            .map_err(|error| {
                tracing::error!(event = "AccountService.create_new.error", %error);
                BusinessError::AccountCreation
            })?;

        if owners.len() != distinct.len() {
            tracing::warn!(
                event = "AccountService.create_new.unresolved_owners",
                requested = distinct.len(),
                resolved = owners.len(),
            );
            return Err(BusinessError::AccountCreation);
        }

        let owner_ids: Vec<i64> = owners.iter().map(|owner| owner.id).collect();

        let row = AccountRepo::create_with_owners(self.ctx.pool(), account, &owner_ids, Utc::now())
            .await
            .map_err(|error| {
                tracing::error!(event = "AccountService.create_new.error", %error);
                BusinessError::AccountCreation
            })?;

        row.try_into().map_err(|error| {
            tracing::error!(event = "AccountService.create_new.error", %error);
            BusinessError::AccountCreation
        })
    }

    /// Fetch an account by id.
    pub async fn find_one(&self, id: i64) -> BusinessResult<Account> {
        tracing::info!(event = "AccountService.find_one", account_id = id);

        let row = AccountRepo::get_by_id(self.ctx.pool(), id)
            .await
            .map_err(|error| {
                if error.is_not_found() {
                    BusinessError::AccountNotFound
                } else {
                    tracing::error!(event = "AccountService.find_one.error", %error);
                    BusinessError::AccountRecovery
                }
            })?;

        row.try_into().map_err(|error| {
            tracing::error!(event = "AccountService.find_one.error", %error);
            BusinessError::AccountRecovery
        })
    }

    /// Apply a credit or debit of `amount` to the account and append the
    /// matching ledger entry, atomically.
    ///
    /// The update is guarded on the balance read at the start of each
    /// attempt; a concurrent writer invalidates the guard and the mutation
    /// re-reads and retries a bounded number of times. A debit that would
    /// take the balance negative is rejected before any write.
    pub async fn alter_balance(
        &self,
        id: i64,
        amount: Decimal,
        operation_type: OperationType,
    ) -> BusinessResult<Account> {
        tracing::info!(
            event = "AccountService.alter_balance",
            account_id = id,
            %amount,
            operation_type = %operation_type,
        );

        for attempt in 0..BALANCE_UPDATE_RETRIES {
            let account = self.find_one(id).await?;
            let final_balance = operation_type.final_balance(account.balance, amount);

            if final_balance < Decimal::ZERO {
                tracing::warn!(
                    event = "AccountService.alter_balance.insufficient_balance",
                    account_id = id,
                    balance = %account.balance,
                    %amount,
                );
                return Err(BusinessError::InsufficientAccountBalance);
            }

            let now = Utc::now();
            let mut tx = self.ctx.pool().begin().await.map_err(|error| {
                tracing::error!(event = "AccountService.alter_balance.error", %error);
                BusinessError::AccountBalanceAlteration
            })?;

            let updated = AccountRepo::update_balance_guarded(
                &mut *tx,
                id,
                account.balance,
                final_balance,
                now,
            )
            .await;

            let row = match updated {
                Ok(row) => row,
                Err(error) if error.is_update_conflict() => {
                    tracing::warn!(
                        event = "AccountService.alter_balance.stale_balance",
                        account_id = id,
                        attempt,
                    );
                    // Roll back and retry from a fresh read.
                    drop(tx);
                    continue;
                }
                Err(error) => {
                    tracing::error!(event = "AccountService.alter_balance.error", %error);
                    return Err(BusinessError::AccountBalanceAlteration);
                }
            };

            AccountOperationService::new(self.ctx)
                .create_new_with(&mut *tx, id, amount, operation_type, now)
                .await?;

            tx.commit().await.map_err(|error| {
                tracing::error!(event = "AccountService.alter_balance.error", %error);
                BusinessError::AccountBalanceAlteration
            })?;

            return row.try_into().map_err(|error| {
                tracing::error!(event = "AccountService.alter_balance.error", %error);
                BusinessError::AccountBalanceAlteration
            });
        }

        tracing::error!(
            event = "AccountService.alter_balance.retries_exhausted",
            account_id = id,
        );
        Err(BusinessError::AccountBalanceAlteration)
    }

    /// Mark an account inactive. Already-inactive accounts deactivate
    /// again without complaint.
    pub async fn deactivate(&self, id: i64) -> BusinessResult<Account> {
        tracing::info!(event = "AccountService.deactivate", account_id = id);

        let row = AccountRepo::deactivate(self.ctx.pool(), id, Utc::now())
            .await
            .map_err(|error| {
                if error.is_not_found() {
                    BusinessError::AccountNotFound
                } else {
                    tracing::error!(event = "AccountService.deactivate.error", %error);
                    BusinessError::AccountDeactivation
                }
            })?;

        row.try_into().map_err(|error| {
            tracing::error!(event = "AccountService.deactivate.error", %error);
            BusinessError::AccountDeactivation
        })
    }

    /// Whether the account is blocked for gated operations.
    pub async fn is_blocked(&self, id: i64) -> BusinessResult<bool> {
        let account = self.find_one(id).await?;
        Ok(account.is_blocked())
    }
}

/// Account Operation Service - the append-only ledger
pub struct AccountOperationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountOperationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Append a ledger entry.
    pub async fn create_new(
        &self,
        account_id: i64,
        amount: Decimal,
        operation_type: OperationType,
    ) -> BusinessResult<Operation> {
        self.create_new_with(self.ctx.pool(), account_id, amount, operation_type, Utc::now())
            .await
    }

    /// Append a ledger entry through a caller-supplied executor, so the
    /// entry can share a transaction with the balance update it records.
    pub async fn create_new_with(
        &self,
        executor: impl sqlx::SqliteExecutor<'_>,
        account_id: i64,
        amount: Decimal,
        operation_type: OperationType,
        now: DateTime<Utc>,
    ) -> BusinessResult<Operation> {
        tracing::info!(
            event = "AccountOperationService.create_new",
            account_id,
            %amount,
            operation_type = %operation_type,
        );

        let row = OperationRepo::insert(executor, account_id, amount, operation_type, now)
            .await
            .map_err(|error| {
                tracing::error!(event = "AccountOperationService.create_new.error", %error);
                BusinessError::AccountOperationCreation
            })?;

        row.try_into().map_err(|error| {
            tracing::error!(event = "AccountOperationService.create_new.error", %error);
            BusinessError::AccountOperationCreation
        })
    }

    /// One page of ledger entries from the last `period` days, most recent
    /// first. Pages past the end clamp to the last page.
    pub async fn paginatedly_find_many(
        &self,
        account_id: i64,
        period_days: u64,
        page: u64,
        items_per_page: u64,
    ) -> BusinessResult<PaginatedOperations> {
        tracing::info!(
            event = "AccountOperationService.paginatedly_find_many",
            account_id,
            period_days,
            page,
            items_per_page,
        );

        let to = Utc::now();
        // Periods beyond the representable range clamp to all of history.
        let from = i64::try_from(period_days)
            .ok()
            .and_then(Duration::try_days)
            .and_then(|window| to.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let total = OperationRepo::count_in_window(self.ctx.pool(), account_id, from, to)
            .await
            .map_err(|error| {
                tracing::error!(
                    event = "AccountOperationService.paginatedly_find_many.error",
                    %error,
                );
                BusinessError::AccountOperationRecovery
            })?;

        let window = safe_offset(total as u64, page, items_per_page);

        let rows = OperationRepo::find_in_window(
            self.ctx.pool(),
            account_id,
            from,
            to,
            window.offset as i64,
            window.limit as i64,
        )
        .await
        .map_err(|error| {
            tracing::error!(
                event = "AccountOperationService.paginatedly_find_many.error",
                %error,
            );
            BusinessError::AccountOperationRecovery
        })?;

        let operations = rows
            .into_iter()
            .map(Operation::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| {
                tracing::error!(
                    event = "AccountOperationService.paginatedly_find_many.error",
                    %error,
                );
                BusinessError::AccountOperationRecovery
            })?;

        Ok(PaginatedOperations {
            operations,
            total_pages: window.total_pages,
        })
    }
}
