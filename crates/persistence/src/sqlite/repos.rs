//! Repository implementations for SQLite
//!
//! CRUD operations for owners, accounts, the ownership association and the
//! operations ledger. Writes use `RETURNING` so every statement stays
//! usable inside a caller-owned transaction.

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use chrono::{DateTime, Utc};
use contabank_core::{NewAccount, NewOwner, OperationType};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{SqliteExecutor, SqlitePool};
use std::str::FromStr;

// ============================================================================
// Owner Repository
// ============================================================================

/// Repository for the `owners` table and the ownership association
pub struct OwnerRepo;

impl OwnerRepo {
    /// Insert a new owner. A duplicate document number surfaces as
    /// `PersistenceError::UniqueViolation`.
    pub async fn insert(
        executor: impl SqliteExecutor<'_>,
        owner: &NewOwner,
        now: DateTime<Utc>,
    ) -> PersistenceResult<OwnerRow> {
        let row = sqlx::query_as::<_, OwnerRow>(
            r#"
            INSERT INTO owners (name, document_number, birth_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&owner.name)
        .bind(&owner.document_number)
        .bind(owner.birth_date)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    /// Find an owner by document number
    pub async fn get_by_document_number(
        executor: impl SqliteExecutor<'_>,
        document_number: &str,
    ) -> PersistenceResult<Option<OwnerRow>> {
        let row = sqlx::query_as::<_, OwnerRow>(
            "SELECT * FROM owners WHERE document_number = ?",
        )
        .bind(document_number)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Resolve a set of document numbers to owner rows
    pub async fn get_by_document_numbers(
        executor: impl SqliteExecutor<'_>,
        document_numbers: &[String],
    ) -> PersistenceResult<Vec<OwnerRow>> {
        if document_numbers.is_empty() {
            return Ok(Vec::new());
        }

        // sqlx sqlite has no array binds; expand the placeholder list.
        let placeholders = vec!["?"; document_numbers.len()].join(", ");
        let sql = format!(
            "SELECT * FROM owners WHERE document_number IN ({placeholders})"
        );

        let mut query = sqlx::query_as::<_, OwnerRow>(&sql);
        for document_number in document_numbers {
            query = query.bind(document_number);
        }

        let rows = query.fetch_all(executor).await?;
        Ok(rows)
    }

    /// Account ids associated with an owner
    pub async fn owned_account_ids(
        executor: impl SqliteExecutor<'_>,
        owner_id: i64,
    ) -> PersistenceResult<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT account_id FROM account_owners WHERE owner_id = ?",
        )
        .bind(owner_id)
        .fetch_all(executor)
        .await?;
        Ok(ids)
    }
}

// ============================================================================
// Account Repository
// ============================================================================

/// Repository for the `accounts` table
pub struct AccountRepo;

impl AccountRepo {
    /// Fetch an account by id
    pub async fn get_by_id(
        executor: impl SqliteExecutor<'_>,
        id: i64,
    ) -> PersistenceResult<AccountRow> {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Account", id))
    }

    /// Create an account together with its ownership associations, in one
    /// transaction.
    pub async fn create_with_owners(
        pool: &SqlitePool,
        account: &NewAccount,
        owner_ids: &[i64],
        now: DateTime<Utc>,
    ) -> PersistenceResult<AccountRow> {
        let mut tx = pool.begin().await?;

        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (balance, daily_withdrawal_limit, is_active, type, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(account.balance.to_string())
        .bind(account.daily_withdrawal_limit.map(|limit| limit.to_string()))
        .bind(account.is_active)
        .bind(account.account_type.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for owner_id in owner_ids {
            sqlx::query("INSERT INTO account_owners (account_id, owner_id) VALUES (?, ?)")
                .bind(row.id)
                .bind(owner_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    /// Compare-and-swap balance update: only writes when the stored balance
    /// still equals `expected_balance`. A miss means a concurrent writer got
    /// there first and surfaces as `UpdateConflict` so the caller can retry.
    pub async fn update_balance_guarded(
        executor: impl SqliteExecutor<'_>,
        id: i64,
        expected_balance: Decimal,
        new_balance: Decimal,
        now: DateTime<Utc>,
    ) -> PersistenceResult<AccountRow> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts
            SET balance = ?, updated_at = ?
            WHERE id = ? AND balance = ?
            RETURNING *
            "#,
        )
        .bind(new_balance.to_string())
        .bind(now)
        .bind(id)
        .bind(expected_balance.to_string())
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| PersistenceError::update_conflict("Account", id))
    }

    /// Unconditionally mark an account inactive
    pub async fn deactivate(
        executor: impl SqliteExecutor<'_>,
        id: i64,
        now: DateTime<Utc>,
    ) -> PersistenceResult<AccountRow> {
        sqlx::query_as::<_, AccountRow>(
            "UPDATE accounts SET is_active = 0, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(now)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| PersistenceError::not_found("Account", id))
    }
}

// ============================================================================
// Operation Repository
// ============================================================================

/// Repository for the `operations` ledger table. Rows are insert-only.
pub struct OperationRepo;

impl OperationRepo {
    /// Append a ledger entry
    pub async fn insert(
        executor: impl SqliteExecutor<'_>,
        account_id: i64,
        amount: Decimal,
        operation_type: OperationType,
        now: DateTime<Utc>,
    ) -> PersistenceResult<OperationRow> {
        let row = sqlx::query_as::<_, OperationRow>(
            r#"
            INSERT INTO operations (account_id, amount, type, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(amount.to_string())
        .bind(operation_type.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    /// Count ledger entries for an account inside a time window
    pub async fn count_in_window(
        executor: impl SqliteExecutor<'_>,
        account_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> PersistenceResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM operations
            WHERE account_id = ? AND created_at >= ? AND created_at <= ?
            "#,
        )
        .bind(account_id)
        .bind(from)
        .bind(to)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    /// Fetch one page of ledger entries inside a time window, most recent
    /// first.
    pub async fn find_in_window(
        executor: impl SqliteExecutor<'_>,
        account_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        offset: i64,
        limit: i64,
    ) -> PersistenceResult<Vec<OperationRow>> {
        let rows = sqlx::query_as::<_, OperationRow>(
            r#"
            SELECT * FROM operations
            WHERE account_id = ? AND created_at >= ? AND created_at <= ?
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(account_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Create a connection pool
pub async fn create_pool(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = SqlitePool::connect(database_url).await?;
    Ok(pool)
}

/// Run migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Create the database if missing and bring the schema up to date
pub async fn init_database(database_url: &str) -> PersistenceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(sqlx::Error::from)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use contabank_core::AccountType;
    use rust_decimal_macros::dec;

    async fn test_pool() -> SqlitePool {
        // A single connection keeps the in-memory database alive and shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn new_owner(document_number: &str) -> NewOwner {
        NewOwner {
            name: "Vasily Korpof".to_string(),
            document_number: document_number.to_string(),
            birth_date: chrono::NaiveDate::from_ymd_opt(1988, 9, 1).unwrap(),
        }
    }

    fn new_account(balance: Decimal, account_type: AccountType) -> NewAccount {
        NewAccount {
            balance,
            daily_withdrawal_limit: None,
            account_type,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_owner_insert_and_lookup() {
        let pool = test_pool().await;
        let now = Utc::now();

        let inserted = OwnerRepo::insert(&pool, &new_owner("83065825007"), now)
            .await
            .unwrap();
        assert!(inserted.id > 0);

        let found = OwnerRepo::get_by_document_number(&pool, "83065825007")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, inserted.id);
        assert_eq!(found.name, "Vasily Korpof");

        let missing = OwnerRepo::get_by_document_number(&pool, "92236202016")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_document_number_is_a_unique_violation() {
        let pool = test_pool().await;
        let now = Utc::now();

        OwnerRepo::insert(&pool, &new_owner("83065825007"), now)
            .await
            .unwrap();
        let err = OwnerRepo::insert(&pool, &new_owner("83065825007"), now)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_account_creation_links_owners() {
        let pool = test_pool().await;
        let now = Utc::now();

        let first = OwnerRepo::insert(&pool, &new_owner("83065825007"), now)
            .await
            .unwrap();
        let second = OwnerRepo::insert(&pool, &new_owner("92236202016"), now)
            .await
            .unwrap();

        let account = AccountRepo::create_with_owners(
            &pool,
            &new_account(dec!(500), AccountType::Conjunta),
            &[first.id, second.id],
            now,
        )
        .await
        .unwrap();

        assert_eq!(
            OwnerRepo::owned_account_ids(&pool, first.id).await.unwrap(),
            vec![account.id]
        );
        assert_eq!(
            OwnerRepo::owned_account_ids(&pool, second.id).await.unwrap(),
            vec![account.id]
        );
    }

    #[tokio::test]
    async fn test_guarded_balance_update() {
        let pool = test_pool().await;
        let now = Utc::now();

        let owner = OwnerRepo::insert(&pool, &new_owner("83065825007"), now)
            .await
            .unwrap();
        let account = AccountRepo::create_with_owners(
            &pool,
            &new_account(dec!(150), AccountType::Corrente),
            &[owner.id],
            now,
        )
        .await
        .unwrap();

        let updated = AccountRepo::update_balance_guarded(
            &pool,
            account.id,
            dec!(150),
            dec!(160),
            now,
        )
        .await
        .unwrap();
        assert_eq!(updated.balance, "160");

        // Stale expectation misses the predicate.
        let err = AccountRepo::update_balance_guarded(
            &pool,
            account.id,
            dec!(150),
            dec!(170),
            now,
        )
        .await
        .unwrap_err();
        assert!(err.is_update_conflict());
    }

    #[tokio::test]
    async fn test_deactivate() {
        let pool = test_pool().await;
        let now = Utc::now();

        let owner = OwnerRepo::insert(&pool, &new_owner("83065825007"), now)
            .await
            .unwrap();
        let account = AccountRepo::create_with_owners(
            &pool,
            &new_account(dec!(0), AccountType::Poupanca),
            &[owner.id],
            now,
        )
        .await
        .unwrap();
        assert!(account.is_active);

        let blocked = AccountRepo::deactivate(&pool, account.id, now).await.unwrap();
        assert!(!blocked.is_active);

        let err = AccountRepo::deactivate(&pool, 999, now).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_init_database_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contabank.db");
        let url = format!("sqlite:{}", path.display());

        let pool = init_database(&url).await.unwrap();
        let owner = OwnerRepo::insert(&pool, &new_owner("83065825007"), Utc::now())
            .await
            .unwrap();
        assert!(owner.id > 0);
        assert!(path.exists());
        pool.close().await;
    }

    #[tokio::test]
    async fn test_operation_window_queries() {
        let pool = test_pool().await;
        let now = Utc::now();

        let owner = OwnerRepo::insert(&pool, &new_owner("83065825007"), now)
            .await
            .unwrap();
        let account = AccountRepo::create_with_owners(
            &pool,
            &new_account(dec!(1000), AccountType::Corrente),
            &[owner.id],
            now,
        )
        .await
        .unwrap();

        for day_offset in 0..4 {
            OperationRepo::insert(
                &pool,
                account.id,
                dec!(10),
                OperationType::Credit,
                now - Duration::days(day_offset),
            )
            .await
            .unwrap();
        }

        let from = now - Duration::days(2);
        let count = OperationRepo::count_in_window(&pool, account.id, from, now)
            .await
            .unwrap();
        assert_eq!(count, 3);

        let rows = OperationRepo::find_in_window(&pool, account.id, from, now, 0, 10)
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
        // Most recent first
        assert!(rows[0].created_at >= rows[1].created_at);
        assert!(rows[1].created_at >= rows[2].created_at);
    }
}
