//! # Contabank Persistence
//!
//! Persistence layer for the account-management backend: SQLite accessed
//! through repository types, with the schema shipped as sqlx migrations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contabank_persistence::{Database, AccountRepo};
//!
//! let db = Database::init_with_migrations("sqlite:contabank.db?mode=rwc").await?;
//! let account = AccountRepo::get_by_id(db.pool(), 1).await?;
//! ```

pub mod error;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::schema::{AccountRow, OperationRow, OwnerRow};
pub use sqlite::{
    create_pool, init_database, run_migrations, AccountRepo, OperationRepo, OwnerRepo,
};

use sqlx::SqlitePool;

/// Database facade - owns the SQLite connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to an existing database
    pub async fn new(database_url: &str) -> PersistenceResult<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self { pool })
    }

    /// Create the database if missing and run migrations
    pub async fn init_with_migrations(database_url: &str) -> PersistenceResult<Self> {
        let pool = init_database(database_url).await?;
        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
