//! Service context shared by the business services.

use contabank_persistence::Database;
use sqlx::SqlitePool;

/// Context for business operations - carries database access
#[derive(Clone)]
pub struct ServiceContext {
    pool: SqlitePool,
}

impl ServiceContext {
    /// Create a new service context from the database facade
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Create from a pool directly
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
