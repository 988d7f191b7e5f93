//! Application state

use contabank_business::ServiceContext;
use contabank_persistence::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ctx: ServiceContext,
}

impl AppState {
    pub fn new(db: &Database) -> Self {
        Self {
            ctx: ServiceContext::new(db),
        }
    }

    pub fn from_context(ctx: ServiceContext) -> Self {
        Self { ctx }
    }
}
