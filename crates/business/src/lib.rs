//! # Contabank Business
//!
//! Business logic layer for the account-management backend. Services wrap
//! the persistence repositories and translate persistence failures into
//! the domain error taxonomy:
//!
//! - `OwnerService`: owner registration, lookup and ownership checks
//! - `AccountService`: account creation, recovery and balance mutations
//! - `AccountOperationService`: the append-only operation ledger
//!
//! All services borrow a shared [`ServiceContext`] that carries the
//! database pool.

pub mod account;
pub mod owner;
pub mod services;

pub use account::{AccountOperationService, AccountService, PaginatedOperations};
pub use owner::OwnerService;
pub use services::ServiceContext;
