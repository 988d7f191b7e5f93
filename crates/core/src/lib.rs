//! # Contabank Core
//!
//! Pure domain layer for the account-management backend: CPF document
//! validation, pagination arithmetic, the Owner/Account/Operation types and
//! the business-error taxonomy. No I/O lives here.

pub mod account;
pub mod cpf;
pub mod error;
pub mod operation;
pub mod owner;
pub mod pagination;

pub use account::{Account, AccountType, NewAccount};
pub use cpf::Cpf;
pub use error::{BusinessError, BusinessResult};
pub use operation::{Operation, OperationType};
pub use owner::{NewOwner, Owner};
pub use pagination::{safe_offset, PageWindow};
