//! # Error Module
//!
//! The business-error taxonomy: a closed enum of domain-rule violations and
//! internal failures, each carrying a stable code and an HTTP status.
//! Dispatch is by matching on the variant, never by runtime type checks.

use thiserror::Error;

const BUSINESS_ERROR_CODE: &str = "account-management-error-";

/// Business and internal-service errors raised by the core services.
///
/// The `Display` text is the fixed, caller-safe description; raw collaborator
/// errors are logged at the point of translation and never carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusinessError {
    // === Owner errors ===
    #[error("The given owner is already registered")]
    OwnerAlreadyExists,

    #[error("Error while trying to create a new account owner")]
    OwnerCreation,

    #[error("Could not find the requested account owner")]
    OwnerNotFound,

    /// Unexpected persistence failure inside the owner store, distinct from
    /// "not authorized".
    #[error("Owner service internal failure")]
    OwnerService,

    // === Account errors ===
    #[error("Error while trying to create a new account")]
    AccountCreation,

    #[error("Error while trying to recover account information")]
    AccountRecovery,

    #[error("Could not find the requested account")]
    AccountNotFound,

    #[error("The given account type does not match the number of owners")]
    WrongAccountType,

    #[error("The account balance is insufficient for this operation")]
    InsufficientAccountBalance,

    #[error("Error while trying to alter the account balance")]
    AccountBalanceAlteration,

    #[error("Error while trying to block the account")]
    AccountDeactivation,

    // === Operation ledger errors ===
    #[error("Error while trying to record the account operation")]
    AccountOperationCreation,

    #[error("Error while trying to recover the account operations")]
    AccountOperationRecovery,

    // === Authorization errors ===
    #[error("Owner has no permission to access the account")]
    ForbiddenAccountAccess,

    #[error("The account is blocked")]
    BlockedAccount,
}

/// Result type alias for operations failing with a taxonomy member.
pub type BusinessResult<T> = Result<T, BusinessError>;

impl BusinessError {
    /// Stable string code exposed in error responses.
    pub fn code(&self) -> String {
        let suffix = match self {
            BusinessError::OwnerAlreadyExists => "owner-already-exists",
            BusinessError::OwnerCreation => "owner-creation",
            BusinessError::OwnerNotFound => "owner-not-found",
            BusinessError::OwnerService => "owner-service",
            BusinessError::AccountCreation => "account-creation",
            BusinessError::AccountRecovery => "account-recovery",
            BusinessError::AccountNotFound => "account-not-found",
            BusinessError::WrongAccountType => "wrong-account-type",
            BusinessError::InsufficientAccountBalance => "insufficient-account-balance",
            BusinessError::AccountBalanceAlteration => "account-balance-alteration",
            BusinessError::AccountDeactivation => "account-deactivation",
            BusinessError::AccountOperationCreation => "account-operation-creation",
            BusinessError::AccountOperationRecovery => "account-operation-recovery",
            BusinessError::ForbiddenAccountAccess => "forbidden-account-access",
            BusinessError::BlockedAccount => "blocked-account",
        };

        format!("{BUSINESS_ERROR_CODE}{suffix}")
    }

    /// HTTP status this error maps to at the edge.
    pub fn http_status(&self) -> u16 {
        match self {
            BusinessError::OwnerNotFound | BusinessError::AccountNotFound => 404,
            BusinessError::ForbiddenAccountAccess => 403,
            BusinessError::OwnerAlreadyExists
            | BusinessError::InsufficientAccountBalance
            | BusinessError::BlockedAccount => 409,
            BusinessError::WrongAccountType => 400,
            BusinessError::OwnerCreation
            | BusinessError::OwnerService
            | BusinessError::AccountCreation
            | BusinessError::AccountRecovery
            | BusinessError::AccountBalanceAlteration
            | BusinessError::AccountDeactivation
            | BusinessError::AccountOperationCreation
            | BusinessError::AccountOperationRecovery => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BusinessError::OwnerNotFound | BusinessError::AccountNotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_carry_the_stable_prefix() {
        assert_eq!(
            BusinessError::AccountCreation.code(),
            "account-management-error-account-creation"
        );
        assert_eq!(
            BusinessError::ForbiddenAccountAccess.code(),
            "account-management-error-forbidden-account-access"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(BusinessError::OwnerNotFound.http_status(), 404);
        assert_eq!(BusinessError::AccountNotFound.http_status(), 404);
        assert_eq!(BusinessError::ForbiddenAccountAccess.http_status(), 403);
        assert_eq!(BusinessError::BlockedAccount.http_status(), 409);
        assert_eq!(BusinessError::InsufficientAccountBalance.http_status(), 409);
        assert_eq!(BusinessError::OwnerAlreadyExists.http_status(), 409);
        assert_eq!(BusinessError::WrongAccountType.http_status(), 400);
        assert_eq!(BusinessError::AccountBalanceAlteration.http_status(), 500);
    }

    #[test]
    fn test_descriptions_are_fixed_phrases() {
        assert_eq!(
            BusinessError::InsufficientAccountBalance.to_string(),
            "The account balance is insufficient for this operation"
        );
        assert!(BusinessError::OwnerNotFound.is_not_found());
        assert!(!BusinessError::BlockedAccount.is_not_found());
    }
}
