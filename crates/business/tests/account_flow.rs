//! End-to-end service scenario: owners, a joint account, balance
//! mutations and the resulting statement.

use chrono::NaiveDate;
use contabank_business::{
    AccountOperationService, AccountService, OwnerService, ServiceContext,
};
use contabank_core::{AccountType, BusinessError, NewAccount, NewOwner, OperationType};
use contabank_persistence::run_migrations;
use rust_decimal_macros::dec;
use sqlx::sqlite::SqlitePoolOptions;

async fn test_ctx() -> ServiceContext {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    ServiceContext::from_pool(pool)
}

async fn register_owner(ctx: &ServiceContext, name: &str, document_number: &str) {
    OwnerService::new(ctx)
        .create_new(&NewOwner {
            name: name.to_string(),
            document_number: document_number.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1988, 9, 1).unwrap(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_joint_account_lifecycle() {
    let ctx = test_ctx().await;
    register_owner(&ctx, "Vasily Korpof", "83065825007").await;
    register_owner(&ctx, "Marta Korpof", "92236202016").await;

    let accounts = AccountService::new(&ctx);
    let ledger = AccountOperationService::new(&ctx);
    let owners = OwnerService::new(&ctx);

    let account = accounts
        .create_new(
            &NewAccount {
                balance: dec!(500),
                daily_withdrawal_limit: Some(dec!(300)),
                account_type: AccountType::Conjunta,
                is_active: true,
            },
            &[
                "83065825007".to_string(),
                "92236202016".to_string(),
            ],
        )
        .await
        .unwrap();

    // Both holders are authorized, a third party is not.
    assert!(owners
        .is_account_owner_authorized("83065825007", account.id)
        .await
        .unwrap());
    assert!(owners
        .is_account_owner_authorized("92236202016", account.id)
        .await
        .unwrap());

    // A few mutations.
    accounts
        .alter_balance(account.id, dec!(100), OperationType::Credit)
        .await
        .unwrap();
    accounts
        .alter_balance(account.id, dec!(50), OperationType::Debit)
        .await
        .unwrap();
    let current = accounts
        .alter_balance(account.id, dec!(25), OperationType::Debit)
        .await
        .unwrap();
    assert_eq!(current.balance, dec!(525));

    // The ledger mirrors every applied mutation, most recent first.
    let page = ledger
        .paginatedly_find_many(account.id, 1, 1, 10)
        .await
        .unwrap();
    assert_eq!(page.total_pages, 1);
    let amounts: Vec<_> = page
        .operations
        .iter()
        .map(|op| (op.operation_type, op.amount))
        .collect();
    assert_eq!(
        amounts,
        vec![
            (OperationType::Debit, dec!(25)),
            (OperationType::Debit, dec!(50)),
            (OperationType::Credit, dec!(100)),
        ]
    );

    // Blocking stops nothing at the service layer but flips the flag the
    // gateway checks.
    assert!(!accounts.is_blocked(account.id).await.unwrap());
    let blocked = accounts.deactivate(account.id).await.unwrap();
    assert!(blocked.is_blocked());
    assert!(accounts.is_blocked(account.id).await.unwrap());
}

#[tokio::test]
async fn test_rejected_mutations_leave_no_trace() {
    let ctx = test_ctx().await;
    register_owner(&ctx, "Vasily Korpof", "83065825007").await;

    let accounts = AccountService::new(&ctx);
    let account = accounts
        .create_new(
            &NewAccount {
                balance: dec!(150),
                daily_withdrawal_limit: None,
                account_type: AccountType::Corrente,
                is_active: true,
            },
            &["83065825007".to_string()],
        )
        .await
        .unwrap();

    let err = accounts
        .alter_balance(account.id, dec!(151), OperationType::Debit)
        .await
        .unwrap_err();
    assert_eq!(err, BusinessError::InsufficientAccountBalance);

    let after = accounts.find_one(account.id).await.unwrap();
    assert_eq!(after.balance, dec!(150));

    let page = AccountOperationService::new(&ctx)
        .paginatedly_find_many(account.id, 1, 1, 10)
        .await
        .unwrap();
    assert!(page.operations.is_empty());
}
