use chrono::Utc;
use sea_orm::{ActiveValue, Database, DatabaseConnection, EntityTrait};

use engine::{
    CASH_REFERENCE, Engine, EngineError, Money, NewUserCmd, RecordTransactionCmd,
    TransactionKind, TransactionListFilter, TransactionMeans,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (engine, db)
}

#[tokio::test]
async fn create_user_creates_zero_balance_account() {
    let (engine, _db) = engine_with_db().await;

    engine.create_user(NewUserCmd::new("alice")).await.unwrap();

    let account = engine.account_for("alice").await.unwrap();
    assert_eq!(account.balance, Money::ZERO);
    assert_eq!(account.debt_amount(), Money::ZERO);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let (engine, _db) = engine_with_db().await;

    engine.create_user(NewUserCmd::new("alice")).await.unwrap();
    let err = engine
        .create_user(NewUserCmd::new("alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn balance_follows_signed_transaction_history() {
    let (engine, _db) = engine_with_db().await;
    engine.create_user(NewUserCmd::new("alice")).await.unwrap();

    engine
        .record_transaction(
            RecordTransactionCmd::new(
                "alice",
                TransactionKind::Deposit,
                TransactionMeans::Mpesa,
                10_000_00,
                Utc::now(),
            )
            .reference("QGH7TX81"),
        )
        .await
        .unwrap();
    engine
        .record_transaction(RecordTransactionCmd::new(
            "alice",
            TransactionKind::RentPayment,
            TransactionMeans::Cash,
            5_000_00,
            Utc::now(),
        ))
        .await
        .unwrap();
    engine
        .record_transaction(
            RecordTransactionCmd::new(
                "alice",
                TransactionKind::FeePayment,
                TransactionMeans::Bank,
                300_00,
                Utc::now(),
            )
            .reference("ch_99021"),
        )
        .await
        .unwrap();
    engine
        .record_transaction(RecordTransactionCmd::new(
            "alice",
            TransactionKind::Withdrawal,
            TransactionMeans::Cash,
            200_00,
            Utc::now(),
        ))
        .await
        .unwrap();

    let account = engine.account_for("alice").await.unwrap();
    assert_eq!(
        account.balance,
        Money::new(10_000_00 - 5_000_00 - 300_00 - 200_00)
    );
}

#[tokio::test]
async fn debt_amount_mirrors_negative_balance() {
    let (engine, _db) = engine_with_db().await;
    engine.create_user(NewUserCmd::new("alice")).await.unwrap();

    engine
        .record_transaction(RecordTransactionCmd::new(
            "alice",
            TransactionKind::RentPayment,
            TransactionMeans::Cash,
            5_000_00,
            Utc::now(),
        ))
        .await
        .unwrap();

    let account = engine.account_for("alice").await.unwrap();
    assert_eq!(account.balance, Money::new(-5_000_00));
    assert_eq!(account.debt_amount(), Money::new(5_000_00));
}

#[tokio::test]
async fn reference_rules_reject_before_any_write() {
    let (engine, _db) = engine_with_db().await;
    engine.create_user(NewUserCmd::new("alice")).await.unwrap();

    // Too short for a non-Cash means.
    let err = engine
        .record_transaction(
            RecordTransactionCmd::new(
                "alice",
                TransactionKind::Deposit,
                TransactionMeans::Mpesa,
                1_000_00,
                Utc::now(),
            )
            .reference("ab"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // Sentinel with a non-Cash means.
    let err = engine
        .record_transaction(
            RecordTransactionCmd::new(
                "alice",
                TransactionKind::Deposit,
                TransactionMeans::Mpesa,
                1_000_00,
                Utc::now(),
            )
            .reference(CASH_REFERENCE),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // Cash with a real reference instead of the sentinel.
    let err = engine
        .record_transaction(
            RecordTransactionCmd::new(
                "alice",
                TransactionKind::Deposit,
                TransactionMeans::Cash,
                1_000_00,
                Utc::now(),
            )
            .reference("QGH7TX81"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // No state was mutated by any of the rejected calls.
    let account = engine.account_for("alice").await.unwrap();
    assert_eq!(account.balance, Money::ZERO);
    let transactions = engine
        .list_transactions("alice", TransactionListFilter::default())
        .await
        .unwrap();
    assert!(transactions.is_empty());
}

#[tokio::test]
async fn amount_must_stay_within_ledger_bound() {
    let (engine, _db) = engine_with_db().await;
    engine.create_user(NewUserCmd::new("alice")).await.unwrap();

    let err = engine
        .record_transaction(RecordTransactionCmd::new(
            "alice",
            TransactionKind::Deposit,
            TransactionMeans::Cash,
            Money::MAX.minor() + 1,
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .record_transaction(RecordTransactionCmd::new(
            "alice",
            TransactionKind::Deposit,
            TransactionMeans::Cash,
            0,
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn persisted_transactions_cannot_be_edited() {
    let (engine, db) = engine_with_db().await;
    engine.create_user(NewUserCmd::new("alice")).await.unwrap();

    let tx_id = engine
        .record_transaction(
            RecordTransactionCmd::new(
                "alice",
                TransactionKind::Deposit,
                TransactionMeans::Mpesa,
                1_000_00,
                Utc::now(),
            )
            .reference("QGH7TX81"),
        )
        .await
        .unwrap();

    let model = engine::transactions::Entity::find_by_id(tx_id.to_string())
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    let mut active: engine::transactions::ActiveModel = model.into();
    active.notes = ActiveValue::Set(Some("rewritten".to_string()));
    let err = sea_orm::ActiveModelTrait::update(active, &db).await.unwrap_err();
    assert!(err.to_string().contains("immutable"));

    // The stored row is untouched.
    let model = engine::transactions::Entity::find_by_id(tx_id.to_string())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(model.notes, None);
}

#[tokio::test]
async fn list_transactions_applies_filters() {
    let (engine, _db) = engine_with_db().await;
    engine.create_user(NewUserCmd::new("alice")).await.unwrap();

    engine
        .record_transaction(
            RecordTransactionCmd::new(
                "alice",
                TransactionKind::Deposit,
                TransactionMeans::Mpesa,
                2_000_00,
                Utc::now(),
            )
            .reference("QGH7TX81"),
        )
        .await
        .unwrap();
    engine
        .record_transaction(RecordTransactionCmd::new(
            "alice",
            TransactionKind::RentPayment,
            TransactionMeans::Cash,
            1_000_00,
            Utc::now(),
        ))
        .await
        .unwrap();

    let all = engine
        .list_transactions("alice", TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let deposits = engine
        .list_transactions(
            "alice",
            TransactionListFilter::default().kind(TransactionKind::Deposit),
        )
        .await
        .unwrap();
    assert_eq!(deposits.len(), 1);
    assert_eq!(deposits[0].means, TransactionMeans::Mpesa);

    let cash = engine
        .list_transactions(
            "alice",
            TransactionListFilter::default().means(TransactionMeans::Cash),
        )
        .await
        .unwrap();
    assert_eq!(cash.len(), 1);
    assert_eq!(cash[0].reference, CASH_REFERENCE);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.account_for("nobody").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let err = engine
        .record_transaction(RecordTransactionCmd::new(
            "nobody",
            TransactionKind::Deposit,
            TransactionMeans::Cash,
            1_000_00,
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
