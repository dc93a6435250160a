use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    Engine, EngineError, Money, NewHouseCmd, NewUserCmd, OccupiedStatus, RentCycleCmd,
    RentCycleMode, RentReference, TenantCmd, TransactionKind, TransactionListFilter, UnitGroupCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (engine, db)
}

async fn house_and_group(engine: &Engine, units: u32, rent_minor: i64) -> Uuid {
    let house_id = engine
        .create_house(NewHouseCmd::new("Sunrise Court", "Tom Mboya St, Nakuru"))
        .await
        .unwrap();
    engine
        .create_unit_group(UnitGroupCmd::new(house_id, "Attic", "AT", units, rent_minor))
        .await
        .unwrap()
}

async fn tenant_with_unit(
    engine: &Engine,
    username: &str,
    unit_id: Uuid,
    lease_start: NaiveDate,
) -> Uuid {
    engine
        .create_user(NewUserCmd::new(username))
        .await
        .unwrap();
    engine
        .create_tenant(TenantCmd::new(username, lease_start).unit_id(unit_id))
        .await
        .unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn creating_a_group_creates_its_units() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 5, 5_000_00).await;

    let units = engine.list_units(group_id).await.unwrap();
    assert_eq!(units.len(), 5);
    for (index, unit) in units.iter().enumerate() {
        let ordinal = index as u32 + 1;
        assert_eq!(unit.ordinal, ordinal);
        assert_eq!(unit.name, format!("Attic Room {ordinal}"));
        assert_eq!(unit.abbreviated_name, format!("ATR{ordinal}"));
        assert_eq!(unit.occupied_status, OccupiedStatus::Vacant);
        assert_eq!(unit.last_rent_payment_date, None);
    }
}

#[tokio::test]
async fn growing_a_group_appends_sequential_ordinals() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 5, 5_000_00).await;

    let before = engine.list_units(group_id).await.unwrap();

    let created = engine.set_number_of_units(group_id, 8).await.unwrap();
    assert_eq!(created, 3);

    let after = engine.list_units(group_id).await.unwrap();
    assert_eq!(after.len(), 8);
    assert_eq!(
        after.iter().map(|u| u.ordinal).collect::<Vec<_>>(),
        (1..=8).collect::<Vec<_>>()
    );
    assert_eq!(after[5].name, "Attic Room 6");
    assert_eq!(after[7].name, "Attic Room 8");

    // The original five rows are untouched.
    for (old, new) in before.iter().zip(after.iter()) {
        assert_eq!(old, new);
    }
}

#[tokio::test]
async fn lowering_the_target_never_deletes_units() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 5, 5_000_00).await;

    let created = engine.set_number_of_units(group_id, 3).await.unwrap();
    assert_eq!(created, 0);

    let units = engine.list_units(group_id).await.unwrap();
    assert_eq!(units.len(), 5);

    let group = engine.unit_group(group_id).await.unwrap();
    assert_eq!(group.number_of_units, 3);
}

#[tokio::test]
async fn invalid_name_format_is_rejected_at_save() {
    let (engine, _db) = engine_with_db().await;
    let house_id = engine
        .create_house(NewHouseCmd::new("Sunrise Court", "Tom Mboya St, Nakuru"))
        .await
        .unwrap();

    let err = engine
        .create_unit_group(
            UnitGroupCmd::new(house_id, "Attic", "AT", 5, 5_000_00)
                .unit_name_format("%(floor)s Room %(unit_number)s"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // Nothing was persisted.
    assert!(engine.list_unit_groups().await.unwrap().is_empty());
}

#[tokio::test]
async fn assigning_and_releasing_a_tenant_flips_occupancy() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 2, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();
    let lease_start = date(2026, 7, 1);

    let tenant_id = tenant_with_unit(&engine, "alice", units[0].id, lease_start).await;

    let unit = engine.unit(units[0].id).await.unwrap();
    assert_eq!(unit.occupied_status, OccupiedStatus::Occupied);
    // Billing baseline stamped on first occupancy.
    assert_eq!(unit.last_rent_payment_date, Some(lease_start));

    engine.release_unit(tenant_id).await.unwrap();
    let unit = engine.unit(units[0].id).await.unwrap();
    assert_eq!(unit.occupied_status, OccupiedStatus::Vacant);

    let tenant = engine.tenant(tenant_id).await.unwrap();
    assert_eq!(tenant.unit_id, None);
}

#[tokio::test]
async fn a_unit_backs_at_most_one_tenant() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 2, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();
    let lease_start = date(2026, 7, 1);

    tenant_with_unit(&engine, "alice", units[0].id, lease_start).await;

    engine.create_user(NewUserCmd::new("bob")).await.unwrap();
    let err = engine
        .create_tenant(TenantCmd::new("bob", lease_start).unit_id(units[0].id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // Bob never got a tenancy row either.
    assert!(matches!(
        engine.tenant_for("bob").await.unwrap_err(),
        EngineError::NotFound(_)
    ));
}

#[tokio::test]
async fn moving_a_tenant_releases_the_previous_unit() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 2, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();
    let lease_start = date(2026, 7, 1);

    let tenant_id = tenant_with_unit(&engine, "alice", units[0].id, lease_start).await;

    engine
        .assign_unit(tenant_id, units[1].id, date(2026, 7, 15))
        .await
        .unwrap();

    assert_eq!(
        engine.unit(units[0].id).await.unwrap().occupied_status,
        OccupiedStatus::Vacant
    );
    assert_eq!(
        engine.unit(units[1].id).await.unwrap().occupied_status,
        OccupiedStatus::Occupied
    );
}

#[tokio::test]
async fn closed_units_stay_closed_when_released() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 1, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();

    let tenant_id = tenant_with_unit(&engine, "alice", units[0].id, date(2026, 7, 1)).await;

    engine.close_unit(units[0].id).await.unwrap();
    engine.release_unit(tenant_id).await.unwrap();

    assert_eq!(
        engine.unit(units[0].id).await.unwrap().occupied_status,
        OccupiedStatus::Closed
    );
}

#[tokio::test]
async fn removing_a_tenant_keeps_the_unit() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 1, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();

    let tenant_id = tenant_with_unit(&engine, "alice", units[0].id, date(2026, 7, 1)).await;
    engine.remove_tenant(tenant_id).await.unwrap();

    assert!(matches!(
        engine.tenant(tenant_id).await.unwrap_err(),
        EngineError::NotFound(_)
    ));
    let unit = engine.unit(units[0].id).await.unwrap();
    assert_eq!(unit.occupied_status, OccupiedStatus::Vacant);
}

#[tokio::test]
async fn rent_cycle_charges_every_occupied_unit() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 5, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();
    let lease_start = date(2026, 7, 1);

    for (unit, username) in units.iter().take(3).zip(["alice", "bob", "carol"]) {
        tenant_with_unit(&engine, username, unit.id, lease_start).await;
    }

    let as_of = date(2026, 8, 1);
    let report = engine
        .process_rent_payments(
            RentCycleCmd::new(group_id, as_of).mode(RentCycleMode::Demo),
        )
        .await
        .unwrap();

    assert_eq!(report.charged.len(), 3);
    assert_eq!(report.failures.len(), 0);
    assert!(report.charged.iter().all(|c| c.amount == Money::new(5_000_00)));

    for username in ["alice", "bob", "carol"] {
        let account = engine.account_for(username).await.unwrap();
        assert_eq!(account.balance, Money::new(-5_000_00));
        assert_eq!(account.debt_amount(), Money::new(5_000_00));

        let rents = engine
            .list_transactions(
                username,
                TransactionListFilter::default().kind(TransactionKind::RentPayment),
            )
            .await
            .unwrap();
        assert_eq!(rents.len(), 1);
        assert_eq!(rents[0].amount, Money::new(5_000_00));

        // Each tenant got a payment notification.
        let tenant = engine.tenant_for(username).await.unwrap();
        let messages = engine.list_messages(tenant.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].category, "Payment");
        assert_eq!(messages[0].subject, "Monthly Rent");
    }

    // Charged units and the group advanced their payment date; the vacant
    // units are untouched.
    let units = engine.list_units(group_id).await.unwrap();
    for unit in units.iter().take(3) {
        assert_eq!(unit.last_rent_payment_date, Some(as_of));
    }
    for unit in units.iter().skip(3) {
        assert_eq!(unit.last_rent_payment_date, None);
        assert_eq!(unit.occupied_status, OccupiedStatus::Vacant);
    }
    let group = engine.unit_group(group_id).await.unwrap();
    assert_eq!(group.last_rent_payment_date, Some(as_of));
}

#[tokio::test]
async fn demo_rerun_duplicates_charges_by_design() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 1, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();
    tenant_with_unit(&engine, "alice", units[0].id, date(2026, 7, 1)).await;

    let as_of = date(2026, 8, 1);
    for _ in 0..2 {
        let report = engine
            .process_rent_payments(
                RentCycleCmd::new(group_id, as_of).mode(RentCycleMode::Demo),
            )
            .await
            .unwrap();
        assert_eq!(report.charged.len(), 1);
    }

    // Demo mode has no due-date guard, so the same day is charged twice.
    let rents = engine
        .list_transactions(
            "alice",
            TransactionListFilter::default().kind(TransactionKind::RentPayment),
        )
        .await
        .unwrap();
    assert_eq!(rents.len(), 2);
    let account = engine.account_for("alice").await.unwrap();
    assert_eq!(account.balance, Money::new(-10_000_00));
}

#[tokio::test]
async fn standard_mode_charges_only_units_due_this_cycle() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 2, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();

    // Alice's baseline is one calendar month behind the cycle date; Bob paid
    // (moved in) within the cycle month already.
    tenant_with_unit(&engine, "alice", units[0].id, date(2026, 7, 1)).await;
    tenant_with_unit(&engine, "bob", units[1].id, date(2026, 8, 1)).await;

    let as_of = date(2026, 8, 1);
    let report = engine
        .process_rent_payments(RentCycleCmd::new(group_id, as_of))
        .await
        .unwrap();

    assert_eq!(report.charged.len(), 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.charged[0].unit_id, units[0].id);

    assert_eq!(
        engine.account_for("alice").await.unwrap().balance,
        Money::new(-5_000_00)
    );
    assert_eq!(engine.account_for("bob").await.unwrap().balance, Money::ZERO);

    assert_eq!(
        engine.unit(units[0].id).await.unwrap().last_rent_payment_date,
        Some(as_of)
    );
    assert_eq!(
        engine.unit(units[1].id).await.unwrap().last_rent_payment_date,
        Some(date(2026, 8, 1))
    );
}

#[tokio::test]
async fn rent_cycle_continues_past_a_failing_unit() {
    let (engine, db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 3, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();
    tenant_with_unit(&engine, "alice", units[0].id, date(2026, 7, 1)).await;
    tenant_with_unit(&engine, "carol", units[2].id, date(2026, 7, 1)).await;

    // Corrupt occupancy directly: a unit marked Occupied without any tenant.
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE units SET occupied_status = 'Occupied' WHERE id = ?",
        vec![units[1].id.to_string().into()],
    ))
    .await
    .unwrap();

    let as_of = date(2026, 8, 1);
    let report = engine
        .process_rent_payments(
            RentCycleCmd::new(group_id, as_of).mode(RentCycleMode::Demo),
        )
        .await
        .unwrap();

    // The healthy units committed, the broken one rolled back and was
    // reported.
    assert_eq!(report.charged.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].unit_id, units[1].id);

    assert_eq!(
        engine.account_for("alice").await.unwrap().balance,
        Money::new(-5_000_00)
    );
    assert_eq!(
        engine.account_for("carol").await.unwrap().balance,
        Money::new(-5_000_00)
    );

    // The failed unit's payment date did not move.
    assert_eq!(
        engine.unit(units[1].id).await.unwrap().last_rent_payment_date,
        None
    );
    // The group's own date still advanced at the end of the batch.
    let group = engine.unit_group(group_id).await.unwrap();
    assert_eq!(group.last_rent_payment_date, Some(as_of));
}

#[tokio::test]
async fn cash_sentinel_reference_is_configurable() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 1, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();
    tenant_with_unit(&engine, "alice", units[0].id, date(2026, 7, 1)).await;

    engine
        .process_rent_payments(
            RentCycleCmd::new(group_id, date(2026, 8, 1))
                .mode(RentCycleMode::Demo)
                .reference(RentReference::CashSentinel),
        )
        .await
        .unwrap();

    let rents = engine
        .list_transactions(
            "alice",
            TransactionListFilter::default().kind(TransactionKind::RentPayment),
        )
        .await
        .unwrap();
    assert_eq!(rents.len(), 1);
    assert_eq!(rents[0].reference, engine::CASH_REFERENCE);

    // The default mode generates a token that satisfies the reference rule.
    engine
        .process_rent_payments(
            RentCycleCmd::new(group_id, date(2026, 8, 2)).mode(RentCycleMode::Demo),
        )
        .await
        .unwrap();
    let rents = engine
        .list_transactions(
            "alice",
            TransactionListFilter::default().kind(TransactionKind::RentPayment),
        )
        .await
        .unwrap();
    let token = &rents
        .iter()
        .find(|tx| tx.reference != engine::CASH_REFERENCE)
        .unwrap()
        .reference;
    assert_eq!(token.len(), 8);
    assert!(token.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

#[tokio::test]
async fn extra_fees_attach_and_detach() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 1, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();
    let tenant_id = tenant_with_unit(&engine, "alice", units[0].id, date(2026, 7, 1)).await;

    let fee_id = engine
        .create_extra_fee(engine::ExtraFeeCmd::new("Garbage", "Weekly collection", 300_00))
        .await
        .unwrap();

    // Duplicate fee names conflict.
    let err = engine
        .create_extra_fee(engine::ExtraFeeCmd::new("Garbage", "Again", 100_00))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    engine.add_extra_fee(tenant_id, fee_id).await.unwrap();
    // Attaching twice is a no-op.
    engine.add_extra_fee(tenant_id, fee_id).await.unwrap();

    let fees = engine.list_extra_fees(tenant_id).await.unwrap();
    assert_eq!(fees.len(), 1);
    assert_eq!(fees[0].name, "Garbage");
    assert_eq!(fees[0].amount_minor, 300_00);

    engine.remove_extra_fee(tenant_id, fee_id).await.unwrap();
    assert!(engine.list_extra_fees(tenant_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn rent_notifications_can_be_marked_read() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 1, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();
    let tenant_id = tenant_with_unit(&engine, "alice", units[0].id, date(2026, 7, 1)).await;

    engine
        .process_rent_payments(
            RentCycleCmd::new(group_id, date(2026, 8, 1)).mode(RentCycleMode::Demo),
        )
        .await
        .unwrap();

    let messages = engine.list_messages(tenant_id).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert!(!messages[0].is_read);

    let message_id = messages[0].id.parse().unwrap();
    engine.mark_message_read(message_id).await.unwrap();

    let messages = engine.list_messages(tenant_id).await.unwrap();
    assert!(messages[0].is_read);
}

#[tokio::test]
async fn group_summary_reports_vacancy_and_caretakers() {
    let (engine, _db) = engine_with_db().await;
    let group_id = house_and_group(&engine, 4, 5_000_00).await;
    let units = engine.list_units(group_id).await.unwrap();
    tenant_with_unit(&engine, "alice", units[0].id, date(2026, 7, 1)).await;

    engine.create_user(NewUserCmd::new("caretaker")).await.unwrap();
    engine
        .set_caretakers(group_id, &["caretaker".to_string()])
        .await
        .unwrap();

    let summary = engine.unit_group_summary(group_id).await.unwrap();
    assert_eq!(summary.name, "Attic");
    assert_eq!(summary.abbreviated_name, "AT");
    assert_eq!(summary.number_of_units, 4);
    assert_eq!(summary.number_of_vacant_units, 3);
    assert_eq!(summary.monthly_rent, 5_000_00);
    assert_eq!(summary.caretakers_ids.len(), 1);
}
