use std::time::Duration;

use chrono::Utc;
use engine::{Engine, RentCycleCmd, RentCycleMode, RentReference};
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "kodisha={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let rent = settings.rent.clone();
    tasks.spawn(async move {
        let db = match parse_database(&settings.database).await {
            Ok(db) => db,
            Err(err) => {
                tracing::error!("failed to initialize database: {err}");
                return;
            }
        };

        let engine = match Engine::builder().database(db).build().await {
            Ok(engine) => engine,
            Err(err) => {
                tracing::error!("failed to build engine from database: {err}");
                return;
            }
        };

        run_rent_scheduler(engine, rent).await;
    });

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

/// Ticks on the configured interval and runs a rent cycle over every unit
/// group. Failures are logged and retried on the next tick; the scheduler
/// itself never stops.
async fn run_rent_scheduler(engine: Engine, rent: settings::Rent) {
    let mode = if rent.demo {
        RentCycleMode::Demo
    } else {
        RentCycleMode::Standard
    };
    let reference = if rent.cash_reference {
        RentReference::CashSentinel
    } else {
        RentReference::GeneratedToken
    };

    let period = Duration::from_secs(rent.check_interval_hours.max(1) * 3600);
    let mut ticks = tokio::time::interval(period);
    tracing::info!(
        interval_hours = rent.check_interval_hours,
        demo = rent.demo,
        "rent scheduler started"
    );

    loop {
        ticks.tick().await;
        let as_of = Utc::now().date_naive();

        let groups = match engine.list_unit_groups().await {
            Ok(groups) => groups,
            Err(err) => {
                tracing::error!("failed to list unit groups: {err}");
                continue;
            }
        };

        for group in groups {
            let cmd = RentCycleCmd::new(group.id, as_of)
                .mode(mode)
                .reference(reference);
            match engine.process_rent_payments(cmd).await {
                Ok(report) => {
                    if !report.failures.is_empty() {
                        tracing::warn!(
                            group = %group.name,
                            failed = report.failures.len(),
                            "rent cycle finished with failures; will retry next tick"
                        );
                    }
                }
                Err(err) => {
                    tracing::error!(group = %group.name, "rent cycle failed: {err}");
                }
            }
        }
    }
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
