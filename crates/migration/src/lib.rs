pub use sea_orm_migration::prelude::*;

mod m20260610_090000_users;
mod m20260610_091000_houses;
mod m20260610_092000_tenants;
mod m20260610_093000_transactions;
mod m20260610_094000_messages;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260610_090000_users::Migration),
            Box::new(m20260610_091000_houses::Migration),
            Box::new(m20260610_092000_tenants::Migration),
            Box::new(m20260610_093000_transactions::Migration),
            Box::new(m20260610_094000_messages::Migration),
        ]
    }
}
