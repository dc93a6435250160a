use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, tenants, unit_groups, units};

mod ledger;
mod messages;
mod property;
mod rent;
mod tenancy;
mod users;

pub use ledger::TransactionListFilter;
pub use rent::{
    RentCharge, RentCycleCmd, RentCycleMode, RentCycleReport, RentFailure, RentReference,
};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) async fn require_user<C>(conn: &C, username: &str) -> ResultEngine<crate::users::Model>
where
    C: ConnectionTrait,
{
    crate::users::Entity::find()
        .filter(crate::users::Column::Username.eq(username))
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("user {username}")))
}

pub(crate) async fn require_unit<C>(conn: &C, unit_id: Uuid) -> ResultEngine<units::Model>
where
    C: ConnectionTrait,
{
    units::Entity::find_by_id(unit_id.to_string())
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("unit {unit_id}")))
}

pub(crate) async fn require_unit_group<C>(
    conn: &C,
    group_id: Uuid,
) -> ResultEngine<unit_groups::Model>
where
    C: ConnectionTrait,
{
    unit_groups::Entity::find_by_id(group_id.to_string())
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("unit group {group_id}")))
}

pub(crate) async fn require_tenant<C>(conn: &C, tenant_id: Uuid) -> ResultEngine<tenants::Model>
where
    C: ConnectionTrait,
{
    tenants::Entity::find_by_id(tenant_id.to_string())
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("tenant {tenant_id}")))
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
