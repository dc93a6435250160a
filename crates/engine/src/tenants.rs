//! Tenancy records binding a user to a unit.
//!
//! The unit reference is optional and unique: a unit backs at most one
//! tenant. The schema enforces this with a unique index and `ops::tenancy`
//! double-checks it to surface a conflict error instead of a bare database
//! failure.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tenant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub lease_start_date: NaiveDate,
    pub lease_end_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub user_id: String,
    #[sea_orm(unique)]
    pub unit_id: Option<String>,
    pub lease_start_date: Date,
    pub lease_end_date: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::units::Entity",
        from = "Column::UnitId",
        to = "super::units::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Units,
    #[sea_orm(has_many = "super::messages::Entity")]
    Messages,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Units.def()
    }
}

impl Related<super::messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Tenant> for ActiveModel {
    fn from(tenant: &Tenant) -> Self {
        Self {
            id: ActiveValue::Set(tenant.id.to_string()),
            user_id: ActiveValue::Set(tenant.user_id.to_string()),
            unit_id: ActiveValue::Set(tenant.unit_id.map(|id| id.to_string())),
            lease_start_date: ActiveValue::Set(tenant.lease_start_date),
            lease_end_date: ActiveValue::Set(tenant.lease_end_date),
            created_at: ActiveValue::NotSet,
        }
    }
}

impl TryFrom<Model> for Tenant {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("tenant".to_string()))?,
            user_id: Uuid::parse_str(&model.user_id)
                .map_err(|_| EngineError::NotFound("user".to_string()))?,
            unit_id: match model.unit_id {
                Some(raw) => Some(
                    Uuid::parse_str(&raw)
                        .map_err(|_| EngineError::NotFound("unit".to_string()))?,
                ),
                None => None,
            },
            lease_start_date: model.lease_start_date,
            lease_end_date: model.lease_end_date,
        })
    }
}
