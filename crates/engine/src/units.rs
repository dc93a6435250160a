//! Rentable units and their occupancy state machine.
//!
//! Each unit belongs to exactly one unit group and moves through three
//! states: Vacant (initial), Occupied (a tenant is assigned) and Closed
//! (administrative). Closed is never left automatically.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccupiedStatus {
    Occupied,
    #[default]
    Vacant,
    Closed,
}

impl OccupiedStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Occupied => "Occupied",
            Self::Vacant => "Vacant",
            Self::Closed => "Closed",
        }
    }
}

impl TryFrom<&str> for OccupiedStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Occupied" => Ok(Self::Occupied),
            "Vacant" => Ok(Self::Vacant),
            "Closed" => Ok(Self::Closed),
            other => Err(EngineError::Validation(format!(
                "invalid occupied status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub id: Uuid,
    pub unit_group_id: Uuid,
    pub ordinal: u32,
    pub name: String,
    pub abbreviated_name: String,
    pub occupied_status: OccupiedStatus,
    /// Billing baseline; unset until the unit is first occupied.
    pub last_rent_payment_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub unit_group_id: String,
    pub ordinal: i32,
    pub name: String,
    pub abbreviated_name: String,
    pub occupied_status: String,
    pub last_rent_payment_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::unit_groups::Entity",
        from = "Column::UnitGroupId",
        to = "super::unit_groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    UnitGroups,
    #[sea_orm(has_one = "super::tenants::Entity")]
    Tenants,
}

impl Related<super::unit_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UnitGroups.def()
    }
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Unit> for ActiveModel {
    fn from(unit: &Unit) -> Self {
        Self {
            id: ActiveValue::Set(unit.id.to_string()),
            unit_group_id: ActiveValue::Set(unit.unit_group_id.to_string()),
            ordinal: ActiveValue::Set(unit.ordinal as i32),
            name: ActiveValue::Set(unit.name.clone()),
            abbreviated_name: ActiveValue::Set(unit.abbreviated_name.clone()),
            occupied_status: ActiveValue::Set(unit.occupied_status.as_str().to_string()),
            last_rent_payment_date: ActiveValue::Set(unit.last_rent_payment_date),
        }
    }
}

impl TryFrom<Model> for Unit {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("unit".to_string()))?,
            unit_group_id: Uuid::parse_str(&model.unit_group_id)
                .map_err(|_| EngineError::NotFound("unit group".to_string()))?,
            ordinal: model.ordinal.max(0) as u32,
            name: model.name,
            abbreviated_name: model.abbreviated_name,
            occupied_status: OccupiedStatus::try_from(model.occupied_status.as_str())?,
            last_rent_payment_date: model.last_rent_payment_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            OccupiedStatus::Occupied,
            OccupiedStatus::Vacant,
            OccupiedStatus::Closed,
        ] {
            assert_eq!(OccupiedStatus::try_from(status.as_str()).unwrap(), status);
        }
        assert!(OccupiedStatus::try_from("Condemned").is_err());
    }

    #[test]
    fn default_status_is_vacant() {
        assert_eq!(OccupiedStatus::default(), OccupiedStatus::Vacant);
    }
}
