//! Unit groups: clusters of units sharing rent terms and naming rules.
//!
//! A group carries a target unit count and two validated name templates.
//! Persisting a group tops the unit rows up to the target with sequential
//! ordinals; lowering the target never deletes rows (see `ops::property`).

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine,
    template::{NameTemplate, Placeholder},
};

/// Placeholders accepted by `unit_name_format`.
pub const UNIT_NAME_PLACEHOLDERS: &[Placeholder] = &[Placeholder::Name, Placeholder::UnitNumber];

/// Placeholders accepted by `unit_abbreviated_name_format`.
pub const UNIT_ABBR_PLACEHOLDERS: &[Placeholder] =
    &[Placeholder::AbbreviatedName, Placeholder::UnitNumber];

pub const DEFAULT_UNIT_NAME_FORMAT: &str = "%(name)s Room %(unit_number)s";
pub const DEFAULT_UNIT_ABBR_FORMAT: &str = "%(abbreviated_name)sR%(unit_number)s";

/// A cluster of units within a house.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitGroup {
    pub id: Uuid,
    pub house_id: Uuid,
    pub name: String,
    pub abbreviated_name: String,
    pub description: Option<String>,
    pub number_of_units: u32,
    pub picture: Option<String>,
    pub monthly_rent: Money,
    pub deposit_amount: Money,
    pub unit_name_format: String,
    pub unit_abbreviated_name_format: String,
    pub last_rent_payment_date: Option<NaiveDate>,
}

impl UnitGroup {
    /// Parses and validates both name templates.
    ///
    /// Called when the group is saved; generation assumes the stored formats
    /// already passed here.
    pub fn validate_formats(&self) -> ResultEngine<()> {
        NameTemplate::parse(&self.unit_name_format, UNIT_NAME_PLACEHOLDERS)?;
        NameTemplate::parse(&self.unit_abbreviated_name_format, UNIT_ABBR_PLACEHOLDERS)?;
        Ok(())
    }

    pub fn generate_unit_name(&self, unit_number: u32) -> ResultEngine<String> {
        let template = NameTemplate::parse(&self.unit_name_format, UNIT_NAME_PLACEHOLDERS)?;
        Ok(template.render(&self.name, &self.abbreviated_name, unit_number))
    }

    pub fn generate_abbr_unit_name(&self, unit_number: u32) -> ResultEngine<String> {
        let template =
            NameTemplate::parse(&self.unit_abbreviated_name_format, UNIT_ABBR_PLACEHOLDERS)?;
        Ok(template.render(&self.name, &self.abbreviated_name, unit_number))
    }
}

/// JSON summary of a unit group as consumed by external layers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnitGroupSummary {
    pub id: Uuid,
    pub name: String,
    pub abbreviated_name: String,
    pub description: Option<String>,
    pub number_of_units: u32,
    pub number_of_vacant_units: u64,
    pub picture: Option<String>,
    pub deposit_amount: i64,
    pub monthly_rent: i64,
    pub caretakers_ids: Vec<Uuid>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "unit_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub house_id: String,
    pub name: String,
    pub abbreviated_name: String,
    pub description: Option<String>,
    pub number_of_units: i32,
    pub picture: Option<String>,
    pub monthly_rent_minor: i64,
    pub deposit_minor: i64,
    pub unit_name_format: String,
    pub unit_abbreviated_name_format: String,
    pub last_rent_payment_date: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::houses::Entity",
        from = "Column::HouseId",
        to = "super::houses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Houses,
    #[sea_orm(has_many = "super::units::Entity")]
    Units,
}

impl Related<super::houses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Houses.def()
    }
}

impl Related<super::units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Units.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&UnitGroup> for ActiveModel {
    fn from(group: &UnitGroup) -> Self {
        Self {
            id: ActiveValue::Set(group.id.to_string()),
            house_id: ActiveValue::Set(group.house_id.to_string()),
            name: ActiveValue::Set(group.name.clone()),
            abbreviated_name: ActiveValue::Set(group.abbreviated_name.clone()),
            description: ActiveValue::Set(group.description.clone()),
            number_of_units: ActiveValue::Set(group.number_of_units as i32),
            picture: ActiveValue::Set(group.picture.clone()),
            monthly_rent_minor: ActiveValue::Set(group.monthly_rent.minor()),
            deposit_minor: ActiveValue::Set(group.deposit_amount.minor()),
            unit_name_format: ActiveValue::Set(group.unit_name_format.clone()),
            unit_abbreviated_name_format: ActiveValue::Set(
                group.unit_abbreviated_name_format.clone(),
            ),
            last_rent_payment_date: ActiveValue::Set(group.last_rent_payment_date),
            created_at: ActiveValue::NotSet,
        }
    }
}

impl TryFrom<Model> for UnitGroup {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("unit group".to_string()))?,
            house_id: Uuid::parse_str(&model.house_id)
                .map_err(|_| EngineError::NotFound("house".to_string()))?,
            name: model.name,
            abbreviated_name: model.abbreviated_name,
            description: model.description,
            number_of_units: model.number_of_units.max(0) as u32,
            picture: model.picture,
            monthly_rent: Money::new(model.monthly_rent_minor),
            deposit_amount: Money::new(model.deposit_minor),
            unit_name_format: model.unit_name_format,
            unit_abbreviated_name_format: model.unit_abbreviated_name_format,
            last_rent_payment_date: model.last_rent_payment_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> UnitGroup {
        UnitGroup {
            id: Uuid::new_v4(),
            house_id: Uuid::new_v4(),
            name: "Attic".to_string(),
            abbreviated_name: "AT".to_string(),
            description: None,
            number_of_units: 5,
            picture: None,
            monthly_rent: Money::new(5000_00),
            deposit_amount: Money::new(1000_00),
            unit_name_format: DEFAULT_UNIT_NAME_FORMAT.to_string(),
            unit_abbreviated_name_format: DEFAULT_UNIT_ABBR_FORMAT.to_string(),
            last_rent_payment_date: None,
        }
    }

    #[test]
    fn generates_names_from_default_formats() {
        let group = group();
        assert_eq!(group.generate_unit_name(4).unwrap(), "Attic Room 4");
        assert_eq!(group.generate_abbr_unit_name(4).unwrap(), "ATR4");
    }

    #[test]
    fn validate_formats_rejects_unknown_placeholder() {
        let mut group = group();
        group.unit_name_format = "%(floor)s Room %(unit_number)s".to_string();
        assert!(group.validate_formats().is_err());
    }

    #[test]
    fn validate_formats_accepts_defaults() {
        assert!(group().validate_formats().is_ok());
    }
}
