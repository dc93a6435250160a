//! Houses group the unit groups managed by one property.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "houses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub picture: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::unit_groups::Entity")]
    UnitGroups,
}

impl Related<super::unit_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UnitGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
