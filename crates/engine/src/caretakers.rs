//! Join table linking unit groups to their caretaker users.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "unit_group_caretakers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub unit_group_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
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
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::unit_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UnitGroups.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
