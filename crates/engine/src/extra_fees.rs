//! Named add-on fees chargeable to specific tenants.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "extra_fees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    pub details: String,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tenant_fees::Entity")]
    TenantFees,
}

impl Related<super::tenant_fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TenantFees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
