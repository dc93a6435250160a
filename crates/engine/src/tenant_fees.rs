//! Join table linking tenants to the extra fees that apply to them.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "tenant_extra_fees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub extra_fee_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Tenants,
    #[sea_orm(
        belongs_to = "super::extra_fees::Entity",
        from = "Column::ExtraFeeId",
        to = "super::extra_fees::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ExtraFees,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl Related<super::extra_fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExtraFees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
