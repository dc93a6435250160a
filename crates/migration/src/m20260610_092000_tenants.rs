use sea_orm_migration::prelude::*;

use crate::m20260610_090000_users::Users;
use crate::m20260610_091000_houses::Units;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Tenants {
    Table,
    Id,
    UserId,
    UnitId,
    LeaseStartDate,
    LeaseEndDate,
    CreatedAt,
}

#[derive(Iden)]
enum ExtraFees {
    Table,
    Id,
    Name,
    Details,
    AmountMinor,
}

#[derive(Iden)]
enum TenantExtraFees {
    Table,
    TenantId,
    ExtraFeeId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tenants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tenants::UserId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    // Nullable and unique: a unit backs at most one tenant.
                    .col(ColumnDef::new(Tenants::UnitId).string().unique_key())
                    .col(ColumnDef::new(Tenants::LeaseStartDate).date().not_null())
                    .col(ColumnDef::new(Tenants::LeaseEndDate).date())
                    .col(ColumnDef::new(Tenants::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tenants-user_id")
                            .from(Tenants::Table, Tenants::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tenants-unit_id")
                            .from(Tenants::Table, Tenants::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExtraFees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExtraFees::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExtraFees::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ExtraFees::Details).string().not_null())
                    .col(
                        ColumnDef::new(ExtraFees::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TenantExtraFees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TenantExtraFees::TenantId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TenantExtraFees::ExtraFeeId)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(TenantExtraFees::TenantId)
                            .col(TenantExtraFees::ExtraFeeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tenant_extra_fees-tenant_id")
                            .from(TenantExtraFees::Table, TenantExtraFees::TenantId)
                            .to(Tenants::Table, Tenants::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tenant_extra_fees-extra_fee_id")
                            .from(TenantExtraFees::Table, TenantExtraFees::ExtraFeeId)
                            .to(ExtraFees::Table, ExtraFees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TenantExtraFees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExtraFees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await?;
        Ok(())
    }
}
