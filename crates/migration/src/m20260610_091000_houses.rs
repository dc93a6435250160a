use sea_orm_migration::prelude::*;

use crate::m20260610_090000_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Houses {
    Table,
    Id,
    Name,
    Address,
    Description,
    Picture,
    CreatedAt,
}

#[derive(Iden)]
pub enum UnitGroups {
    Table,
    Id,
    HouseId,
    Name,
    AbbreviatedName,
    Description,
    NumberOfUnits,
    Picture,
    MonthlyRentMinor,
    DepositMinor,
    UnitNameFormat,
    UnitAbbreviatedNameFormat,
    LastRentPaymentDate,
    CreatedAt,
}

#[derive(Iden)]
pub enum Units {
    Table,
    Id,
    UnitGroupId,
    Ordinal,
    Name,
    AbbreviatedName,
    OccupiedStatus,
    LastRentPaymentDate,
}

#[derive(Iden)]
enum UnitGroupCaretakers {
    Table,
    UnitGroupId,
    UserId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Houses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Houses::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Houses::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Houses::Address).string().not_null())
                    .col(ColumnDef::new(Houses::Description).string())
                    .col(ColumnDef::new(Houses::Picture).string())
                    .col(ColumnDef::new(Houses::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UnitGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UnitGroups::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UnitGroups::HouseId).string().not_null())
                    .col(ColumnDef::new(UnitGroups::Name).string().not_null())
                    .col(
                        ColumnDef::new(UnitGroups::AbbreviatedName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UnitGroups::Description).string())
                    .col(
                        ColumnDef::new(UnitGroups::NumberOfUnits)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UnitGroups::Picture).string())
                    .col(
                        ColumnDef::new(UnitGroups::MonthlyRentMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UnitGroups::DepositMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UnitGroups::UnitNameFormat)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UnitGroups::UnitAbbreviatedNameFormat)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UnitGroups::LastRentPaymentDate).date())
                    .col(ColumnDef::new(UnitGroups::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-unit_groups-house_id")
                            .from(UnitGroups::Table, UnitGroups::HouseId)
                            .to(Houses::Table, Houses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-unit_groups-house_id")
                    .table(UnitGroups::Table)
                    .col(UnitGroups::HouseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Units::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Units::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Units::UnitGroupId).string().not_null())
                    .col(ColumnDef::new(Units::Ordinal).integer().not_null())
                    .col(ColumnDef::new(Units::Name).string().not_null())
                    .col(ColumnDef::new(Units::AbbreviatedName).string().not_null())
                    .col(ColumnDef::new(Units::OccupiedStatus).string().not_null())
                    .col(ColumnDef::new(Units::LastRentPaymentDate).date())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-units-unit_group_id")
                            .from(Units::Table, Units::UnitGroupId)
                            .to(UnitGroups::Table, UnitGroups::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-units-unit_group_id-ordinal")
                    .table(Units::Table)
                    .col(Units::UnitGroupId)
                    .col(Units::Ordinal)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-units-unit_group_id-occupied_status")
                    .table(Units::Table)
                    .col(Units::UnitGroupId)
                    .col(Units::OccupiedStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UnitGroupCaretakers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UnitGroupCaretakers::UnitGroupId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UnitGroupCaretakers::UserId)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UnitGroupCaretakers::UnitGroupId)
                            .col(UnitGroupCaretakers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-unit_group_caretakers-unit_group_id")
                            .from(
                                UnitGroupCaretakers::Table,
                                UnitGroupCaretakers::UnitGroupId,
                            )
                            .to(UnitGroups::Table, UnitGroups::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-unit_group_caretakers-user_id")
                            .from(UnitGroupCaretakers::Table, UnitGroupCaretakers::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UnitGroupCaretakers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Units::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UnitGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Houses::Table).to_owned())
            .await?;
        Ok(())
    }
}
