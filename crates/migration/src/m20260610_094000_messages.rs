use sea_orm_migration::prelude::*;

use crate::m20260610_092000_tenants::Tenants;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum PersonalMessages {
    Table,
    Id,
    TenantId,
    Category,
    Subject,
    Content,
    IsRead,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PersonalMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PersonalMessages::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PersonalMessages::TenantId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PersonalMessages::Category)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PersonalMessages::Subject)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PersonalMessages::Content)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PersonalMessages::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PersonalMessages::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-personal_messages-tenant_id")
                            .from(PersonalMessages::Table, PersonalMessages::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-personal_messages-tenant_id")
                    .table(PersonalMessages::Table)
                    .col(PersonalMessages::TenantId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PersonalMessages::Table).to_owned())
            .await?;
        Ok(())
    }
}
