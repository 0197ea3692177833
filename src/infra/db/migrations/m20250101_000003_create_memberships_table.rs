//! Migration: Create the memberships link table.
//!
//! Composite (user_id, org_id) primary key enforces pair uniqueness;
//! duplicate inserts resolve via ON CONFLICT DO NOTHING at the
//! repository layer.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;
use super::m20250101_000002_create_organisations_table::Organisations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Memberships::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Memberships::UserId).uuid().not_null())
                    .col(ColumnDef::new(Memberships::OrgId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(Memberships::UserId)
                            .col(Memberships::OrgId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memberships_user")
                            .from(Memberships::Table, Memberships::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memberships_org")
                            .from(Memberships::Table, Memberships::OrgId)
                            .to(Organisations::Table, Organisations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for the org-to-users direction; the primary key already
        // serves user-to-orgs lookups.
        manager
            .create_index(
                Index::create()
                    .name("idx_memberships_org_id")
                    .table(Memberships::Table)
                    .col(Memberships::OrgId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Memberships::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Memberships {
    Table,
    UserId,
    OrgId,
}
