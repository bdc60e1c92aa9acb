use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // short_code 作为主键，由数据库保证唯一性
        manager
            .create_table(
                Table::create()
                    .table(AliasRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AliasRecord::ShortCode)
                            .string_len(50)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AliasRecord::OriginalUrl).text().not_null())
                    .col(
                        ColumnDef::new(AliasRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AliasRecord::LastAccessedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 清理任务按 last_accessed_at 范围删除
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_alias_last_accessed_at")
                    .table(AliasRecord::Table)
                    .col(AliasRecord::LastAccessedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_alias_last_accessed_at")
                    .table(AliasRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(AliasRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AliasRecord {
    #[sea_orm(iden = "alias_records")]
    Table,
    ShortCode,
    OriginalUrl,
    CreatedAt,
    LastAccessedAt,
}
