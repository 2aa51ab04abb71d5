use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Description,
    Category,
    ReportType,
    PlaceOfResponsibility,
    Username,
    Image,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Username,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Items::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Items::Description).text().not_null())
                    .col(ColumnDef::new(Items::Category).string_len(255).not_null())
                    .col(ColumnDef::new(Items::ReportType).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Items::PlaceOfResponsibility)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Items::Username).string_len(150).not_null())
                    .col(ColumnDef::new(Items::Image).string_len(255).null())
                    .col(
                        ColumnDef::new(Items::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_username")
                            .from(Items::Table, Items::Username)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_items_username")
                    .table(Items::Table)
                    .col(Items::Username)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Admin claim routing filters on this column.
        manager
            .create_index(
                Index::create()
                    .name("idx_items_place_of_responsibility")
                    .table(Items::Table)
                    .col(Items::PlaceOfResponsibility)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await
    }
}
