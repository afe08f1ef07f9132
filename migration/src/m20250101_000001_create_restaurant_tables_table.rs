use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(RestaurantTables::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(RestaurantTables::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(RestaurantTables::RestaurantId).integer())
                .col(ColumnDef::new(RestaurantTables::Name).string().not_null())
                .col(ColumnDef::new(RestaurantTables::Token).string())
                .col(ColumnDef::new(RestaurantTables::Url).text())
                .col(ColumnDef::new(RestaurantTables::QrCodePath).text())
                .to_owned()
        ).await?;

        // Lookup key for the idempotent ensure-or-create; single-tenant rows
        // hold NULL restaurant_id
        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_restaurant_tables_restaurant_name")
                .table(RestaurantTables::Table)
                .col(RestaurantTables::RestaurantId)
                .col(RestaurantTables::Name)
                .unique()
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RestaurantTables::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RestaurantTables {
    Table,
    Id,
    RestaurantId,
    Name,
    Token,
    Url,
    QrCodePath,
}
