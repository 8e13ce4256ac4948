use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Venues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Venues::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Venues::Name).string().not_null())
                    .col(ColumnDef::new(Venues::City).string_len(120).not_null())
                    .col(ColumnDef::new(Venues::State).string_len(120).not_null())
                    .col(ColumnDef::new(Venues::Address).string_len(120).not_null())
                    .col(ColumnDef::new(Venues::Phone).string_len(120).not_null())
                    .col(ColumnDef::new(Venues::ImageLink).string_len(500).not_null())
                    .col(ColumnDef::new(Venues::FacebookLink).string_len(120).null())
                    .col(ColumnDef::new(Venues::Genres).json_binary().not_null())
                    .col(ColumnDef::new(Venues::Website).string_len(240).null())
                    .col(
                        ColumnDef::new(Venues::SeekingTalent)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Venues::SeekingDescription)
                            .string_len(500)
                            .not_null()
                            .default("We are looking for artists to perform here!"),
                    )
                    .to_owned(),
            )
            .await?;

        // Area grouping on the venue listing
        manager
            .create_index(
                Index::create()
                    .name("idx_venues_city_state")
                    .table(Venues::Table)
                    .col(Venues::City)
                    .col(Venues::State)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Venues::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Venues {
    Table,
    Id,
    Name,
    City,
    State,
    Address,
    Phone,
    ImageLink,
    FacebookLink,
    Genres,
    Website,
    SeekingTalent,
    SeekingDescription,
}
