use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::HashedPassword))
                    .col(boolean(Users::IsAdmin).default(false))
                    .to_owned(),
            )
            .await?;

        // Create products table
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string(Products::Name))
                    .col(string(Products::Type))
                    .col(decimal(Products::Price).decimal_len(16, 4))
                    .col(string(Products::Description))
                    .col(string(Products::Image))
                    .col(date(Products::PostedDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_name")
                    .table(Products::Table)
                    .col(Products::Name)
                    .to_owned(),
            )
            .await?;

        // Create tutorials table
        manager
            .create_table(
                Table::create()
                    .table(Tutorials::Table)
                    .if_not_exists()
                    .col(pk_auto(Tutorials::Id))
                    .col(string(Tutorials::Title))
                    .col(text(Tutorials::Content))
                    .col(string(Tutorials::TutorialType))
                    .col(decimal(Tutorials::Price).decimal_len(16, 4))
                    .col(date(Tutorials::PostedDate))
                    .col(string_null(Tutorials::VideoUrl))
                    .col(string_null(Tutorials::VideoFile))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tutorials_title")
                    .table(Tutorials::Table)
                    .col(Tutorials::Title)
                    .to_owned(),
            )
            .await?;

        // Create services table
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(pk_auto(Services::Id))
                    .col(string(Services::Name))
                    .col(string(Services::Category))
                    .col(decimal(Services::Price).decimal_len(16, 4))
                    .col(string(Services::Description))
                    .col(string_null(Services::Image))
                    .col(string_null(Services::VideoUrl))
                    .col(string_null(Services::VideoFile))
                    .col(date(Services::PostedDate))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tutorials::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Username,
    Email,
    HashedPassword,
    IsAdmin,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Type,
    Price,
    Description,
    Image,
    PostedDate,
}

#[derive(DeriveIden)]
enum Tutorials {
    Table,
    Id,
    Title,
    Content,
    TutorialType,
    Price,
    PostedDate,
    VideoUrl,
    VideoFile,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
    Name,
    Category,
    Price,
    Description,
    Image,
    VideoUrl,
    VideoFile,
    PostedDate,
}
