//! Root of all SeaORM entity modules for the storefront tables.
//! Catalog entries (products, tutorials, services) are independent tables;
//! cart items, purchases and requests are owned by a user and cascade with it.

pub mod cart_item;
pub mod product;
pub mod purchase;
pub mod request;
pub mod service;
pub mod tutorial;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::cart_item::Entity as CartItem;
    pub use super::product::Entity as Product;
    pub use super::purchase::Entity as Purchase;
    pub use super::request::Entity as Request;
    pub use super::service::Entity as Service;
    pub use super::tutorial::Entity as Tutorial;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use crate::catalog::ItemType;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn create_user(db: &DatabaseConnection, username: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{}@example.com", username)),
            hashed_password: Set("not-a-real-hash".to_string()),
            is_admin: Set(false),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    async fn create_tutorial(db: &DatabaseConnection, title: &str) -> Result<tutorial::Model, DbErr> {
        tutorial::ActiveModel {
            title: Set(title.to_string()),
            content: Set("Step by step".to_string()),
            tutorial_type: Set("Cleaning".to_string()),
            price: Set(Decimal::new(999, 2)),
            posted_date: Set(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            video_url: Set(None),
            video_file: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let alice = create_user(&db, "alice").await?;

        let controller = product::ActiveModel {
            name: Set("PS5 Controller".to_string()),
            product_type: Set("Controller".to_string()),
            price: Set(Decimal::new(6999, 2)),
            description: Set("Official DualSense controller".to_string()),
            image: Set(product::PLACEHOLDER_IMAGE.to_string()),
            posted_date: Set(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let repair = service::ActiveModel {
            name: Set("Repair".to_string()),
            category: Set("Professional".to_string()),
            price: Set(Decimal::new(9999, 2)),
            description: Set("Hardware repair".to_string()),
            image: Set(None),
            video_url: Set(Some("https://videos.example.com/repair".to_string())),
            video_file: Set(None),
            posted_date: Set(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let guide = create_tutorial(&db, "SSD Upgrade").await?;

        purchase::ActiveModel {
            user_id: Set(alice.id),
            item_type: Set(ItemType::Service),
            item_id: Set(repair.id),
            quantity: Set(1),
            total_price: Set(Decimal::new(9999, 2)),
            purchase_date: Set(NaiveDate::from_ymd_opt(2024, 2, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        request::ActiveModel {
            user_id: Set(alice.id),
            title: Set("Fan replacement guide".to_string()),
            description: Set("Need a tutorial for replacing the fan".to_string()),
            status: Set(request::RequestStatus::Pending),
            posted_date: Set(NaiveDate::from_ymd_opt(2024, 2, 2).unwrap()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        cart_item::add_or_accumulate(&db, alice.id, ItemType::Product, controller.id, 2).await?;
        cart_item::add_or_accumulate(&db, alice.id, ItemType::Tutorial, guide.id, 1).await?;

        // Read back and verify data
        let products = Product::find().all(&db).await?;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_type, "Controller");
        assert_eq!(products[0].price, Decimal::new(6999, 2));

        let services = Service::find().all(&db).await?;
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].image, None);

        let purchases = alice.find_related(Purchase).all(&db).await?;
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].item_type, ItemType::Service);

        let requests = alice.find_related(Request).all(&db).await?;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].status, request::RequestStatus::Pending);

        let cart = CartItem::find()
            .filter(cart_item::Column::UserId.eq(alice.id))
            .all(&db)
            .await?;
        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_upsert_accumulates_quantity() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let alice = create_user(&db, "alice").await?;
        let guide = create_tutorial(&db, "Cleaning Guide").await?;

        let first = cart_item::add_or_accumulate(&db, alice.id, ItemType::Tutorial, guide.id, 2).await?;
        assert_eq!(first.quantity, 2);

        let second = cart_item::add_or_accumulate(&db, alice.id, ItemType::Tutorial, guide.id, 3).await?;
        assert_eq!(second.id, first.id);
        assert_eq!(second.quantity, 5);

        let rows = CartItem::find().all(&db).await?;
        assert_eq!(rows.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_upsert_keeps_owners_and_types_apart() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let alice = create_user(&db, "alice").await?;
        let bob = create_user(&db, "bob").await?;

        // Same numeric id, different item types and owners: four separate rows.
        cart_item::add_or_accumulate(&db, alice.id, ItemType::Tutorial, 1, 1).await?;
        cart_item::add_or_accumulate(&db, alice.id, ItemType::Product, 1, 1).await?;
        cart_item::add_or_accumulate(&db, bob.id, ItemType::Tutorial, 1, 4).await?;
        let bobs = cart_item::add_or_accumulate(&db, bob.id, ItemType::Product, 1, 7).await?;

        assert_eq!(bobs.user_id, bob.id);
        assert_eq!(bobs.quantity, 7);
        assert_eq!(CartItem::find().all(&db).await?.len(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_cart_row_rejected_by_unique_index() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let alice = create_user(&db, "alice").await?;

        let row = || cart_item::ActiveModel {
            user_id: Set(alice.id),
            item_type: Set(ItemType::Service),
            item_id: Set(3),
            quantity: Set(1),
            ..Default::default()
        };

        row().insert(&db).await?;
        assert!(row().insert(&db).await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_to_owned_rows() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let alice = create_user(&db, "alice").await?;
        let bob = create_user(&db, "bob").await?;

        cart_item::add_or_accumulate(&db, alice.id, ItemType::Product, 1, 1).await?;
        cart_item::add_or_accumulate(&db, bob.id, ItemType::Product, 1, 1).await?;
        request::ActiveModel {
            user_id: Set(alice.id),
            title: Set("Anything".to_string()),
            description: Set("Please".to_string()),
            status: Set(request::RequestStatus::Pending),
            posted_date: Set(NaiveDate::from_ymd_opt(2024, 5, 5).unwrap()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        alice.delete(&db).await?;

        let remaining = CartItem::find().all(&db).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user_id, bob.id);
        assert!(Request::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_item_type_exists_checks_matching_table() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let guide = create_tutorial(&db, "Cleaning Guide").await?;

        assert!(ItemType::Tutorial.exists(&db, guide.id).await?);
        assert!(!ItemType::Product.exists(&db, guide.id).await?);
        assert!(!ItemType::Tutorial.exists(&db, guide.id + 100).await?);

        Ok(())
    }
}
