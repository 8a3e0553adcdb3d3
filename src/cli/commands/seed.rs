use anyhow::Result;
use chrono::Utc;
use model::entities::{product, request, service, tutorial, user};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use tracing::{info, trace, warn};

use super::initdb::{apply_migrations, connect};
use crate::auth::hash_password;

pub async fn seed(database_url: &str, admin_username: &str, admin_password: &str) -> Result<()> {
    trace!("Entering seed function");

    let db = connect(database_url).await?;
    apply_migrations(&db).await?;

    if seed_database(&db, admin_username, admin_password).await? {
        info!("Sample data inserted");
    }
    Ok(())
}

/// Inserts the admin account plus a small sample catalog in one transaction.
///
/// Returns `false` without writing anything when the admin already exists.
pub async fn seed_database(
    db: &DatabaseConnection,
    admin_username: &str,
    admin_password: &str,
) -> Result<bool> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(admin_username))
        .count(db)
        .await?;
    if existing > 0 {
        warn!("User '{}' already exists, skipping seed", admin_username);
        return Ok(false);
    }

    let today = Utc::now().date_naive();
    let txn = db.begin().await?;

    let admin = user::ActiveModel {
        username: Set(admin_username.to_string()),
        email: Set(format!("{}@example.com", admin_username)),
        hashed_password: Set(hash_password(admin_password)?),
        is_admin: Set(true),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    info!("Created admin user '{}' with ID {}", admin.username, admin.id);

    product::ActiveModel {
        name: Set("PS5 Controller".to_string()),
        product_type: Set("Controller".to_string()),
        price: Set(Decimal::new(6999, 2)),
        description: Set("Official DualSense controller for PS5.".to_string()),
        image: Set(product::PLACEHOLDER_IMAGE.to_string()),
        posted_date: Set(today),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    tutorial::ActiveModel {
        title: Set("PS5 Cleaning Guide".to_string()),
        content: Set("Step-by-step guide to clean your PS5 console.".to_string()),
        tutorial_type: Set("Cleaning".to_string()),
        price: Set(Decimal::new(999, 2)),
        posted_date: Set(today),
        video_url: Set(None),
        video_file: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let services = [
        (
            "PS5 Repair Service",
            "Professional",
            Decimal::new(9999, 2),
            "Professional repair for PS5 hardware issues.",
        ),
        (
            "Cleaning Kit",
            "Kits",
            Decimal::new(2999, 2),
            "Complete cleaning kit for PS5 maintenance.",
        ),
    ];
    for (name, category, price, description) in services {
        service::ActiveModel {
            name: Set(name.to_string()),
            category: Set(category.to_string()),
            price: Set(price),
            description: Set(description.to_string()),
            image: Set(None),
            video_url: Set(None),
            video_file: Set(None),
            posted_date: Set(today),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    request::ActiveModel {
        user_id: Set(admin.id),
        title: Set("PS5 Fan Replacement Guide".to_string()),
        description: Set("Need a tutorial for replacing the PS5 fan.".to_string()),
        status: Set(request::RequestStatus::Pending),
        posted_date: Set(today),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(true)
}
