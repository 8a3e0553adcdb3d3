use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// Image path used when a product is saved without one.
pub const PLACEHOLDER_IMAGE: &str = "/products/placeholder.jpg";

/// A physical item sold in the shop (controllers, accessories, kits).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Free-form product kind, e.g. "Controller".
    #[sea_orm(column_name = "type")]
    pub product_type: String,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub price: Decimal,
    pub description: String,
    pub image: String,
    pub posted_date: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
