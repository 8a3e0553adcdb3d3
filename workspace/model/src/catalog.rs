//! The three kinds of sellable catalog entries and lookups across them.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;

use crate::entities::{product, service, tutorial};

/// Which catalog table an `item_id` points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ItemType {
    #[sea_orm(string_value = "product")]
    Product,
    #[sea_orm(string_value = "tutorial")]
    Tutorial,
    #[sea_orm(string_value = "service")]
    Service,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Product => "product",
            ItemType::Tutorial => "tutorial",
            ItemType::Service => "service",
        }
    }

    /// Returns true when a row with `item_id` exists in this item type's table.
    pub async fn exists<C: ConnectionTrait>(self, db: &C, item_id: i32) -> Result<bool, DbErr> {
        let count = match self {
            ItemType::Product => product::Entity::find_by_id(item_id).count(db).await?,
            ItemType::Tutorial => tutorial::Entity::find_by_id(item_id).count(db).await?,
            ItemType::Service => service::Entity::find_by_id(item_id).count(db).await?,
        };
        Ok(count > 0)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown item type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownItemType(pub String);

impl fmt::Display for UnknownItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid item_type '{}': expected one of product, tutorial, service",
            self.0
        )
    }
}

impl std::error::Error for UnknownItemType {}

impl FromStr for ItemType {
    type Err = UnknownItemType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(ItemType::Product),
            "tutorial" => Ok(ItemType::Tutorial),
            "service" => Ok(ItemType::Service),
            other => Err(UnknownItemType(other.to_string())),
        }
    }
}
