use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::Set;
use tracing::{debug, instrument};

use crate::catalog::ItemType;

/// Largest quantity a single cart line may hold.
pub const MAX_QUANTITY: i32 = 10_000;

/// One line of a user's cart. At most one row exists per
/// (user_id, item_type, item_id); see [`add_or_accumulate`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub item_type: ItemType,
    pub item_id: i32,
    pub quantity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Puts `quantity` units of an item into a user's cart.
///
/// Runs as a single `INSERT ... ON CONFLICT DO UPDATE` against the unique
/// (user_id, item_type, item_id) index, so a duplicate add increments the
/// existing row instead of creating a second one, even under concurrent
/// requests. Returns the row as it stands after the write.
#[instrument(skip(db))]
pub async fn add_or_accumulate<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    item_type: ItemType,
    item_id: i32,
    quantity: i32,
) -> Result<Model, DbErr> {
    let row = ActiveModel {
        user_id: Set(user_id),
        item_type: Set(item_type),
        item_id: Set(item_id),
        quantity: Set(quantity),
        ..Default::default()
    };

    let affected = Entity::insert(row)
        .on_conflict(
            OnConflict::columns([Column::UserId, Column::ItemType, Column::ItemId])
                .value(
                    Column::Quantity,
                    Expr::col((Entity, Column::Quantity)).add(quantity),
                )
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    debug!("Cart upsert affected {} row(s)", affected);

    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::ItemType.eq(item_type))
        .filter(Column::ItemId.eq(item_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            DbErr::RecordNotFound(format!(
                "cart row for user {} / {} {} vanished after upsert",
                user_id, item_type, item_id
            ))
        })
}
