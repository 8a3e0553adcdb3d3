use axum::{extract::State, http::StatusCode, response::Json};
use model::catalog::ItemType;
use model::entities::cart_item;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppPath};
use crate::handlers::{cart_quantity_exceeded, ensure_cart_quantity};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for putting an item into the cart
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddCartItemRequest {
    /// One of `product`, `tutorial`, `service`
    #[schema(example = "tutorial")]
    pub item_type: String,
    pub item_id: i32,
    /// Units to add (default 1); added to the existing line when present.
    /// A line never holds more than 10000 units.
    pub quantity: Option<i32>,
}

/// Request body for changing a cart line's quantity
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

/// Cart line response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItemResponse {
    pub id: i32,
    pub user_id: i32,
    pub item_type: String,
    pub item_id: i32,
    pub quantity: i32,
}

impl From<cart_item::Model> for CartItemResponse {
    fn from(model: cart_item::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            item_type: model.item_type.to_string(),
            item_id: model.item_id,
            quantity: model.quantity,
        }
    }
}

/// Looks up a cart line owned by `user_id`; other users' lines read as absent.
async fn find_owned_line(
    state: &AppState,
    user_id: i32,
    cart_item_id: i32,
) -> ApiResult<cart_item::Model> {
    cart_item::Entity::find_by_id(cart_item_id)
        .filter(cart_item::Column::UserId.eq(user_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Cart item {} not found for user {}", cart_item_id, user_id);
            ApiError::NotFound("Cart item not found".to_string())
        })
}

/// List the caller's cart
#[utoipa::path(
    get,
    path = "/cart",
    tag = "cart",
    responses(
        (status = 200, description = "Cart retrieved successfully", body = ApiResponse<Vec<CartItemResponse>>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = current.id()))]
pub async fn list_cart(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<CartItemResponse>>>> {
    let lines = cart_item::Entity::find()
        .filter(cart_item::Column::UserId.eq(current.id()))
        .order_by_asc(cart_item::Column::Id)
        .all(&state.db)
        .await?;

    debug!("User {} has {} cart lines", current.id(), lines.len());
    Ok(Json(ApiResponse::new(
        lines.into_iter().map(CartItemResponse::from).collect(),
        "Cart retrieved successfully",
    )))
}

/// Add an item to the caller's cart
///
/// Adding an item that is already in the cart increases that line's quantity
/// instead of creating a second line. Answers 201 when a new line was created
/// and 200 when an existing one was incremented.
#[utoipa::path(
    post,
    path = "/cart",
    tag = "cart",
    request_body = AddCartItemRequest,
    responses(
        (status = 201, description = "Item added to cart", body = ApiResponse<CartItemResponse>),
        (status = 200, description = "Existing cart line incremented", body = ApiResponse<CartItemResponse>),
        (status = 400, description = "Invalid item type or quantity", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Catalog item not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(request): AppJson<AddCartItemRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CartItemResponse>>)> {
    trace!("Entering add_to_cart function");

    let item_type: ItemType = request.item_type.parse()?;
    let quantity = request.quantity.unwrap_or(1);
    ensure_cart_quantity(quantity)?;

    let txn = state.db.begin().await?;

    if !item_type.exists(&txn, request.item_id).await? {
        warn!("Cannot add missing {} {} to cart", item_type, request.item_id);
        return Err(ApiError::NotFound(format!(
            "{} {} not found",
            item_type, request.item_id
        )));
    }

    let line = cart_item::add_or_accumulate(&txn, current.id(), item_type, request.item_id, quantity)
        .await?;
    if line.quantity > cart_item::MAX_QUANTITY {
        warn!(
            "Cart line {} would hold {} units, rolling back",
            line.id, line.quantity
        );
        txn.rollback().await?;
        return Err(cart_quantity_exceeded());
    }
    txn.commit().await?;

    // Existing lines hold at least one unit, so a merged line always ends
    // up above the requested amount.
    let (status, message) = if line.quantity == quantity {
        (StatusCode::CREATED, "Item added to cart")
    } else {
        (StatusCode::OK, "Cart quantity updated")
    };
    info!(
        "Cart line {} for user {} now holds {} x {} {}",
        line.id,
        current.id(),
        line.quantity,
        line.item_type,
        line.item_id
    );

    Ok((status, Json(ApiResponse::new(CartItemResponse::from(line), message))))
}

/// Set the quantity of one of the caller's cart lines
#[utoipa::path(
    patch,
    path = "/cart/{cart_item_id}",
    tag = "cart",
    params(("cart_item_id" = i32, Path, description = "Cart line ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Cart line updated", body = ApiResponse<CartItemResponse>),
        (status = 400, description = "Quantity out of range", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Cart item not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn update_cart_item(
    AppPath(cart_item_id): AppPath<i32>,
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(request): AppJson<UpdateCartItemRequest>,
) -> ApiResult<Json<ApiResponse<CartItemResponse>>> {
    let line = find_owned_line(&state, current.id(), cart_item_id).await?;
    ensure_cart_quantity(request.quantity)?;

    let mut row = line.into_active_model();
    row.quantity = Set(request.quantity);
    let line = row.update(&state.db).await?;
    info!("Cart line {} quantity set to {}", line.id, line.quantity);

    Ok(Json(ApiResponse::new(
        CartItemResponse::from(line),
        "Cart item updated successfully",
    )))
}

/// Remove one of the caller's cart lines
#[utoipa::path(
    delete,
    path = "/cart/{cart_item_id}",
    tag = "cart",
    params(("cart_item_id" = i32, Path, description = "Cart line ID")),
    responses(
        (status = 200, description = "Cart line removed", body = ApiResponse<String>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Cart item not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn remove_from_cart(
    AppPath(cart_item_id): AppPath<i32>,
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let result = cart_item::Entity::delete_many()
        .filter(cart_item::Column::Id.eq(cart_item_id))
        .filter(cart_item::Column::UserId.eq(current.id()))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        warn!("Cart item {} not found for user {}", cart_item_id, current.id());
        return Err(ApiError::NotFound("Cart item not found".to_string()));
    }

    info!("Cart line {} removed", cart_item_id);
    Ok(Json(ApiResponse::new(
        format!("Cart item {} removed", cart_item_id),
        "Cart item removed successfully",
    )))
}
