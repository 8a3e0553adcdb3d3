use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{NaiveDateTime, Utc};
use model::catalog::ItemType;
use model::entities::purchase;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::extract::AppJson;
use crate::handlers::{ensure_non_negative_price, ensure_positive_quantity};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

fn default_quantity() -> i32 {
    1
}

/// Request body for recording a purchase
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatePurchaseRequest {
    /// One of `product`, `tutorial`, `service`
    pub item_type: String,
    pub item_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[schema(value_type = String, example = "39.98")]
    pub total_price: Decimal,
    /// Defaults to the current UTC time
    pub purchase_date: Option<NaiveDateTime>,
}

/// Purchase response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseResponse {
    pub id: i32,
    pub user_id: i32,
    pub item_type: String,
    pub item_id: i32,
    pub quantity: i32,
    #[schema(value_type = String, example = "39.98")]
    pub total_price: Decimal,
    pub purchase_date: NaiveDateTime,
}

impl From<purchase::Model> for PurchaseResponse {
    fn from(model: purchase::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            item_type: model.item_type.to_string(),
            item_id: model.item_id,
            quantity: model.quantity,
            total_price: model.total_price,
            purchase_date: model.purchase_date,
        }
    }
}

/// List the caller's purchases
#[utoipa::path(
    get,
    path = "/purchases",
    tag = "purchases",
    responses(
        (status = 200, description = "Purchases retrieved successfully", body = ApiResponse<Vec<PurchaseResponse>>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = current.id()))]
pub async fn list_purchases(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<PurchaseResponse>>>> {
    let purchases = purchase::Entity::find()
        .filter(purchase::Column::UserId.eq(current.id()))
        .order_by_asc(purchase::Column::Id)
        .all(&state.db)
        .await?;

    debug!("User {} has {} purchases", current.id(), purchases.len());
    Ok(Json(ApiResponse::new(
        purchases.into_iter().map(PurchaseResponse::from).collect(),
        "Purchases retrieved successfully",
    )))
}

/// Record a purchase for the caller
///
/// The catalog is not consulted: the item reference and total are stored as
/// sent, and there is no stock accounting.
#[utoipa::path(
    post,
    path = "/purchases",
    tag = "purchases",
    request_body = CreatePurchaseRequest,
    responses(
        (status = 201, description = "Purchase recorded successfully", body = ApiResponse<PurchaseResponse>),
        (status = 400, description = "Invalid item type, quantity or total", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn create_purchase(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(request): AppJson<CreatePurchaseRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PurchaseResponse>>)> {
    let item_type: ItemType = request.item_type.parse()?;
    ensure_positive_quantity(request.quantity)?;
    ensure_non_negative_price("total_price", request.total_price)?;

    let new_purchase = purchase::ActiveModel {
        user_id: Set(current.id()),
        item_type: Set(item_type),
        item_id: Set(request.item_id),
        quantity: Set(request.quantity),
        total_price: Set(request.total_price),
        purchase_date: Set(request
            .purchase_date
            .unwrap_or_else(|| Utc::now().naive_utc())),
        ..Default::default()
    };

    let purchase_model = new_purchase.insert(&state.db).await?;
    info!(
        "Purchase {} recorded: user {} bought {} x {} {}",
        purchase_model.id, current.id(), purchase_model.quantity, item_type, purchase_model.item_id
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            PurchaseResponse::from(purchase_model),
            "Purchase recorded successfully",
        )),
    ))
}
