use axum::{extract::State, http::StatusCode, response::Json};
use chrono::NaiveDate;
use model::entities::product;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppPath, ValidQuery};
use crate::handlers::{ensure_non_negative_price, today};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, ListQuery};

/// Request body for creating or replacing a product
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProductPayload {
    pub name: String,
    /// Product kind, e.g. "Sticker"
    #[serde(rename = "type")]
    pub product_type: String,
    #[schema(value_type = String, example = "69.99")]
    pub price: Decimal,
    pub description: String,
    /// Image path; the placeholder is used when blank or missing
    pub image: Option<String>,
    /// Listing date; today (UTC) on create, unchanged on update when omitted
    pub posted_date: Option<NaiveDate>,
}

impl ProductPayload {
    fn apply_to(self, row: &mut product::ActiveModel) {
        row.name = Set(self.name);
        row.product_type = Set(self.product_type);
        row.price = Set(self.price);
        row.description = Set(self.description);
        row.image = Set(match self.image {
            Some(image) if !image.trim().is_empty() => image,
            _ => product::PLACEHOLDER_IMAGE.to_string(),
        });
        if let Some(posted_date) = self.posted_date {
            row.posted_date = Set(posted_date);
        }
    }
}

/// Product response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    #[schema(value_type = String, example = "69.99")]
    pub price: Decimal,
    pub description: String,
    pub image: String,
    pub posted_date: NaiveDate,
}

impl From<product::Model> for ProductResponse {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            product_type: model.product_type,
            price: model.price,
            description: model.description,
            image: model.image,
            posted_date: model.posted_date,
        }
    }
}

fn not_found(product_id: i32) -> ApiError {
    warn!("Product with ID {} not found", product_id);
    ApiError::NotFound("Product not found".to_string())
}

/// List products
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(ListQuery),
    responses(
        (status = 200, description = "Products retrieved successfully", body = ApiResponse<Vec<ProductResponse>>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ProductResponse>>>> {
    trace!("Entering list_products function");

    let products = product::Entity::find()
        .order_by_asc(product::Column::Id)
        .offset(query.skip())
        .limit(query.limit())
        .all(&state.db)
        .await?;

    debug!("Retrieved {} products", products.len());
    Ok(Json(ApiResponse::new(
        products.into_iter().map(ProductResponse::from).collect(),
        "Products retrieved successfully",
    )))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{product_id}",
    tag = "products",
    params(("product_id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product retrieved successfully", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_product(
    AppPath(product_id): AppPath<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<ProductResponse>>> {
    let product_model = product::Entity::find_by_id(product_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found(product_id))?;

    Ok(Json(ApiResponse::new(
        ProductResponse::from(product_model),
        "Product retrieved successfully",
    )))
}

/// Create a product (admin only)
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created successfully", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin), fields(admin = %admin.0.username))]
pub async fn create_product(
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(payload): AppJson<ProductPayload>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ProductResponse>>)> {
    ensure_non_negative_price("price", payload.price)?;

    let mut row = product::ActiveModel {
        posted_date: Set(today()),
        ..Default::default()
    };
    payload.apply_to(&mut row);

    let product_model = row.insert(&state.db).await?;
    info!("Product created with ID: {}, name: {}", product_model.id, product_model.name);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            ProductResponse::from(product_model),
            "Product created successfully",
        )),
    ))
}

/// Replace a product (admin only)
#[utoipa::path(
    put,
    path = "/products/{product_id}",
    tag = "products",
    params(("product_id" = i32, Path, description = "Product ID")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated successfully", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin), fields(admin = %admin.0.username))]
pub async fn update_product(
    AppPath(product_id): AppPath<i32>,
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(payload): AppJson<ProductPayload>,
) -> ApiResult<Json<ApiResponse<ProductResponse>>> {
    ensure_non_negative_price("price", payload.price)?;

    let existing = product::Entity::find_by_id(product_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found(product_id))?;

    let mut row = existing.into_active_model();
    payload.apply_to(&mut row);

    let product_model = row.update(&state.db).await?;
    info!("Product {} updated", product_model.id);

    Ok(Json(ApiResponse::new(
        ProductResponse::from(product_model),
        "Product updated successfully",
    )))
}

/// Delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/products/{product_id}",
    tag = "products",
    params(("product_id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin), fields(admin = %admin.0.username))]
pub async fn delete_product(
    AppPath(product_id): AppPath<i32>,
    State(state): State<AppState>,
    admin: AdminUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let result = product::Entity::delete_by_id(product_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(not_found(product_id));
    }

    info!("Product {} deleted", product_id);
    Ok(Json(ApiResponse::new(
        format!("Product {} deleted", product_id),
        "Product deleted successfully",
    )))
}
