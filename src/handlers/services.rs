use axum::{extract::State, http::StatusCode, response::Json};
use chrono::NaiveDate;
use model::entities::service;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppPath, ValidQuery};
use crate::handlers::{ensure_non_negative_price, today};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, ListQuery};

/// Request body for creating or replacing a service offering
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ServicePayload {
    pub name: String,
    pub category: String,
    #[schema(value_type = String, example = "150.00")]
    pub price: Decimal,
    pub description: String,
    pub image: Option<String>,
    pub video_url: Option<String>,
    pub video_file: Option<String>,
    pub posted_date: Option<NaiveDate>,
}

impl ServicePayload {
    fn apply_to(self, row: &mut service::ActiveModel) {
        row.name = Set(self.name);
        row.category = Set(self.category);
        row.price = Set(self.price);
        row.description = Set(self.description);
        row.image = Set(self.image);
        row.video_url = Set(self.video_url);
        row.video_file = Set(self.video_file);
        if let Some(posted_date) = self.posted_date {
            row.posted_date = Set(posted_date);
        }
    }
}

/// Service response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceResponse {
    pub id: i32,
    pub name: String,
    pub category: String,
    #[schema(value_type = String, example = "150.00")]
    pub price: Decimal,
    pub description: String,
    pub image: Option<String>,
    pub video_url: Option<String>,
    pub video_file: Option<String>,
    pub posted_date: NaiveDate,
}

impl From<service::Model> for ServiceResponse {
    fn from(model: service::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
            price: model.price,
            description: model.description,
            image: model.image,
            video_url: model.video_url,
            video_file: model.video_file,
            posted_date: model.posted_date,
        }
    }
}

async fn find_service(state: &AppState, service_id: i32) -> ApiResult<service::Model> {
    service::Entity::find_by_id(service_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Service with ID {} not found", service_id);
            ApiError::NotFound("Service not found".to_string())
        })
}

/// List services
#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    params(ListQuery),
    responses(
        (status = 200, description = "Services retrieved successfully", body = ApiResponse<Vec<ServiceResponse>>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_services(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ServiceResponse>>>> {
    let services = service::Entity::find()
        .order_by_asc(service::Column::Id)
        .offset(query.skip())
        .limit(query.limit())
        .all(&state.db)
        .await?;

    debug!("Retrieved {} services", services.len());
    Ok(Json(ApiResponse::new(
        services.into_iter().map(ServiceResponse::from).collect(),
        "Services retrieved successfully",
    )))
}

/// Get a service by ID
#[utoipa::path(
    get,
    path = "/services/{service_id}",
    tag = "services",
    params(("service_id" = i32, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service retrieved successfully", body = ApiResponse<ServiceResponse>),
        (status = 404, description = "Service not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_service(
    AppPath(service_id): AppPath<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<ServiceResponse>>> {
    let service_model = find_service(&state, service_id).await?;
    Ok(Json(ApiResponse::new(
        ServiceResponse::from(service_model),
        "Service retrieved successfully",
    )))
}

/// Create a service (admin only)
#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    request_body = ServicePayload,
    responses(
        (status = 201, description = "Service created successfully", body = ApiResponse<ServiceResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin), fields(admin = %admin.0.username))]
pub async fn create_service(
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(payload): AppJson<ServicePayload>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ServiceResponse>>)> {
    ensure_non_negative_price("price", payload.price)?;

    let mut row = service::ActiveModel {
        posted_date: Set(today()),
        ..Default::default()
    };
    payload.apply_to(&mut row);

    let service_model = row.insert(&state.db).await?;
    info!("Service created with ID: {}, name: {}", service_model.id, service_model.name);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            ServiceResponse::from(service_model),
            "Service created successfully",
        )),
    ))
}

/// Replace a service (admin only)
#[utoipa::path(
    put,
    path = "/services/{service_id}",
    tag = "services",
    params(("service_id" = i32, Path, description = "Service ID")),
    request_body = ServicePayload,
    responses(
        (status = 200, description = "Service updated successfully", body = ApiResponse<ServiceResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Service not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin), fields(admin = %admin.0.username))]
pub async fn update_service(
    AppPath(service_id): AppPath<i32>,
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(payload): AppJson<ServicePayload>,
) -> ApiResult<Json<ApiResponse<ServiceResponse>>> {
    ensure_non_negative_price("price", payload.price)?;

    let mut row = find_service(&state, service_id).await?.into_active_model();
    payload.apply_to(&mut row);
    let service_model = row.update(&state.db).await?;
    info!("Service {} updated", service_model.id);

    Ok(Json(ApiResponse::new(
        ServiceResponse::from(service_model),
        "Service updated successfully",
    )))
}

/// Delete a service (admin only)
#[utoipa::path(
    delete,
    path = "/services/{service_id}",
    tag = "services",
    params(("service_id" = i32, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Service not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin), fields(admin = %admin.0.username))]
pub async fn delete_service(
    AppPath(service_id): AppPath<i32>,
    State(state): State<AppState>,
    admin: AdminUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let result = service::Entity::delete_by_id(service_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        warn!("Cannot delete missing service {}", service_id);
        return Err(ApiError::NotFound("Service not found".to_string()));
    }

    info!("Service {} deleted", service_id);
    Ok(Json(ApiResponse::new(
        format!("Service {} deleted", service_id),
        "Service deleted successfully",
    )))
}
