//! User-submitted content requests. Users see their own; admins see and
//! moderate all of them.

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::NaiveDate;
use model::entities::request::{self, RequestStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::{AdminUser, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppPath};
use crate::handlers::today;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for submitting a content request
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateContentRequest {
    pub title: String,
    pub description: String,
}

/// Request body for an admin's full replace of a content request
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateContentRequest {
    pub title: String,
    pub description: String,
    /// One of `pending`, `approved`, `rejected`
    #[schema(example = "approved")]
    pub status: String,
}

/// Content request response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContentRequestResponse {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub status: String,
    pub posted_date: NaiveDate,
}

impl From<request::Model> for ContentRequestResponse {
    fn from(model: request::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            status: model.status.to_string(),
            posted_date: model.posted_date,
        }
    }
}

fn not_found(request_id: i32) -> ApiError {
    warn!("Request with ID {} not found", request_id);
    ApiError::NotFound("Request not found".to_string())
}

/// List content requests (own for users, all for admins)
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    responses(
        (status = 200, description = "Requests retrieved successfully", body = ApiResponse<Vec<ContentRequestResponse>>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = current.id()))]
pub async fn list_requests(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<ContentRequestResponse>>>> {
    let mut query = request::Entity::find().order_by_asc(request::Column::Id);
    if !current.is_admin() {
        query = query.filter(request::Column::UserId.eq(current.id()));
    }

    let requests = query.all(&state.db).await?;
    debug!(
        "Returning {} requests (admin view: {})",
        requests.len(),
        current.is_admin()
    );

    Ok(Json(ApiResponse::new(
        requests.into_iter().map(ContentRequestResponse::from).collect(),
        "Requests retrieved successfully",
    )))
}

/// Get one content request (owner or admin)
#[utoipa::path(
    get,
    path = "/requests/{request_id}",
    tag = "requests",
    params(("request_id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request retrieved successfully", body = ApiResponse<ContentRequestResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn get_request(
    AppPath(request_id): AppPath<i32>,
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<ApiResponse<ContentRequestResponse>>> {
    let request_model = request::Entity::find_by_id(request_id)
        .one(&state.db)
        .await?
        .filter(|row| current.is_admin() || row.user_id == current.id())
        .ok_or_else(|| not_found(request_id))?;

    Ok(Json(ApiResponse::new(
        ContentRequestResponse::from(request_model),
        "Request retrieved successfully",
    )))
}

/// Submit a content request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = CreateContentRequest,
    responses(
        (status = 201, description = "Request submitted successfully", body = ApiResponse<ContentRequestResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current), fields(user_id = current.id()))]
pub async fn create_request(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(payload): AppJson<CreateContentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ContentRequestResponse>>)> {
    let new_request = request::ActiveModel {
        user_id: Set(current.id()),
        title: Set(payload.title),
        description: Set(payload.description),
        status: Set(RequestStatus::Pending),
        posted_date: Set(today()),
        ..Default::default()
    };

    let request_model = new_request.insert(&state.db).await?;
    info!("Request {} submitted by user {}", request_model.id, current.id());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            ContentRequestResponse::from(request_model),
            "Request submitted successfully",
        )),
    ))
}

/// Replace a content request, including its status (admin only)
#[utoipa::path(
    put,
    path = "/requests/{request_id}",
    tag = "requests",
    params(("request_id" = i32, Path, description = "Request ID")),
    request_body = UpdateContentRequest,
    responses(
        (status = 200, description = "Request updated successfully", body = ApiResponse<ContentRequestResponse>),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin), fields(admin = %admin.0.username))]
pub async fn update_request(
    AppPath(request_id): AppPath<i32>,
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(payload): AppJson<UpdateContentRequest>,
) -> ApiResult<Json<ApiResponse<ContentRequestResponse>>> {
    let status: RequestStatus = payload.status.parse().map_err(ApiError::BadRequest)?;

    let existing = request::Entity::find_by_id(request_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found(request_id))?;
    let previous_status = existing.status;

    let mut row = existing.into_active_model();
    row.title = Set(payload.title);
    row.description = Set(payload.description);
    row.status = Set(status);
    let request_model = row.update(&state.db).await?;

    info!(
        "Request {} updated, status {} -> {}",
        request_model.id, previous_status, request_model.status
    );
    Ok(Json(ApiResponse::new(
        ContentRequestResponse::from(request_model),
        "Request updated successfully",
    )))
}
