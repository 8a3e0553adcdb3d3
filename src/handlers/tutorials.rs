use axum::{extract::State, http::StatusCode, response::Json};
use chrono::NaiveDate;
use model::entities::tutorial;
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

/// Request body for creating or replacing a tutorial
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TutorialPayload {
    pub title: String,
    pub content: String,
    pub tutorial_type: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub posted_date: Option<NaiveDate>,
    /// External video link
    pub video_url: Option<String>,
    /// File name of an uploaded video in the media directory
    pub video_file: Option<String>,
}

impl TutorialPayload {
    /// Overwrites the row with this payload. Omitted video fields are cleared.
    fn apply_to(self, row: &mut tutorial::ActiveModel) {
        row.title = Set(self.title);
        row.content = Set(self.content);
        row.tutorial_type = Set(self.tutorial_type);
        row.price = Set(self.price);
        row.video_url = Set(self.video_url);
        row.video_file = Set(self.video_file);
        if let Some(posted_date) = self.posted_date {
            row.posted_date = Set(posted_date);
        }
    }
}

/// Tutorial response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TutorialResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub tutorial_type: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub posted_date: NaiveDate,
    pub video_url: Option<String>,
    pub video_file: Option<String>,
}

impl From<tutorial::Model> for TutorialResponse {
    fn from(model: tutorial::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            tutorial_type: model.tutorial_type,
            price: model.price,
            posted_date: model.posted_date,
            video_url: model.video_url,
            video_file: model.video_file,
        }
    }
}

/// List tutorials
#[utoipa::path(
    get,
    path = "/tutorials",
    tag = "tutorials",
    params(ListQuery),
    responses(
        (status = 200, description = "Tutorials retrieved successfully", body = ApiResponse<Vec<TutorialResponse>>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_tutorials(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<TutorialResponse>>>> {
    trace!("Entering list_tutorials function");
    debug!("Fetching tutorials - skip: {}, limit: {}", query.skip(), query.limit());

    let tutorials = tutorial::Entity::find()
        .order_by_asc(tutorial::Column::Id)
        .offset(query.skip())
        .limit(query.limit())
        .all(&state.db)
        .await?;

    Ok(Json(ApiResponse::new(
        tutorials.into_iter().map(TutorialResponse::from).collect(),
        "Tutorials retrieved successfully",
    )))
}

/// Get a tutorial by ID
#[utoipa::path(
    get,
    path = "/tutorials/{tutorial_id}",
    tag = "tutorials",
    params(("tutorial_id" = i32, Path, description = "Tutorial ID")),
    responses(
        (status = 200, description = "Tutorial retrieved successfully", body = ApiResponse<TutorialResponse>),
        (status = 404, description = "Tutorial not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_tutorial(
    AppPath(tutorial_id): AppPath<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<TutorialResponse>>> {
    match tutorial::Entity::find_by_id(tutorial_id).one(&state.db).await? {
        Some(tutorial_model) => Ok(Json(ApiResponse::new(
            TutorialResponse::from(tutorial_model),
            "Tutorial retrieved successfully",
        ))),
        None => {
            warn!("Tutorial with ID {} not found", tutorial_id);
            Err(ApiError::NotFound("Tutorial not found".to_string()))
        }
    }
}

/// Create a tutorial (admin only)
#[utoipa::path(
    post,
    path = "/tutorials",
    tag = "tutorials",
    request_body = TutorialPayload,
    responses(
        (status = 201, description = "Tutorial created successfully", body = ApiResponse<TutorialResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_tutorial(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(payload): AppJson<TutorialPayload>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TutorialResponse>>)> {
    ensure_non_negative_price("price", payload.price)?;

    let mut row = tutorial::ActiveModel {
        posted_date: Set(today()),
        ..Default::default()
    };
    payload.apply_to(&mut row);

    let tutorial_model = row.insert(&state.db).await?;
    info!("Tutorial created with ID: {}, title: {}", tutorial_model.id, tutorial_model.title);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            TutorialResponse::from(tutorial_model),
            "Tutorial created successfully",
        )),
    ))
}

/// Replace a tutorial (admin only)
#[utoipa::path(
    put,
    path = "/tutorials/{tutorial_id}",
    tag = "tutorials",
    params(("tutorial_id" = i32, Path, description = "Tutorial ID")),
    request_body = TutorialPayload,
    responses(
        (status = 200, description = "Tutorial updated successfully", body = ApiResponse<TutorialResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Tutorial not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn update_tutorial(
    AppPath(tutorial_id): AppPath<i32>,
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(payload): AppJson<TutorialPayload>,
) -> ApiResult<Json<ApiResponse<TutorialResponse>>> {
    ensure_non_negative_price("price", payload.price)?;

    let Some(existing) = tutorial::Entity::find_by_id(tutorial_id).one(&state.db).await? else {
        warn!("Cannot update missing tutorial {}", tutorial_id);
        return Err(ApiError::NotFound("Tutorial not found".to_string()));
    };

    let mut row = existing.into_active_model();
    payload.apply_to(&mut row);
    let tutorial_model = row.update(&state.db).await?;
    info!("Tutorial {} updated", tutorial_model.id);

    Ok(Json(ApiResponse::new(
        TutorialResponse::from(tutorial_model),
        "Tutorial updated successfully",
    )))
}

/// Delete a tutorial (admin only)
#[utoipa::path(
    delete,
    path = "/tutorials/{tutorial_id}",
    tag = "tutorials",
    params(("tutorial_id" = i32, Path, description = "Tutorial ID")),
    responses(
        (status = 200, description = "Tutorial deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Tutorial not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_tutorial(
    AppPath(tutorial_id): AppPath<i32>,
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    let result = tutorial::Entity::delete_by_id(tutorial_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        warn!("Cannot delete missing tutorial {}", tutorial_id);
        return Err(ApiError::NotFound("Tutorial not found".to_string()));
    }

    info!("Tutorial {} deleted", tutorial_id);
    Ok(Json(ApiResponse::new(
        format!("Tutorial {} deleted", tutorial_id),
        "Tutorial deleted successfully",
    )))
}
