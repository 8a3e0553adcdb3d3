use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{hash_password, verify_password, CurrentUser, DUMMY_PASSWORD_HASH};
use crate::error::{ApiError, ApiResult};
use crate::extract::{AppForm, ValidJson};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for registering a new account
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Username (must be unique)
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    /// Email address (must be unique)
    #[validate(email)]
    pub email: String,
    /// Plain-text password, hashed before storage
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

/// OAuth2 password-flow form fields
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Public view of a user; never includes the password hash
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            is_admin: model.is_admin,
        }
    }
}

/// Bearer token issued by a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

/// Register a new user
///
/// The configured admin username is granted admin rights on registration.
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username or email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    trace!("Entering register function");

    let username_taken = user::Entity::find()
        .filter(user::Column::Username.eq(request.username.as_str()))
        .count(&state.db)
        .await?
        > 0;
    if username_taken {
        warn!("Registration rejected: username '{}' is taken", request.username);
        return Err(ApiError::Conflict("Username already registered".to_string()));
    }

    let email_taken = user::Entity::find()
        .filter(user::Column::Email.eq(request.email.as_str()))
        .count(&state.db)
        .await?
        > 0;
    if email_taken {
        warn!("Registration rejected: email '{}' is taken", request.email);
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let is_admin = request.username == state.config.admin_username;
    debug!("Registering '{}' (admin: {})", request.username, is_admin);

    let new_user = user::ActiveModel {
        username: Set(request.username),
        email: Set(request.email),
        hashed_password: Set(hash_password(&request.password)?),
        is_admin: Set(is_admin),
        ..Default::default()
    };

    // A concurrent registration that slips past the pre-checks hits the
    // unique index and comes back as a Conflict.
    let user_model = new_user.insert(&state.db).await?;
    info!("User registered with ID: {}, username: {}", user_model.id, user_model.username);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            UserResponse::from(user_model),
            "User registered successfully",
        )),
    ))
}

/// Exchange username and password for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login succeeded", body = TokenResponse),
        (status = 401, description = "Incorrect username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    AppForm(form): AppForm<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    trace!("Entering login function");

    let rejected = || ApiError::Unauthorized("Incorrect username or password".to_string());

    let Some(user_model) = user::Entity::find()
        .filter(user::Column::Username.eq(form.username.as_str()))
        .one(&state.db)
        .await?
    else {
        verify_password(DUMMY_PASSWORD_HASH, &form.password)?;
        warn!("Login failed: unknown user '{}'", form.username);
        return Err(rejected());
    };

    if !verify_password(&user_model.hashed_password, &form.password)? {
        warn!("Login failed: wrong password for '{}'", form.username);
        return Err(rejected());
    }

    let access_token = state.tokens.issue(&user_model.username)?;
    info!("Issued access token for '{}'", user_model.username);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.tokens.ttl().num_seconds(),
    }))
}

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = current.id()))]
pub async fn me(current: CurrentUser) -> Json<ApiResponse<UserResponse>> {
    debug!("Returning profile for user {}", current.id());
    Json(ApiResponse::new(
        UserResponse::from(current.0),
        "Current user retrieved successfully",
    ))
}
