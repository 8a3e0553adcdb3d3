use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    IntoParams, Modify, OpenApi, ToSchema,
};
use validator::Validate;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::handlers::{cart, health, media, products, purchases, requests, services, tutorials, users};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Startup configuration
    pub config: Arc<AppConfig>,
    /// Bearer token signer/verifier derived from the configured secret
    pub tokens: Arc<TokenService>,
}

/// Default page size for catalog listings.
pub const DEFAULT_LIMIT: u64 = 100;

/// Pagination parameters for catalog listings
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Number of records to skip (default: 0)
    #[validate(range(max = 1_000_000))]
    pub skip: Option<u64>,
    /// Maximum number of records to return (default: 100)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn skip(&self) -> u64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable detail
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Registers the bearer scheme referenced by protected operations.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::register,
        users::login,
        users::me,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        tutorials::list_tutorials,
        tutorials::get_tutorial,
        tutorials::create_tutorial,
        tutorials::update_tutorial,
        tutorials::delete_tutorial,
        services::list_services,
        services::get_service,
        services::create_service,
        services::update_service,
        services::delete_service,
        cart::list_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        purchases::list_purchases,
        purchases::create_purchase,
        requests::list_requests,
        requests::get_request,
        requests::create_request,
        requests::update_request,
        media::upload_video,
        media::get_media,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ListQuery,
            users::RegisterRequest,
            users::LoginForm,
            users::UserResponse,
            users::TokenResponse,
            products::ProductPayload,
            products::ProductResponse,
            tutorials::TutorialPayload,
            tutorials::TutorialResponse,
            services::ServicePayload,
            services::ServiceResponse,
            cart::AddCartItemRequest,
            cart::UpdateCartItemRequest,
            cart::CartItemResponse,
            purchases::CreatePurchaseRequest,
            purchases::PurchaseResponse,
            requests::CreateContentRequest,
            requests::UpdateContentRequest,
            requests::ContentRequestResponse,
            media::UploadForm,
            media::UploadResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and the current user"),
        (name = "products", description = "Product catalog"),
        (name = "tutorials", description = "Tutorial catalog"),
        (name = "services", description = "Service catalog"),
        (name = "cart", description = "The caller's shopping cart"),
        (name = "purchases", description = "The caller's purchase records"),
        (name = "requests", description = "User-submitted content requests"),
        (name = "media", description = "Video upload and retrieval"),
    ),
    info(
        title = "Storefront API",
        description = "Catalog and commerce backend for products, tutorials and services",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
