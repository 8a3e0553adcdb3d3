use crate::handlers::{
    cart::{add_to_cart, list_cart, remove_from_cart, update_cart_item},
    health::health_check,
    media::{get_media, upload_video},
    products::{create_product, delete_product, get_product, list_products, update_product},
    purchases::{create_purchase, list_purchases},
    requests::{create_request, get_request, list_requests, update_request},
    services::{create_service, delete_service, get_service, list_services, update_service},
    tutorials::{create_tutorial, delete_tutorial, get_tutorial, list_tutorials, update_tutorial},
    users::{login, me, register},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, patch, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };

    match origin.parse::<HeaderValue>() {
        Ok(value) => {
            info!("CORS restricted to origin {}", origin);
            CorsLayer::permissive().allow_origin(value)
        }
        Err(e) => {
            warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
            CorsLayer::permissive()
        }
    }
}

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_mb.saturating_mul(1024 * 1024);
    let cors = cors_layer(state.config.cors_origin.as_deref());

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Authentication
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/users/me", get(me))
        // Catalog
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:product_id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/tutorials", get(list_tutorials).post(create_tutorial))
        .route(
            "/tutorials/:tutorial_id",
            get(get_tutorial).put(update_tutorial).delete(delete_tutorial),
        )
        .route("/services", get(list_services).post(create_service))
        .route(
            "/services/:service_id",
            get(get_service).put(update_service).delete(delete_service),
        )
        // Per-user collections
        .route("/cart", get(list_cart).post(add_to_cart))
        .route(
            "/cart/:cart_item_id",
            patch(update_cart_item).delete(remove_from_cart),
        )
        .route("/purchases", get(list_purchases).post(create_purchase))
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/:request_id", get(get_request).put(update_request))
        // Media
        .route(
            "/upload-video",
            post(upload_video).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/media/:filename", get(get_media))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(cors),
        )
        .with_state(state)
}
