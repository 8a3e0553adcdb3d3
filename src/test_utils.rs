#[cfg(test)]
pub mod test_utils {
    use crate::config::{build_app_state, AppConfig};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::http::{header::AUTHORIZATION, HeaderValue};
    use axum_test::{TestRequest, TestServer};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const ADMIN: &str = "admin";
    pub const PASSWORD: &str = "correct horse battery staple";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    pub fn test_config(media_dir: PathBuf) -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            bind_address: "127.0.0.1:0".to_string(),
            secret_key: "test-secret-key".to_string(),
            token_ttl_minutes: 30,
            media_dir,
            max_upload_mb: 4,
            admin_username: ADMIN.to_string(),
            cors_origin: None,
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The level comes from RUST_LOG and defaults to WARN. The subscriber is
    /// active until the returned guard is dropped.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| level.parse::<Level>().ok())
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// A running test server plus the state and scratch media directory
    /// behind it.
    pub struct TestApp {
        pub server: TestServer,
        pub state: AppState,
        pub media_dir: TempDir,
        _tracing: tracing::subscriber::DefaultGuard,
    }

    /// Create the full application over a fresh database
    pub async fn setup_test_app() -> TestApp {
        let tracing = init_test_tracing();

        let media_dir = TempDir::new().expect("Failed to create media directory");
        let db = setup_test_db().await;
        let state = build_app_state(db, test_config(media_dir.path().to_path_buf()));

        let server = TestServer::new(create_router(state.clone()))
            .expect("Failed to start test server");

        TestApp {
            server,
            state,
            media_dir,
            _tracing: tracing,
        }
    }

    /// Attach `Authorization: Bearer <token>` to a request.
    pub fn bearer(request: TestRequest, token: &str) -> TestRequest {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .expect("token is a valid header value");
        request.add_header(AUTHORIZATION, value)
    }

    /// Register `username` with the shared test password and return the
    /// response data.
    pub async fn register(server: &TestServer, username: &str) -> Value {
        let response = server
            .post("/register")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": PASSWORD,
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }

    pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
        let response = server
            .post("/login")
            .form(&json!({ "username": username, "password": password }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["access_token"]
            .as_str()
            .expect("login returns an access token")
            .to_string()
    }

    /// Register `username` and return a bearer token for it.
    pub async fn register_and_login(server: &TestServer, username: &str) -> String {
        register(server, username).await;
        login(server, username, PASSWORD).await
    }

    /// Create a product as `admin_token` and return its id.
    pub async fn create_product(server: &TestServer, admin_token: &str, name: &str) -> i64 {
        let response = bearer(server.post("/products"), admin_token)
            .json(&json!({
                "name": name,
                "type": "Controller",
                "price": "69.99",
                "description": "Official DualSense controller",
                "image": "/products/controller.jpg",
                "posted_date": "2024-05-01",
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["data"]["id"]
            .as_i64()
            .expect("product id")
    }

    /// Create a tutorial as `admin_token` and return its id.
    pub async fn create_tutorial(server: &TestServer, admin_token: &str, title: &str) -> i64 {
        let response = bearer(server.post("/tutorials"), admin_token)
            .json(&json!({
                "title": title,
                "content": "Step by step",
                "tutorial_type": "Cleaning",
                "price": "9.99",
                "video_url": "https://videos.example.com/cleaning",
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["data"]["id"]
            .as_i64()
            .expect("tutorial id")
    }
}
