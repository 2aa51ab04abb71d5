#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Once,
};

static INIT: Once = Once::new();
static MIGRATIONS_RAN: AtomicBool = AtomicBool::new(false);
static USER_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub const TEST_PASSWORD: &str = "test_password_123";

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        // Deterministic tests: no throttling
        std::env::set_var("RATE_LIMIT_ENABLED", "false");
        let config = trove::config::jwt::JwtConfig::from_env().unwrap();
        let _ = trove::utils::jwt::init_jwt_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_upload_cap(16 * 1024 * 1024).await
}

/// Spawn the app with a custom upload size cap, so oversize tests don't
/// have to push 16 MiB bodies.
pub async fn spawn_app_with_upload_cap(max_size: usize) -> TestApp {
    init_env();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"));

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    // Run migrations only once globally (using atomic bool for thread safety)
    if !MIGRATIONS_RAN.swap(true, Ordering::SeqCst) {
        trove::migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
    }

    // Clean data tables (reverse dependency order)
    cleanup_tables(&db).await;

    let upload_config = trove::config::upload::UploadConfig {
        upload_dir: "./test_uploads".to_string(),
        max_size,
    };

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(trove::routes::create_routes(&upload_config))
        .layer(axum::middleware::from_fn(
            trove::middleware::security::security_headers_middleware,
        ))
        .layer(axum::extract::Extension(db.clone()))
        .layer(axum::extract::Extension(upload_config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    let addr_str = format!("http://{}", addr);
    let client = Client::new();

    TestApp {
        addr: addr_str,
        db,
        client,
    }
}

async fn cleanup_tables(db: &DatabaseConnection) {
    let tables = [
        "conversations",
        "comments",
        "item_locations",
        "items",
        "users",
    ];

    for table in tables {
        let sql = format!("TRUNCATE TABLE {} CASCADE", table);
        let _ = db
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                sql,
            ))
            .await;
    }
}

/// Sign up a user through the API. Panics on failure.
pub async fn signup_user(app: &TestApp, username: &str) {
    let resp = app
        .client
        .post(app.url("/auth/signup"))
        .json(&serde_json::json!({
            "username": username,
            "first_name": "Test",
            "last_name": "User",
            "password": TEST_PASSWORD,
            "mis": "mis"
        }))
        .send()
        .await
        .expect("Failed to sign up user");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap_or_else(|e| {
        panic!(
            "Failed to parse signup response for user '{}': status={}, error={}",
            username, status, e
        );
    });

    if !body["success"].as_bool().unwrap_or(false) {
        panic!(
            "Failed to sign up user '{}': status={}, body={}",
            username, status, body
        );
    }
}

/// Log in and return the token.
pub async fn login_user(app: &TestApp, username: &str) -> String {
    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "username": username,
            "password": TEST_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to log in");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse login response");

    body["data"]["token"]
        .as_str()
        .unwrap_or_else(|| {
            panic!(
                "Login response missing token for '{}': status={}, body={}",
                username, status, body
            )
        })
        .to_string()
}

/// Sign up a fresh uniquely-named user and return (username, token).
pub async fn create_test_user(app: &TestApp, username_prefix: &str) -> (String, String) {
    let counter = USER_COUNTER.fetch_add(1, Ordering::SeqCst);
    let username = format!("{}_{}", username_prefix, counter);

    signup_user(app, &username).await;
    let token = login_user(app, &username).await;
    (username, token)
}

/// Make a user admin by directly updating the database.
pub async fn make_admin(db: &DatabaseConnection, username: &str) {
    db.execute(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Postgres,
        "UPDATE users SET role = 'admin' WHERE username = $1",
        vec![username.into()],
    ))
    .await
    .expect("Failed to make user admin");
}

/// Create an admin and return (username, token). The role rides the token,
/// so the promotion happens before login.
pub async fn create_test_admin(app: &TestApp, username_prefix: &str) -> (String, String) {
    let counter = USER_COUNTER.fetch_add(1, Ordering::SeqCst);
    let username = format!("{}_{}", username_prefix, counter);

    signup_user(app, &username).await;
    make_admin(&app.db, &username).await;
    let token = login_user(app, &username).await;
    (username, token)
}

/// Report an item through the multipart form and return its id.
pub async fn create_test_item(
    app: &TestApp,
    token: &str,
    responsibility: &str,
    locations: &[&str],
) -> i32 {
    let mut form = reqwest::multipart::Form::new()
        .text("description", "Black leather wallet")
        .text("category", "accessories")
        .text("report_type", "lost")
        .text("responsibility", responsibility.to_string());

    for location in locations {
        form = form.text("location", location.to_string());
    }

    let resp = app
        .client
        .post(app.url("/items"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to create item");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse item response");

    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to create item: status={}, body={}", status, body);
    }

    body["data"]["id"].as_i64().expect("Response missing item id") as i32
}

/// Insert a conversation row directly, bypassing the API, so tests control
/// the timestamp.
pub async fn insert_message(
    db: &DatabaseConnection,
    sender: &str,
    receiver: &str,
    message: &str,
    created_at: chrono::NaiveDateTime,
) {
    let row = trove::models::conversation::ActiveModel {
        message: sea_orm::ActiveValue::Set(message.to_string()),
        sender: sea_orm::ActiveValue::Set(sender.to_string()),
        receiver: sea_orm::ActiveValue::Set(receiver.to_string()),
        created_at: sea_orm::ActiveValue::Set(created_at),
        ..Default::default()
    };
    row.insert(db).await.expect("Failed to insert message");
}

/// Count rows in a table.
pub async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let result = db
        .query_one(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            format!("SELECT COUNT(*) AS n FROM {}", table),
        ))
        .await
        .expect("Failed to count rows")
        .expect("COUNT returned no row");
    result.try_get::<i64>("", "n").expect("Failed to read count")
}
