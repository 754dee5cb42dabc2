/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup (migrations run on connect)
/// - Test user creation with a known password
/// - JWT token generation
/// - Router construction
///
/// These tests require a running PostgreSQL database; `DATABASE_URL` and
/// `JWT_SECRET` must be set (a `.env` file works).

use motolog_api::app::{build_router, AppState};
use motolog_api::config::Config;
use motolog_shared::auth::jwt::{create_token, Claims};
use motolog_shared::auth::password::hash_password;
use motolog_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Password every test user is created with
pub const TEST_PASSWORD: &str = "TestPass123";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Migrations path is relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations").run(&db).await?;

        let user = User::create(
            &db,
            CreateUser {
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: hash_password(TEST_PASSWORD)?,
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                phone: None,
            },
        )
        .await?;

        let claims = Claims::new(user.id, user.email.clone(), user.role.as_str().to_string());
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Cleans up test data
    ///
    /// Deleting the user cascades to vehicles, fuel entries, compliance
    /// records, and notifications.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Registration number unique across test runs
pub fn unique_registration() -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(10)
        .collect();
    format!("TST{}", suffix.to_uppercase())
}

/// Request body for a minimal valid vehicle
pub fn vehicle_body(registration: &str) -> serde_json::Value {
    serde_json::json!({
        "make": "Honda",
        "model": "City",
        "year": 2022,
        "vehicleType": "car",
        "fuelType": "petrol",
        "registrationNumber": registration,
        "currentOdometer": 10000
    })
}
