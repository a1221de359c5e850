//! Common test utilities for integration tests.
//!
//! Most tests drive the router with `tower::ServiceExt::oneshot` against the
//! in-memory store, so no database is needed. [`PgTestContext`] runs the same
//! kind of tests against PostgreSQL when `TEST_DATABASE_URL` is set.

// Not every integration test uses every helper
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{
    GamificationPeriod, PeriodWindow, PointsEntryType, PointsLedgerEntry, PortalUser,
    RankingPeriod, UserRole,
};
use domain::services::PeriodStore;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use persistence::entities::{PointsEntryTypeDb, UserRoleDb};
use persistence::memory::InMemoryStore;
use persistence::Stores;
use portal_api::{app::create_app, config::Config};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

/// A test application over a shared in-memory store.
///
/// Every call to [`TestContext::app`] builds a fresh router over the same
/// store, since `oneshot` consumes the router.
pub struct TestContext {
    pub config: Config,
    pub store: Arc<InMemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_overrides(&[])
    }

    pub fn with_overrides(overrides: &[(&str, &str)]) -> Self {
        Self {
            config: Config::load_for_test(overrides).expect("Failed to load test config"),
            store: Arc::new(InMemoryStore::new()),
        }
    }

    pub fn app(&self) -> Router {
        create_app(
            self.config.clone(),
            Stores::in_memory(self.store.clone()),
        )
        .expect("Failed to build test app")
    }

    /// Inserts a user with the given role and returns it.
    pub async fn create_user(&self, role: UserRole) -> PortalUser {
        let user = PortalUser {
            id: Uuid::new_v4(),
            display_name: Name().fake(),
            email: SafeEmail().fake(),
            role,
            created_at: Utc::now(),
        };
        self.store.insert_user(user.clone()).await;
        user
    }

    pub async fn create_member(&self) -> PortalUser {
        self.create_user(UserRole::Member).await
    }

    pub async fn create_admin(&self) -> PortalUser {
        self.create_user(UserRole::Admin).await
    }

    /// Access token for `user_id`, valid for an hour.
    pub fn token_for(&self, user_id: Uuid) -> String {
        self.config
            .jwt
            .token_keys()
            .expect("Invalid test keys")
            .issue(user_id, 3600)
            .expect("Failed to issue token")
            .0
    }

    /// Inserts a ledger entry directly, bypassing validation.
    pub async fn add_entry(
        &self,
        user_id: Uuid,
        points: i32,
        entry_type: PointsEntryType,
        category_id: Option<Uuid>,
        created_at: DateTime<Utc>,
    ) -> PointsLedgerEntry {
        let entry = PointsLedgerEntry {
            id: Uuid::new_v4(),
            user_id,
            points,
            description: "Seeded activity".to_string(),
            entry_type,
            category_id,
            created_by: None,
            created_at,
        };
        self.store.insert_entry(entry.clone()).await;
        entry
    }
}

impl TestContext {
    /// Stores a window for `period` directly.
    pub async fn pin_period(
        &self,
        period: RankingPeriod,
        starts_on: NaiveDate,
        ends_on: NaiveDate,
    ) {
        let window = PeriodWindow::from_dates(starts_on, ends_on).expect("Inverted test window");
        PeriodStore::upsert(
            &*self.store,
            &GamificationPeriod {
                period,
                window,
                updated_by: None,
                updated_at: Utc::now(),
            },
        )
        .await
        .expect("Failed to store period");
    }

    /// Pins both periods to a window that comfortably contains the last year,
    /// so entries seeded relative to now never fall outside.
    pub async fn pin_periods_around_now(&self) {
        let today = Utc::now().date_naive();
        for period in RankingPeriod::ALL {
            self.pin_period(
                period,
                today - chrono::Duration::days(400),
                today + chrono::Duration::days(1),
            )
            .await;
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a test database pool from `TEST_DATABASE_URL` and apply migrations.
///
/// Returns `None` when the variable is unset; PostgreSQL-backed tests return
/// early in that case.
pub async fn create_test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL-backed test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool).await;
    Some(pool)
}

/// Run migrations on the test database.
pub async fn run_migrations(pool: &PgPool) {
    sqlx::migrate!("../persistence/src/migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations");
}

/// A test application over a PostgreSQL database.
///
/// Tests share one database, so each test scopes its data by fresh users or
/// a fresh category id.
pub struct PgTestContext {
    pub config: Config,
    pub pool: PgPool,
}

impl PgTestContext {
    pub async fn connect() -> Option<Self> {
        Some(Self {
            config: Config::load_for_test(&[]).expect("Failed to load test config"),
            pool: create_test_pool().await?,
        })
    }

    pub fn stores(&self) -> Stores {
        Stores::postgres(self.pool.clone())
    }

    pub fn app(&self) -> Router {
        create_app(self.config.clone(), self.stores()).expect("Failed to build test app")
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.config
            .jwt
            .token_keys()
            .expect("Invalid test keys")
            .issue(user_id, 3600)
            .expect("Failed to issue token")
            .0
    }

    /// Inserts a user row with a unique email.
    pub async fn create_user(&self, role: UserRole) -> PortalUser {
        let user = PortalUser {
            id: Uuid::new_v4(),
            display_name: Name().fake(),
            email: format!("{}@example.edu", Uuid::new_v4().simple()),
            role,
            created_at: Utc::now(),
        };
        let role_db = match role {
            UserRole::Member => UserRoleDb::Member,
            UserRole::Admin => UserRoleDb::Admin,
        };

        sqlx::query(
            "INSERT INTO users (id, display_name, email, role, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(role_db)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .expect("Failed to insert test user");
        user
    }

    /// Inserts a ledger row with an explicit creation time.
    pub async fn add_entry(
        &self,
        user_id: Uuid,
        points: i32,
        entry_type: PointsEntryType,
        category_id: Option<Uuid>,
        created_at: DateTime<Utc>,
    ) -> PointsLedgerEntry {
        let entry = PointsLedgerEntry {
            id: Uuid::new_v4(),
            user_id,
            points,
            description: "Seeded activity".to_string(),
            entry_type,
            category_id,
            created_by: None,
            created_at,
        };

        sqlx::query(
            r#"
            INSERT INTO points_ledger (id, user_id, points, description, entry_type, category_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.points)
        .bind(&entry.description)
        .bind(PointsEntryTypeDb::from(entry_type))
        .bind(entry.category_id)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .expect("Failed to insert ledger entry");
        entry
    }
}

/// Build a GET request without authentication.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a GET request with authentication.
pub fn get_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Build a JSON request with authentication.
pub fn json_request_with_auth(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a JSON request without authentication.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}
