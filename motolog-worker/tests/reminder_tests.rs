/// Integration tests for the reminder cycle
///
/// These tests require a running PostgreSQL database; DATABASE_URL must be
/// set (a `.env` file works). Each test creates its own user and deletes it
/// afterwards; the cascade removes the vehicles, records, and notifications
/// underneath.
///
/// The reminder scans look at the whole database, so the tests serialize
/// their cycles through a shared lock to keep notification counts exact.

use chrono::{Duration, Utc};
use motolog_shared::auth::password::hash_password;
use motolog_shared::db::migrations::run_migrations;
use motolog_shared::models::insurance::{CreateInsurance, Insurance};
use motolog_shared::models::puc::{CreatePuc, PucCertificate};
use motolog_shared::models::service_record::{CreateServiceRecord, ServiceRecord};
use motolog_shared::models::user::{CreateUser, User};
use motolog_shared::models::vehicle::{CreateVehicle, FuelType, Vehicle, VehicleType};
use motolog_worker::reminders;
use sqlx::PgPool;
use tokio::sync::Mutex;
use uuid::Uuid;

static CYCLE_LOCK: Mutex<()> = Mutex::const_new(());

async fn setup_pool() -> anyhow::Result<PgPool> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL")?;
    let pool = PgPool::connect(&url).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

async fn create_fixture_user(pool: &PgPool) -> anyhow::Result<User> {
    let user = User::create(
        pool,
        CreateUser {
            email: format!("worker-{}@example.com", Uuid::new_v4()),
            password_hash: hash_password("TestPass123")?,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            phone: None,
        },
    )
    .await?;
    Ok(user)
}

async fn create_fixture_vehicle(
    pool: &PgPool,
    user_id: Uuid,
    odometer: i32,
) -> anyhow::Result<Vehicle> {
    let registration = format!(
        "WRK{}",
        &Uuid::new_v4().simple().to_string()[..10].to_uppercase()
    );
    let vehicle = Vehicle::create(
        pool,
        CreateVehicle {
            user_id,
            make: "Honda".to_string(),
            model: "City".to_string(),
            year: 2022,
            registration_number: registration,
            vehicle_type: VehicleType::Car,
            fuel_type: FuelType::Petrol,
            chassis_number: None,
            engine_number: None,
            color: None,
            purchase_date: None,
            purchase_odometer: None,
            current_odometer: Some(odometer),
        },
    )
    .await?;
    Ok(vehicle)
}

/// Notification rows for a user as (type, title, message), oldest first
async fn notifications_for(pool: &PgPool, user_id: Uuid) -> Vec<(String, String, String)> {
    sqlx::query_as(
        "SELECT notification_type::text, title, message
         FROM notifications
         WHERE user_id = $1
         ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .unwrap()
}

async fn cleanup(pool: &PgPool, user_id: Uuid) {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_insurance_reminder_created_once() {
    let _guard = CYCLE_LOCK.lock().await;
    let pool = setup_pool().await.unwrap();
    let user = create_fixture_user(&pool).await.unwrap();
    let vehicle = create_fixture_vehicle(&pool, user.id, 10_000).await.unwrap();

    let expiry = Utc::now().date_naive() + Duration::days(10);
    Insurance::create(
        &pool,
        CreateInsurance {
            vehicle_id: vehicle.id,
            policy_number: "POL-TEST-001".to_string(),
            insurance_company: "Acme Insurance".to_string(),
            premium_amount: None,
            start_date: None,
            expiry_date: expiry,
        },
    )
    .await
    .unwrap();

    reminders::run_cycle(&pool, 30).await;

    let rows = notifications_for(&pool, user.id).await;
    assert_eq!(rows.len(), 1, "expected exactly one notification: {rows:?}");
    assert_eq!(rows[0].0, "insurance");
    assert_eq!(rows[0].1, "Insurance Renewal Reminder");
    assert!(
        rows[0].2.contains("expires in 10 days"),
        "unexpected message: {}",
        rows[0].2
    );
    assert!(rows[0].2.contains("POL-TEST-001"));

    // A second cycle inside the dedup window stays quiet
    reminders::run_cycle(&pool, 30).await;
    let rows = notifications_for(&pool, user.id).await;
    assert_eq!(rows.len(), 1, "dedup window should suppress a repeat");

    cleanup(&pool, user.id).await;
}

#[tokio::test]
async fn test_expiry_outside_window_is_ignored() {
    let _guard = CYCLE_LOCK.lock().await;
    let pool = setup_pool().await.unwrap();
    let user = create_fixture_user(&pool).await.unwrap();
    let vehicle = create_fixture_vehicle(&pool, user.id, 10_000).await.unwrap();

    // 60 days out with a 30-day window; nothing should fire
    let expiry = Utc::now().date_naive() + Duration::days(60);
    Insurance::create(
        &pool,
        CreateInsurance {
            vehicle_id: vehicle.id,
            policy_number: "POL-TEST-002".to_string(),
            insurance_company: "Acme Insurance".to_string(),
            premium_amount: None,
            start_date: None,
            expiry_date: expiry,
        },
    )
    .await
    .unwrap();

    reminders::run_cycle(&pool, 30).await;

    let rows = notifications_for(&pool, user.id).await;
    assert!(rows.is_empty(), "expected no notifications: {rows:?}");

    cleanup(&pool, user.id).await;
}

#[tokio::test]
async fn test_puc_reminder_mentions_testing_center() {
    let _guard = CYCLE_LOCK.lock().await;
    let pool = setup_pool().await.unwrap();
    let user = create_fixture_user(&pool).await.unwrap();
    let vehicle = create_fixture_vehicle(&pool, user.id, 10_000).await.unwrap();

    let today = Utc::now().date_naive();
    PucCertificate::create(
        &pool,
        CreatePuc {
            vehicle_id: vehicle.id,
            certificate_number: "PUC-TEST-001".to_string(),
            testing_center: Some("City Emission Center".to_string()),
            test_date: Some(today - Duration::days(170)),
            expiry_date: today + Duration::days(7),
        },
    )
    .await
    .unwrap();

    reminders::run_cycle(&pool, 30).await;

    let rows = notifications_for(&pool, user.id).await;
    assert_eq!(rows.len(), 1, "expected exactly one notification: {rows:?}");
    assert_eq!(rows[0].0, "puc");
    assert_eq!(rows[0].1, "PUC Certificate Expiry");
    assert!(rows[0].2.contains("Tested at: City Emission Center"));

    cleanup(&pool, user.id).await;
}

#[tokio::test]
async fn test_service_reminder_by_odometer() {
    let _guard = CYCLE_LOCK.lock().await;
    let pool = setup_pool().await.unwrap();
    let user = create_fixture_user(&pool).await.unwrap();
    // 300 km short of the next service reading
    let vehicle = create_fixture_vehicle(&pool, user.id, 14_700).await.unwrap();

    let today = Utc::now().date_naive();
    ServiceRecord::create(
        &pool,
        CreateServiceRecord {
            vehicle_id: vehicle.id,
            service_date: today - Duration::days(90),
            service_type: "general".to_string(),
            odometer_reading: Some(10_000),
            cost: Some(3200.0),
            service_center: None,
            description: None,
            next_service_date: None,
            next_service_odometer: Some(15_000),
        },
    )
    .await
    .unwrap();

    reminders::run_cycle(&pool, 30).await;

    let rows = notifications_for(&pool, user.id).await;
    assert_eq!(rows.len(), 1, "expected exactly one notification: {rows:?}");
    assert_eq!(rows[0].0, "service");
    assert_eq!(rows[0].1, "Service Due Reminder");
    assert!(
        rows[0].2.contains("odometer reading 15000 km"),
        "unexpected message: {}",
        rows[0].2
    );

    cleanup(&pool, user.id).await;
}
