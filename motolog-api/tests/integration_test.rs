/// Integration tests for the MotoLog API
///
/// These tests verify the full system works end-to-end:
/// - Registration and login flow
/// - Vehicle CRUD with ownership scoping
/// - Fuel entries with mileage derivation and odometer advancement
/// - Compliance record lifecycle
/// - Dashboard aggregates
/// - Authentication enforcement and rate limit headers
///
/// A running PostgreSQL database is required; see common/mod.rs.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::TestContext;
use serde_json::{json, Value};
use tower::Service as _;
use uuid::Uuid;

/// Sends an authenticated request and returns status plus parsed body
async fn send(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, ctx.auth_header());

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = ctx.app.clone().call(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Creates a vehicle and returns its ID
async fn create_vehicle(ctx: &TestContext) -> Uuid {
    let registration = common::unique_registration();
    let (status, body) = send(
        ctx,
        "POST",
        "/api/vehicles",
        Some(common::vehicle_body(&registration)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "vehicle create failed: {body}");

    body["data"]["vehicle"]["id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .expect("vehicle id in response")
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(&ctx, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "up");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_register_and_login() {
    let ctx = TestContext::new().await.unwrap();
    let email = format!("register-{}@example.com", Uuid::new_v4());

    let (status, body) = send(
        &ctx,
        "POST",
        "/api/auth/register",
        Some(json!({
            "firstName": "Asha",
            "lastName": "Rao",
            "email": email,
            "password": "Sekret123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["user"]["email"], json!(email));
    assert!(body["data"]["token"].is_string());
    // The password hash must never appear in a response
    assert!(body["data"]["user"].get("password_hash").is_none());

    let (status, body) = send(
        &ctx,
        "POST",
        "/api/auth/login",
        Some(json!({ "email": email, "password": "Sekret123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert!(body["data"]["token"].is_string());

    let (status, body) = send(
        &ctx,
        "POST",
        "/api/auth/login",
        Some(json!({ "email": email, "password": "WrongPass1" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    // Unknown accounts get the same answer as wrong passwords
    let (status, body) = send(
        &ctx,
        "POST",
        "/api/auth/login",
        Some(json!({
            "email": format!("nobody-{}@example.com", Uuid::new_v4()),
            "password": "Sekret123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(
        &ctx,
        "POST",
        "/api/auth/register",
        Some(json!({
            "firstName": "Asha",
            "lastName": "Rao",
            "email": format!("weak-{}@example.com", Uuid::new_v4()),
            "password": "short"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["errors"].is_array());
    assert_eq!(body["errors"][0]["field"], "password");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_authentication_required() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/api/vehicles")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_vehicle_crud() {
    let ctx = TestContext::new().await.unwrap();
    let registration = common::unique_registration();

    let (status, body) = send(
        &ctx,
        "POST",
        "/api/vehicles",
        Some(common::vehicle_body(&registration)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Vehicle created successfully");
    assert_eq!(body["data"]["vehicle"]["registration_number"], json!(registration));
    let vehicle_id = body["data"]["vehicle"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&ctx, "GET", "/api/vehicles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["page"], json!(1));
    assert!(body["data"]["vehicles"].as_array().unwrap().len() >= 1);

    let (status, body) = send(
        &ctx,
        "PUT",
        &format!("/api/vehicles/{vehicle_id}"),
        Some(json!({ "model": "Amaze" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Vehicle updated successfully");
    assert_eq!(body["data"]["vehicle"]["model"], "Amaze");

    let (status, body) = send(
        &ctx,
        "PATCH",
        &format!("/api/vehicles/{vehicle_id}/odometer"),
        Some(json!({ "odometerReading": 12000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["vehicle"]["current_odometer"], json!(12000));

    let (status, body) = send(
        &ctx,
        "DELETE",
        &format!("/api/vehicles/{vehicle_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Vehicle deleted successfully");

    // Soft-deleted vehicles are gone from the API
    let (status, body) = send(&ctx, "GET", &format!("/api/vehicles/{vehicle_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Vehicle not found");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_registration_conflict() {
    let ctx = TestContext::new().await.unwrap();
    let registration = common::unique_registration();

    let (status, _) = send(
        &ctx,
        "POST",
        "/api/vehicles",
        Some(common::vehicle_body(&registration)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &ctx,
        "POST",
        "/api/vehicles",
        Some(common::vehicle_body(&registration)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Vehicle with this registration number already exists"
    );

    // Renaming a second vehicle onto the taken plate collides too
    let other_id = create_vehicle(&ctx).await;
    let (status, body) = send(
        &ctx,
        "PUT",
        &format!("/api/vehicles/{other_id}"),
        Some(json!({ "registrationNumber": registration })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Vehicle with this registration number already exists"
    );

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_cross_user_isolation() {
    let owner = TestContext::new().await.unwrap();
    let intruder = TestContext::new().await.unwrap();

    let vehicle_id = create_vehicle(&owner).await;
    let (status, body) = send(
        &owner,
        "POST",
        "/api/fuel",
        Some(json!({
            "vehicleId": vehicle_id,
            "fuelDate": "2025-03-01",
            "odometerReading": 10200,
            "fuelQuantity": 8.0,
            "pricePerLiter": 100.0,
            "totalCost": 800.0,
            "fuelType": "petrol"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let entry_id = body["data"]["fuelEntry"]["id"].as_str().unwrap().to_string();

    // Another user's records answer 404, never 403
    let (status, body) = send(
        &intruder,
        "GET",
        &format!("/api/vehicles/{vehicle_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Vehicle not found");

    let (status, body) = send(
        &intruder,
        "GET",
        &format!("/api/fuel/vehicle/{vehicle_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Vehicle not found");

    let (status, body) = send(&intruder, "DELETE", &format!("/api/fuel/{entry_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Fuel entry not found");

    // The owner still sees everything
    let (status, _) = send(&owner, "GET", &format!("/api/vehicles/{vehicle_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    intruder.cleanup().await.unwrap();
    owner.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_vehicle_validation_errors() {
    let ctx = TestContext::new().await.unwrap();

    let mut body = common::vehicle_body(&common::unique_registration());
    body["make"] = json!("X");
    body["year"] = json!(1850);

    let (status, body) = send(&ctx, "POST", "/api/vehicles", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], "Validation failed");
    let errors = body["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .any(|e| e["message"] == "Make must be between 2 and 50 characters"));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_fuel_entry_mileage_derivation() {
    let ctx = TestContext::new().await.unwrap();
    let vehicle_id = create_vehicle(&ctx).await;

    // First fill-up has nothing to derive from
    let (status, body) = send(
        &ctx,
        "POST",
        "/api/fuel",
        Some(json!({
            "vehicleId": vehicle_id,
            "fuelDate": "2025-01-05",
            "odometerReading": 10000,
            "fuelQuantity": 9.0,
            "pricePerLiter": 100.0,
            "totalCost": 900.0,
            "fuelType": "petrol"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "first entry failed: {body}");
    assert_eq!(body["data"]["fuelEntry"]["mileage"], Value::Null);

    // 400 km on 8 liters since the previous entry
    let (status, body) = send(
        &ctx,
        "POST",
        "/api/fuel",
        Some(json!({
            "vehicleId": vehicle_id,
            "fuelDate": "2025-01-15",
            "odometerReading": 10400,
            "fuelQuantity": 8.0,
            "pricePerLiter": 105.0,
            "totalCost": 840.0,
            "fuelType": "petrol"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["fuelEntry"]["mileage"], json!(50.0));

    // The vehicle's odometer follows the highest reading
    let (status, body) = send(&ctx, "GET", &format!("/api/vehicles/{vehicle_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["vehicle"]["current_odometer"], json!(10400));

    // Readings below the vehicle's odometer are rejected
    let (status, body) = send(
        &ctx,
        "POST",
        "/api/fuel",
        Some(json!({
            "vehicleId": vehicle_id,
            "fuelDate": "2025-01-20",
            "odometerReading": 10300,
            "fuelQuantity": 5.0,
            "pricePerLiter": 100.0,
            "totalCost": 500.0,
            "fuelType": "petrol"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Odometer reading cannot be less than current vehicle odometer"
    );

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_fuel_statistics() {
    let ctx = TestContext::new().await.unwrap();
    let vehicle_id = create_vehicle(&ctx).await;

    for (odometer, quantity, total, date) in [
        (10000, 9.0, 900.0, "2025-02-01"),
        (10400, 8.0, 840.0, "2025-02-15"),
    ] {
        let (status, _) = send(
            &ctx,
            "POST",
            "/api/fuel",
            Some(json!({
                "vehicleId": vehicle_id,
                "fuelDate": date,
                "odometerReading": odometer,
                "fuelQuantity": quantity,
                "pricePerLiter": 100.0,
                "totalCost": total,
                "fuelType": "petrol"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &ctx,
        "GET",
        &format!("/api/fuel/vehicle/{vehicle_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fuelEntries"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["pagination"]["total"], json!(2));

    let (status, body) = send(
        &ctx,
        "GET",
        &format!("/api/fuel/vehicle/{vehicle_id}/stats/mileage"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["averageMileage"], json!(50.0));

    let (status, body) = send(
        &ctx,
        "GET",
        &format!("/api/fuel/vehicle/{vehicle_id}/stats/expense"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalExpense"], json!(1740.0));

    let (status, body) = send(&ctx, "GET", "/api/fuel/recent", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["entries"].as_array().unwrap().len(), 2);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_insurance_lifecycle() {
    let ctx = TestContext::new().await.unwrap();
    let vehicle_id = create_vehicle(&ctx).await;

    let (status, body) = send(
        &ctx,
        "POST",
        "/api/insurance",
        Some(json!({
            "vehicleId": vehicle_id,
            "policyNumber": "POL-2025-042",
            "insuranceCompany": "Acme Insurance",
            "expiryDate": "2026-04-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "insurance create failed: {body}");
    assert_eq!(body["message"], "Insurance policy created successfully");
    let policy_id = body["data"]["insurance"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &ctx,
        "GET",
        &format!("/api/insurance/vehicle/{vehicle_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["policies"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &ctx,
        "PUT",
        &format!("/api/insurance/{policy_id}"),
        Some(json!({ "premiumAmount": 4999.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["insurance"]["premium_amount"], json!(4999.0));

    let (status, body) = send(
        &ctx,
        "DELETE",
        &format!("/api/insurance/{policy_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Insurance policy deleted successfully");

    let (status, body) = send(
        &ctx,
        "DELETE",
        &format!("/api/insurance/{policy_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Insurance policy not found");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_dashboard_overview() {
    let ctx = TestContext::new().await.unwrap();
    let vehicle_id = create_vehicle(&ctx).await;

    // An entry dated today lands in the current-month expense
    let today = chrono::Utc::now().date_naive().to_string();
    let (status, _) = send(
        &ctx,
        "POST",
        "/api/fuel",
        Some(json!({
            "vehicleId": vehicle_id,
            "fuelDate": today,
            "odometerReading": 10500,
            "fuelQuantity": 10.0,
            "pricePerLiter": 100.0,
            "totalCost": 1000.0,
            "fuelType": "petrol"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&ctx, "GET", "/api/dashboard/overview", None).await;
    assert_eq!(status, StatusCode::OK);
    let overview = &body["data"]["overview"];
    assert_eq!(overview["vehicleStats"]["total_vehicles"], json!(1));
    assert_eq!(overview["currentMonthExpense"], json!(1000.0));
    assert_eq!(overview["recentEntries"].as_array().unwrap().len(), 1);
    assert_eq!(overview["unreadNotifications"], json!(0));

    let (status, body) = send(&ctx, "GET", "/api/dashboard/vehicle-health", None).await;
    assert_eq!(status, StatusCode::OK);
    let health = body["data"]["vehicleHealth"].as_array().unwrap();
    assert_eq!(health.len(), 1);
    assert_eq!(health[0]["status"], "healthy");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_notification_not_found() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(
        &ctx,
        "PUT",
        &format!("/api/notifications/{}/read", Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Notification not found");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_rate_limit_headers() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/api/vehicles")
        .header(header::AUTHORIZATION, ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-ratelimit-limit"));
    assert!(response.headers().contains_key("x-ratelimit-remaining"));
    assert!(response.headers().contains_key("x-ratelimit-reset"));

    ctx.cleanup().await.unwrap();
}
