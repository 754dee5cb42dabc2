/// Vehicle endpoints
///
/// CRUD for the caller's fleet plus aggregate views. Every query is
/// scoped to the authenticated user; other users' vehicles and
/// soft-deleted vehicles answer 404.
///
/// # Endpoints
///
/// - `POST /api/vehicles` - Register a vehicle
/// - `GET /api/vehicles` - Paginated list
/// - `GET /api/vehicles/stats` - Fleet aggregate counts
/// - `GET /api/vehicles/renewals` - Upcoming insurance/PUC expiries
/// - `GET /api/vehicles/:id` - Single vehicle
/// - `PUT /api/vehicles/:id` - Partial update
/// - `PATCH /api/vehicles/:id/odometer` - Set odometer reading
/// - `DELETE /api/vehicles/:id` - Soft delete

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    response::{ApiResponse, MessageResponse, Pagination},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use motolog_shared::{
    auth::middleware::AuthContext,
    models::vehicle::{
        CreateVehicle, FuelType, UpcomingRenewal, UpdateVehicle, Vehicle, VehicleStats,
        VehicleType,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Vehicle creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2, max = 50, message = "Make must be between 2 and 50 characters"))]
    pub make: String,

    #[validate(length(min = 2, max = 50, message = "Model must be between 2 and 50 characters"))]
    pub model: String,

    /// Manufacturing year, checked against the calendar in the handler
    pub year: i32,

    pub vehicle_type: VehicleType,

    pub fuel_type: FuelType,

    #[validate(length(
        min = 5,
        max = 20,
        message = "Registration number must be between 5 and 20 characters"
    ))]
    pub registration_number: String,

    #[validate(length(
        min = 10,
        max = 50,
        message = "Chassis number must be between 10 and 50 characters"
    ))]
    pub chassis_number: Option<String>,

    #[validate(length(
        min = 5,
        max = 50,
        message = "Engine number must be between 5 and 50 characters"
    ))]
    pub engine_number: Option<String>,

    pub color: Option<String>,

    pub purchase_date: Option<NaiveDate>,

    #[validate(range(min = 0, message = "Purchase odometer must be a non-negative integer"))]
    pub purchase_odometer: Option<i32>,

    #[validate(range(min = 0, message = "Current odometer must be a non-negative integer"))]
    pub current_odometer: Option<i32>,
}

/// Vehicle update request. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 2, max = 50, message = "Make must be between 2 and 50 characters"))]
    pub make: Option<String>,

    #[validate(length(min = 2, max = 50, message = "Model must be between 2 and 50 characters"))]
    pub model: Option<String>,

    pub year: Option<i32>,

    pub vehicle_type: Option<VehicleType>,

    pub fuel_type: Option<FuelType>,

    #[validate(length(
        min = 5,
        max = 20,
        message = "Registration number must be between 5 and 20 characters"
    ))]
    pub registration_number: Option<String>,

    #[validate(length(
        min = 10,
        max = 50,
        message = "Chassis number must be between 10 and 50 characters"
    ))]
    pub chassis_number: Option<String>,

    #[validate(length(
        min = 5,
        max = 50,
        message = "Engine number must be between 5 and 50 characters"
    ))]
    pub engine_number: Option<String>,

    pub color: Option<String>,

    pub purchase_date: Option<NaiveDate>,
}

/// Odometer update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOdometerRequest {
    pub odometer_reading: Option<i32>,
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Renewal lookahead query parameters
#[derive(Debug, Deserialize)]
pub struct RenewalQuery {
    pub days: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct VehiclePayload {
    pub vehicle: Vehicle,
}

#[derive(Debug, Serialize)]
pub struct VehicleListPayload {
    pub vehicles: Vec<Vehicle>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct VehicleStatsPayload {
    pub stats: VehicleStats,
}

#[derive(Debug, Serialize)]
pub struct RenewalsPayload {
    pub renewals: Vec<UpcomingRenewal>,
}

/// Checks the year against the calendar (1900 through next year).
fn validate_year(year: i32) -> Result<(), ValidationErrorDetail> {
    let max_year = Utc::now().year() + 1;
    if year < 1900 || year > max_year {
        return Err(ValidationErrorDetail {
            field: "year".to_string(),
            message: "Please provide a valid year".to_string(),
        });
    }
    Ok(())
}

/// Registration plates carry letters and digits only.
fn validate_registration(value: &str) -> Result<(), ValidationErrorDetail> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationErrorDetail {
            field: "registrationNumber".to_string(),
            message: "Registration number should contain only letters and numbers".to_string(),
        });
    }
    Ok(())
}

/// Register a new vehicle
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Registration number already used by the caller
pub async fn create_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateVehicleRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<VehiclePayload>>)> {
    req.validate()?;
    validate_year(req.year).map_err(|detail| ApiError::ValidationError(vec![detail]))?;
    validate_registration(&req.registration_number)
        .map_err(|detail| ApiError::ValidationError(vec![detail]))?;

    // Friendly duplicate check; the unique index is the real guard
    let existing =
        Vehicle::find_by_registration(&state.db, auth.user_id, &req.registration_number).await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "Vehicle with this registration number already exists".to_string(),
        ));
    }

    let vehicle = Vehicle::create(
        &state.db,
        CreateVehicle {
            user_id: auth.user_id,
            make: req.make,
            model: req.model,
            year: req.year,
            registration_number: req.registration_number,
            vehicle_type: req.vehicle_type,
            fuel_type: req.fuel_type,
            chassis_number: req.chassis_number,
            engine_number: req.engine_number,
            color: req.color,
            purchase_date: req.purchase_date,
            purchase_odometer: req.purchase_odometer,
            current_odometer: req.current_odometer,
        },
    )
    .await?;

    tracing::info!(vehicle_id = %vehicle.id, user_id = %auth.user_id, "Vehicle created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Vehicle created successfully",
            VehiclePayload { vehicle },
        )),
    ))
}

/// Paginated list of the caller's active vehicles, newest first
pub async fn list_vehicles(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ApiResponse<VehicleListPayload>>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).max(1);
    let offset = (page - 1) * limit;

    let vehicles = Vehicle::list_by_user(&state.db, auth.user_id, limit, offset).await?;
    let total = Vehicle::count_by_user(&state.db, auth.user_id).await?;

    Ok(Json(ApiResponse::new(VehicleListPayload {
        vehicles,
        pagination: Pagination::new(page, limit, total),
    })))
}

/// Aggregate counts for the caller's fleet
pub async fn vehicle_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<VehicleStatsPayload>>> {
    let stats = Vehicle::stats(&state.db, auth.user_id).await?;

    Ok(Json(ApiResponse::new(VehicleStatsPayload { stats })))
}

/// Vehicles with insurance or PUC expiring inside the lookahead window
pub async fn upcoming_renewals(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<RenewalQuery>,
) -> ApiResult<Json<ApiResponse<RenewalsPayload>>> {
    let days = query.days.unwrap_or(30);

    let renewals = Vehicle::upcoming_renewals(&state.db, auth.user_id, days).await?;

    Ok(Json(ApiResponse::new(RenewalsPayload { renewals })))
}

/// Single vehicle by ID
pub async fn get_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<VehiclePayload>>> {
    let vehicle = Vehicle::find_by_id(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    Ok(Json(ApiResponse::new(VehiclePayload { vehicle })))
}

/// Partial update of a vehicle's descriptive fields
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: Vehicle missing, inactive, or another user's
/// - `409 Conflict`: New registration number already used by the caller
pub async fn update_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateVehicleRequest>,
) -> ApiResult<Json<ApiResponse<VehiclePayload>>> {
    req.validate()?;
    if let Some(year) = req.year {
        validate_year(year).map_err(|detail| ApiError::ValidationError(vec![detail]))?;
    }
    if let Some(registration) = &req.registration_number {
        validate_registration(registration)
            .map_err(|detail| ApiError::ValidationError(vec![detail]))?;
    }

    let existing = Vehicle::find_by_id(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    // Changing the plate re-checks for a clash with another vehicle
    if let Some(registration) = &req.registration_number {
        if *registration != existing.registration_number {
            let conflict =
                Vehicle::find_by_registration(&state.db, auth.user_id, registration).await?;
            if conflict.is_some() {
                return Err(ApiError::Conflict(
                    "Vehicle with this registration number already exists".to_string(),
                ));
            }
        }
    }

    let vehicle = Vehicle::update(
        &state.db,
        id,
        auth.user_id,
        UpdateVehicle {
            make: req.make,
            model: req.model,
            year: req.year,
            registration_number: req.registration_number,
            vehicle_type: req.vehicle_type,
            fuel_type: req.fuel_type,
            chassis_number: req.chassis_number.map(Some),
            engine_number: req.engine_number.map(Some),
            color: req.color.map(Some),
            purchase_date: req.purchase_date.map(Some),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(
        "Vehicle updated successfully",
        VehiclePayload { vehicle },
    )))
}

/// Set the current odometer reading
///
/// # Errors
///
/// - `400 Bad Request`: Missing or negative reading
/// - `404 Not Found`: Vehicle missing, inactive, or another user's
pub async fn update_odometer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOdometerRequest>,
) -> ApiResult<Json<ApiResponse<VehiclePayload>>> {
    let reading = req
        .odometer_reading
        .filter(|reading| *reading >= 0)
        .ok_or_else(|| ApiError::BadRequest("Valid odometer reading is required".to_string()))?;

    let vehicle = Vehicle::update_odometer(&state.db, id, auth.user_id, reading)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(
        "Odometer updated successfully",
        VehiclePayload { vehicle },
    )))
}

/// Soft-delete a vehicle
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Vehicle::soft_delete(&state.db, id, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Vehicle not found".to_string()));
    }

    tracing::info!(vehicle_id = %id, user_id = %auth.user_id, "Vehicle deleted");

    Ok(Json(MessageResponse::new("Vehicle deleted successfully")))
}
