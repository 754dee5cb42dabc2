/// Fuel entry endpoints
///
/// Fill-up logging and consumption statistics. Mileage is derived at
/// write time against the previous entry by odometer order; creating an
/// entry also advances the vehicle's odometer when the new reading is
/// higher.
///
/// # Endpoints
///
/// - `POST /api/fuel` - Log a fill-up
/// - `GET /api/fuel/recent` - Latest entries across the caller's fleet
/// - `GET /api/fuel/vehicle/:vehicleId` - Entries for one vehicle
/// - `GET /api/fuel/vehicle/:vehicleId/stats/monthly` - Monthly aggregates
/// - `GET /api/fuel/vehicle/:vehicleId/stats/mileage` - Average mileage
/// - `GET /api/fuel/vehicle/:vehicleId/stats/expense` - Total spend
/// - `GET /api/fuel/:id` / `PUT /api/fuel/:id` / `DELETE /api/fuel/:id`

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
use chrono::NaiveDate;
use motolog_shared::{
    auth::middleware::AuthContext,
    models::{
        fuel_entry::{
            CreateFuelEntry, FuelEntry, MonthlyFuelStats, RecentFuelEntry, UpdateFuelEntry,
        },
        vehicle::{FuelType, Vehicle},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Fuel entry creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFuelEntryRequest {
    pub vehicle_id: Uuid,

    pub fuel_date: NaiveDate,

    #[validate(range(min = 0, message = "Odometer reading must be a non-negative integer"))]
    pub odometer_reading: i32,

    #[validate(range(min = 0.1, message = "Fuel quantity must be greater than 0"))]
    pub fuel_quantity: f64,

    #[validate(range(min = 0.1, message = "Fuel price per liter must be greater than 0"))]
    pub price_per_liter: f64,

    #[validate(range(min = 0.1, message = "Total cost must be greater than 0"))]
    pub total_cost: f64,

    /// Only pumpable fuels are valid here; checked in the handler
    pub fuel_type: String,

    #[validate(length(max = 100, message = "Fuel station name must be less than 100 characters"))]
    pub fuel_station: Option<String>,

    pub notes: Option<String>,
}

/// Fuel entry update request. Omitted fields keep their stored values.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFuelEntryRequest {
    pub fuel_date: Option<NaiveDate>,

    #[validate(range(min = 0, message = "Odometer reading must be a non-negative integer"))]
    pub odometer_reading: Option<i32>,

    #[validate(range(min = 0.1, message = "Fuel quantity must be greater than 0"))]
    pub fuel_quantity: Option<f64>,

    #[validate(range(min = 0.1, message = "Fuel price per liter must be greater than 0"))]
    pub price_per_liter: Option<f64>,

    #[validate(range(min = 0.1, message = "Total cost must be greater than 0"))]
    pub total_cost: Option<f64>,

    pub fuel_type: Option<String>,

    #[validate(length(max = 100, message = "Fuel station name must be less than 100 characters"))]
    pub fuel_station: Option<String>,

    pub notes: Option<String>,
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Recent entries query parameters
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// Monthly statistics query parameters
#[derive(Debug, Deserialize)]
pub struct MonthsQuery {
    pub months: Option<i32>,
}

/// Expense range query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelEntryPayload {
    pub fuel_entry: FuelEntry,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelEntryListPayload {
    pub fuel_entries: Vec<FuelEntry>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct MonthlyStatsPayload {
    pub stats: Vec<MonthlyFuelStats>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageMileagePayload {
    pub average_mileage: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalExpensePayload {
    pub total_expense: f64,
}

#[derive(Debug, Serialize)]
pub struct RecentEntriesPayload {
    pub entries: Vec<RecentFuelEntry>,
}

/// Fill-ups accept pumpable fuels only, regardless of what the vehicle
/// itself runs on (hybrids refuel with petrol).
fn parse_fuel_type(value: &str) -> Result<FuelType, ValidationErrorDetail> {
    match value {
        "petrol" => Ok(FuelType::Petrol),
        "diesel" => Ok(FuelType::Diesel),
        "cng" => Ok(FuelType::Cng),
        _ => Err(ValidationErrorDetail {
            field: "fuelType".to_string(),
            message: "Invalid fuel type".to_string(),
        }),
    }
}

/// Log a fill-up
///
/// Derives the entry's mileage, then advances the vehicle's odometer if
/// this reading is the highest seen.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or the reading is below the
///   vehicle's current odometer
/// - `404 Not Found`: Vehicle missing, inactive, or another user's
pub async fn create_fuel_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateFuelEntryRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<FuelEntryPayload>>)> {
    req.validate()?;
    let fuel_type = parse_fuel_type(&req.fuel_type)
        .map_err(|detail| ApiError::ValidationError(vec![detail]))?;

    let vehicle = Vehicle::find_by_id(&state.db, req.vehicle_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    if req.odometer_reading < vehicle.current_odometer {
        return Err(ApiError::BadRequest(
            "Odometer reading cannot be less than current vehicle odometer".to_string(),
        ));
    }

    let entry = FuelEntry::create(
        &state.db,
        CreateFuelEntry {
            vehicle_id: req.vehicle_id,
            fuel_date: req.fuel_date,
            odometer_reading: req.odometer_reading,
            fuel_quantity: req.fuel_quantity,
            price_per_liter: req.price_per_liter,
            total_cost: req.total_cost,
            fuel_type,
            fuel_station: req.fuel_station,
            notes: req.notes,
        },
    )
    .await?;

    if entry.odometer_reading > vehicle.current_odometer {
        Vehicle::update_odometer(&state.db, req.vehicle_id, auth.user_id, entry.odometer_reading)
            .await?;
    }

    tracing::info!(entry_id = %entry.id, vehicle_id = %req.vehicle_id, "Fuel entry created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Fuel entry created successfully",
            FuelEntryPayload { fuel_entry: entry },
        )),
    ))
}

/// Latest entries across the caller's active vehicles
pub async fn recent_entries(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<ApiResponse<RecentEntriesPayload>>> {
    let limit = query.limit.unwrap_or(10).max(1);

    let entries = FuelEntry::recent_for_user(&state.db, auth.user_id, limit).await?;

    Ok(Json(ApiResponse::new(RecentEntriesPayload { entries })))
}

/// Paginated entries for one vehicle, newest first
pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(vehicle_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ApiResponse<FuelEntryListPayload>>> {
    Vehicle::find_by_id(&state.db, vehicle_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(50).max(1);
    let offset = (page - 1) * limit;

    let fuel_entries =
        FuelEntry::list_by_vehicle(&state.db, vehicle_id, auth.user_id, limit, offset).await?;
    let total = FuelEntry::count_by_vehicle(&state.db, vehicle_id, auth.user_id).await?;

    Ok(Json(ApiResponse::new(FuelEntryListPayload {
        fuel_entries,
        pagination: Pagination::new(page, limit, total),
    })))
}

/// Per-month fuel aggregates for one vehicle
pub async fn monthly_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(vehicle_id): Path<Uuid>,
    Query(query): Query<MonthsQuery>,
) -> ApiResult<Json<ApiResponse<MonthlyStatsPayload>>> {
    Vehicle::find_by_id(&state.db, vehicle_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let months = query.months.unwrap_or(12).max(1);

    let stats = FuelEntry::monthly_stats(&state.db, vehicle_id, months).await?;

    Ok(Json(ApiResponse::new(MonthlyStatsPayload { stats })))
}

/// Average derived mileage for one vehicle
///
/// Null until the vehicle has at least one entry with derived mileage.
pub async fn mileage_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(vehicle_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<AverageMileagePayload>>> {
    Vehicle::find_by_id(&state.db, vehicle_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let average_mileage = FuelEntry::average_mileage(&state.db, vehicle_id).await?;

    Ok(Json(ApiResponse::new(AverageMileagePayload {
        average_mileage,
    })))
}

/// Total fuel spend for one vehicle, optionally bounded by dates
pub async fn expense_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(vehicle_id): Path<Uuid>,
    Query(query): Query<ExpenseQuery>,
) -> ApiResult<Json<ApiResponse<TotalExpensePayload>>> {
    Vehicle::find_by_id(&state.db, vehicle_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let total_expense =
        FuelEntry::total_expense(&state.db, vehicle_id, query.start_date, query.end_date).await?;

    Ok(Json(ApiResponse::new(TotalExpensePayload { total_expense })))
}

/// Single fuel entry by ID
pub async fn get_fuel_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<FuelEntryPayload>>> {
    let entry = FuelEntry::find_by_id(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Fuel entry not found".to_string()))?;

    Ok(Json(ApiResponse::new(FuelEntryPayload { fuel_entry: entry })))
}

/// Partial update of a fuel entry
///
/// Stored values fill in any omitted fields and the mileage is recomputed
/// from the final reading. The vehicle's odometer is not touched here.
pub async fn update_fuel_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateFuelEntryRequest>,
) -> ApiResult<Json<ApiResponse<FuelEntryPayload>>> {
    req.validate()?;

    let fuel_type = match &req.fuel_type {
        Some(value) => Some(
            parse_fuel_type(value).map_err(|detail| ApiError::ValidationError(vec![detail]))?,
        ),
        None => None,
    };

    let existing = FuelEntry::find_by_id(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Fuel entry not found".to_string()))?;

    let merged = UpdateFuelEntry {
        fuel_date: req.fuel_date.unwrap_or(existing.fuel_date),
        odometer_reading: req.odometer_reading.unwrap_or(existing.odometer_reading),
        fuel_quantity: req.fuel_quantity.unwrap_or(existing.fuel_quantity),
        price_per_liter: req.price_per_liter.unwrap_or(existing.price_per_liter),
        total_cost: req.total_cost.unwrap_or(existing.total_cost),
        fuel_type: fuel_type.unwrap_or(existing.fuel_type),
        fuel_station: req.fuel_station.or(existing.fuel_station),
        notes: req.notes.or(existing.notes),
    };

    let entry = FuelEntry::update(&state.db, id, existing.vehicle_id, merged)
        .await?
        .ok_or_else(|| ApiError::NotFound("Fuel entry not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(
        "Fuel entry updated successfully",
        FuelEntryPayload { fuel_entry: entry },
    )))
}

/// Delete a fuel entry
pub async fn delete_fuel_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = FuelEntry::delete(&state.db, id, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Fuel entry not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Fuel entry deleted successfully")))
}
