/// Service record endpoints
///
/// Service history per vehicle. The latest record's next-service data
/// feeds the reminder worker and the dashboard.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::{ApiResponse, MessageResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use motolog_shared::{
    auth::middleware::AuthContext,
    models::{
        service_record::{CreateServiceRecord, ServiceRecord, UpdateServiceRecord},
        vehicle::Vehicle,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Service record creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRecordRequest {
    pub vehicle_id: Uuid,

    pub service_date: NaiveDate,

    #[validate(length(min = 1, max = 100, message = "Service type is required"))]
    pub service_type: String,

    #[validate(range(min = 0, message = "Odometer reading must be a non-negative integer"))]
    pub odometer_reading: Option<i32>,

    #[validate(range(min = 0.0, message = "Cost must be a non-negative number"))]
    pub cost: Option<f64>,

    #[validate(length(max = 100, message = "Service center must be less than 100 characters"))]
    pub service_center: Option<String>,

    pub description: Option<String>,

    pub next_service_date: Option<NaiveDate>,

    #[validate(range(min = 0, message = "Next service odometer must be a non-negative integer"))]
    pub next_service_odometer: Option<i32>,
}

/// Service record update request. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRecordRequest {
    pub service_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 100, message = "Service type is required"))]
    pub service_type: Option<String>,

    #[validate(range(min = 0, message = "Odometer reading must be a non-negative integer"))]
    pub odometer_reading: Option<i32>,

    #[validate(range(min = 0.0, message = "Cost must be a non-negative number"))]
    pub cost: Option<f64>,

    #[validate(length(max = 100, message = "Service center must be less than 100 characters"))]
    pub service_center: Option<String>,

    pub description: Option<String>,

    pub next_service_date: Option<NaiveDate>,

    #[validate(range(min = 0, message = "Next service odometer must be a non-negative integer"))]
    pub next_service_odometer: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ServiceRecordPayload {
    pub service: ServiceRecord,
}

#[derive(Debug, Serialize)]
pub struct ServiceRecordListPayload {
    pub services: Vec<ServiceRecord>,
}

/// Record a service visit
pub async fn create_service_record(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateServiceRecordRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ServiceRecordPayload>>)> {
    req.validate()?;

    Vehicle::find_by_id(&state.db, req.vehicle_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let service = ServiceRecord::create(
        &state.db,
        CreateServiceRecord {
            vehicle_id: req.vehicle_id,
            service_date: req.service_date,
            service_type: req.service_type,
            odometer_reading: req.odometer_reading,
            cost: req.cost,
            service_center: req.service_center,
            description: req.description,
            next_service_date: req.next_service_date,
            next_service_odometer: req.next_service_odometer,
        },
    )
    .await?;

    tracing::info!(service_id = %service.id, vehicle_id = %req.vehicle_id, "Service record created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Service record created successfully",
            ServiceRecordPayload { service },
        )),
    ))
}

/// Service history for one vehicle, newest first
pub async fn list_service_records(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(vehicle_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ServiceRecordListPayload>>> {
    Vehicle::find_by_id(&state.db, vehicle_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let services = ServiceRecord::list_by_vehicle(&state.db, vehicle_id, auth.user_id).await?;

    Ok(Json(ApiResponse::new(ServiceRecordListPayload { services })))
}

/// Partial update of a service record
pub async fn update_service_record(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateServiceRecordRequest>,
) -> ApiResult<Json<ApiResponse<ServiceRecordPayload>>> {
    req.validate()?;

    let service = ServiceRecord::update(
        &state.db,
        id,
        auth.user_id,
        UpdateServiceRecord {
            service_date: req.service_date,
            service_type: req.service_type,
            odometer_reading: req.odometer_reading.map(Some),
            cost: req.cost.map(Some),
            service_center: req.service_center.map(Some),
            description: req.description.map(Some),
            next_service_date: req.next_service_date.map(Some),
            next_service_odometer: req.next_service_odometer.map(Some),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Service record not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(
        "Service record updated successfully",
        ServiceRecordPayload { service },
    )))
}

/// Delete a service record
pub async fn delete_service_record(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = ServiceRecord::delete(&state.db, id, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Service record not found".to_string()));
    }

    Ok(Json(MessageResponse::new(
        "Service record deleted successfully",
    )))
}
