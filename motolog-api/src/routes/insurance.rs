/// Insurance policy endpoints
///
/// One vehicle carries at most one active policy; creating a new policy
/// deactivates the previous ones. History stays queryable per vehicle.
///
/// # Endpoints
///
/// - `POST /api/insurance` - Record a policy
/// - `GET /api/insurance/vehicle/:vehicleId` - Policy history for a vehicle
/// - `PUT /api/insurance/:id` - Partial update
/// - `DELETE /api/insurance/:id` - Hard delete

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
        insurance::{CreateInsurance, Insurance, UpdateInsurance},
        vehicle::Vehicle,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Insurance creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInsuranceRequest {
    pub vehicle_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Policy number is required"))]
    pub policy_number: String,

    #[validate(length(min = 1, max = 100, message = "Insurance company is required"))]
    pub insurance_company: String,

    #[validate(range(min = 0.0, message = "Premium amount must be a non-negative number"))]
    pub premium_amount: Option<f64>,

    pub start_date: Option<NaiveDate>,

    pub expiry_date: NaiveDate,
}

/// Insurance update request. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInsuranceRequest {
    #[validate(length(min = 1, max = 100, message = "Policy number is required"))]
    pub policy_number: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Insurance company is required"))]
    pub insurance_company: Option<String>,

    #[validate(range(min = 0.0, message = "Premium amount must be a non-negative number"))]
    pub premium_amount: Option<f64>,

    pub start_date: Option<NaiveDate>,

    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct InsurancePayload {
    pub insurance: Insurance,
}

#[derive(Debug, Serialize)]
pub struct InsuranceListPayload {
    pub policies: Vec<Insurance>,
}

/// Record a new insurance policy
///
/// Previous active policies for the vehicle are deactivated so the newest
/// policy wins.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: Vehicle missing, inactive, or another user's
pub async fn create_insurance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateInsuranceRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<InsurancePayload>>)> {
    req.validate()?;

    Vehicle::find_by_id(&state.db, req.vehicle_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let insurance = Insurance::create(
        &state.db,
        CreateInsurance {
            vehicle_id: req.vehicle_id,
            policy_number: req.policy_number,
            insurance_company: req.insurance_company,
            premium_amount: req.premium_amount,
            start_date: req.start_date,
            expiry_date: req.expiry_date,
        },
    )
    .await?;

    tracing::info!(insurance_id = %insurance.id, vehicle_id = %req.vehicle_id, "Insurance policy created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Insurance policy created successfully",
            InsurancePayload { insurance },
        )),
    ))
}

/// Policy history for one vehicle, newest first
pub async fn list_insurance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(vehicle_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<InsuranceListPayload>>> {
    Vehicle::find_by_id(&state.db, vehicle_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let policies = Insurance::list_by_vehicle(&state.db, vehicle_id, auth.user_id).await?;

    Ok(Json(ApiResponse::new(InsuranceListPayload { policies })))
}

/// Partial update of an insurance policy
pub async fn update_insurance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateInsuranceRequest>,
) -> ApiResult<Json<ApiResponse<InsurancePayload>>> {
    req.validate()?;

    let insurance = Insurance::update(
        &state.db,
        id,
        auth.user_id,
        UpdateInsurance {
            policy_number: req.policy_number,
            insurance_company: req.insurance_company,
            premium_amount: req.premium_amount.map(Some),
            start_date: req.start_date.map(Some),
            expiry_date: req.expiry_date,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Insurance policy not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(
        "Insurance policy updated successfully",
        InsurancePayload { insurance },
    )))
}

/// Delete an insurance policy
pub async fn delete_insurance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Insurance::delete(&state.db, id, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(
            "Insurance policy not found".to_string(),
        ));
    }

    Ok(Json(MessageResponse::new(
        "Insurance policy deleted successfully",
    )))
}
