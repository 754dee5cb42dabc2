/// PUC certificate endpoints
///
/// Pollution-under-control certificates work like insurance policies:
/// the newest certificate per vehicle is the valid one, older ones are
/// kept for history.

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
        puc::{CreatePuc, PucCertificate, UpdatePuc},
        vehicle::Vehicle,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// PUC creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePucRequest {
    pub vehicle_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Certificate number is required"))]
    pub certificate_number: String,

    #[validate(length(max = 100, message = "Testing center must be less than 100 characters"))]
    pub testing_center: Option<String>,

    pub test_date: Option<NaiveDate>,

    pub expiry_date: NaiveDate,
}

/// PUC update request. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePucRequest {
    #[validate(length(min = 1, max = 100, message = "Certificate number is required"))]
    pub certificate_number: Option<String>,

    #[validate(length(max = 100, message = "Testing center must be less than 100 characters"))]
    pub testing_center: Option<String>,

    pub test_date: Option<NaiveDate>,

    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct PucPayload {
    pub puc: PucCertificate,
}

#[derive(Debug, Serialize)]
pub struct PucListPayload {
    pub certificates: Vec<PucCertificate>,
}

/// Record a new PUC certificate, invalidating the previous ones
pub async fn create_puc(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreatePucRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PucPayload>>)> {
    req.validate()?;

    Vehicle::find_by_id(&state.db, req.vehicle_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let puc = PucCertificate::create(
        &state.db,
        CreatePuc {
            vehicle_id: req.vehicle_id,
            certificate_number: req.certificate_number,
            testing_center: req.testing_center,
            test_date: req.test_date,
            expiry_date: req.expiry_date,
        },
    )
    .await?;

    tracing::info!(puc_id = %puc.id, vehicle_id = %req.vehicle_id, "PUC certificate created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "PUC certificate created successfully",
            PucPayload { puc },
        )),
    ))
}

/// Certificate history for one vehicle, newest first
pub async fn list_puc(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(vehicle_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<PucListPayload>>> {
    Vehicle::find_by_id(&state.db, vehicle_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let certificates = PucCertificate::list_by_vehicle(&state.db, vehicle_id, auth.user_id).await?;

    Ok(Json(ApiResponse::new(PucListPayload { certificates })))
}

/// Partial update of a PUC certificate
pub async fn update_puc(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePucRequest>,
) -> ApiResult<Json<ApiResponse<PucPayload>>> {
    req.validate()?;

    let puc = PucCertificate::update(
        &state.db,
        id,
        auth.user_id,
        UpdatePuc {
            certificate_number: req.certificate_number,
            testing_center: req.testing_center.map(Some),
            test_date: req.test_date.map(Some),
            expiry_date: req.expiry_date,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("PUC certificate not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(
        "PUC certificate updated successfully",
        PucPayload { puc },
    )))
}

/// Delete a PUC certificate
pub async fn delete_puc(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = PucCertificate::delete(&state.db, id, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(
            "PUC certificate not found".to_string(),
        ));
    }

    Ok(Json(MessageResponse::new(
        "PUC certificate deleted successfully",
    )))
}
