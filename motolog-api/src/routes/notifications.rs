/// Notification endpoints
///
/// Read-side of the reminder pipeline. The worker writes notification rows,
/// users list them here, mark them read, and delete them.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::{ApiResponse, MessageResponse, Pagination},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use motolog_shared::{auth::middleware::AuthContext, models::notification::Notification};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub unread_only: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListPayload {
    pub notifications: Vec<Notification>,
    pub pagination: Pagination,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct NotificationPayload {
    pub notification: Notification,
}

/// Newest-first notification feed with an unread counter
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Json<ApiResponse<NotificationListPayload>>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).max(1);
    let offset = (page - 1) * limit;
    let unread_only = query.unread_only.unwrap_or(false);

    let notifications =
        Notification::list_by_user(&state.db, auth.user_id, unread_only, limit, offset).await?;
    let total = Notification::count_by_user(&state.db, auth.user_id, unread_only).await?;
    let unread_count = Notification::count_by_user(&state.db, auth.user_id, true).await?;

    Ok(Json(ApiResponse::new(NotificationListPayload {
        notifications,
        pagination: Pagination::new(page, limit, total),
        unread_count,
    })))
}

/// Mark a single notification as read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<NotificationPayload>>> {
    let notification = Notification::mark_read(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(
        "Notification marked as read",
        NotificationPayload { notification },
    )))
}

/// Delete a notification
pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Notification::delete(&state.db, id, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(Json(MessageResponse::new(
        "Notification deleted successfully",
    )))
}
