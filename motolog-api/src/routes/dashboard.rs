/// Dashboard endpoints
///
/// Cross-vehicle aggregates for the landing page. Everything is scoped to
/// the caller's active vehicles; the queries that have no model counterpart
/// live here because no other endpoint shares them.

use crate::{app::AppState, error::ApiResult, response::ApiResponse};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use motolog_shared::{
    auth::middleware::AuthContext,
    models::{
        fuel_entry::{FuelEntry, RecentFuelEntry},
        notification::Notification,
        vehicle::{Vehicle, VehicleStats},
    },
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub months: Option<i32>,
}

/// Landing page aggregate
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub vehicle_stats: VehicleStats,

    /// Number of vehicles with a renewal falling due in the next 30 days
    pub upcoming_renewals: usize,

    /// Fuel spend since the first of the current month
    pub current_month_expense: f64,

    pub recent_entries: Vec<RecentFuelEntry>,

    pub unread_notifications: i64,
}

#[derive(Debug, Serialize)]
pub struct OverviewPayload {
    pub overview: Overview,
}

/// Per-vehicle average mileage, best first
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct VehicleMileage {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub registration_number: String,
    pub avg_mileage: Option<f64>,
    pub fuel_entries_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageStatsPayload {
    pub mileage_stats: Vec<VehicleMileage>,
}

/// One month of fuel spend across all active vehicles
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ExpenseTrend {
    /// First day of the month
    pub month: NaiveDate,
    pub total_expense: f64,
    pub entries_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseTrendsPayload {
    pub expense_trends: Vec<ExpenseTrend>,
}

/// Latest service record per vehicle with next-service data
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ServiceReminder {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub registration_number: String,
    pub current_odometer: i32,
    pub next_service_odometer: Option<i32>,
    pub next_service_date: Option<NaiveDate>,
    pub service_type: String,
    pub is_due_soon: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRemindersPayload {
    pub service_reminders: Vec<ServiceReminder>,
}

/// Compliance snapshot for one vehicle
///
/// `status` is the first matching condition of `insurance_due`, `puc_due`,
/// `service_due`, falling back to `healthy`.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct VehicleHealth {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub registration_number: String,
    pub current_odometer: i32,
    pub status: String,
    pub insurance_expiry: Option<NaiveDate>,
    pub puc_expiry: Option<NaiveDate>,
    pub service_due_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleHealthPayload {
    pub vehicle_health: Vec<VehicleHealth>,
}

/// Everything the landing page needs in one round trip
pub async fn overview(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<OverviewPayload>>> {
    let (vehicle_stats, renewals, current_month_expense, recent_entries, unread_notifications) =
        tokio::try_join!(
            Vehicle::stats(&state.db, auth.user_id),
            Vehicle::upcoming_renewals(&state.db, auth.user_id, 30),
            current_month_expense(&state.db, auth.user_id),
            FuelEntry::recent_for_user(&state.db, auth.user_id, 5),
            Notification::count_by_user(&state.db, auth.user_id, true),
        )?;

    Ok(Json(ApiResponse::new(OverviewPayload {
        overview: Overview {
            vehicle_stats,
            upcoming_renewals: renewals.len(),
            current_month_expense,
            recent_entries,
            unread_notifications,
        },
    })))
}

async fn current_month_expense(pool: &PgPool, user_id: Uuid) -> Result<f64, sqlx::Error> {
    let (total,): (f64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(fe.total_cost), 0)
        FROM fuel_entries fe
        JOIN vehicles v ON v.id = fe.vehicle_id AND v.is_active = TRUE
        WHERE v.user_id = $1
          AND fe.fuel_date >= DATE_TRUNC('month', CURRENT_DATE)::date
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// Average mileage per vehicle, computed over entries that carry one
pub async fn mileage_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<MileageStatsPayload>>> {
    let mileage_stats = sqlx::query_as::<_, VehicleMileage>(
        r#"
        SELECT v.id, v.make, v.model, v.registration_number,
               AVG(fe.mileage) AS avg_mileage,
               COUNT(fe.id) AS fuel_entries_count
        FROM vehicles v
        LEFT JOIN fuel_entries fe
            ON fe.vehicle_id = v.id AND fe.mileage IS NOT NULL
        WHERE v.user_id = $1 AND v.is_active = TRUE
        GROUP BY v.id, v.make, v.model, v.registration_number
        ORDER BY avg_mileage DESC NULLS LAST
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ApiResponse::new(MileageStatsPayload { mileage_stats })))
}

/// Monthly fuel totals across all active vehicles, oldest first
pub async fn expense_trends(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Json<ApiResponse<ExpenseTrendsPayload>>> {
    let months = query.months.unwrap_or(12).max(1);

    let expense_trends = sqlx::query_as::<_, ExpenseTrend>(
        r#"
        SELECT DATE_TRUNC('month', fe.fuel_date)::date AS month,
               SUM(fe.total_cost) AS total_expense,
               COUNT(fe.id) AS entries_count
        FROM fuel_entries fe
        JOIN vehicles v ON v.id = fe.vehicle_id AND v.is_active = TRUE
        WHERE v.user_id = $1
          AND fe.fuel_date >= CURRENT_DATE - make_interval(months => $2)
        GROUP BY month
        ORDER BY month ASC
        "#,
    )
    .bind(auth.user_id)
    .bind(months)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ApiResponse::new(ExpenseTrendsPayload {
        expense_trends,
    })))
}

/// Vehicles with next-service data, due-soon first
///
/// Due soon means the odometer is within 500 km of the next service reading
/// or the next service date is within 30 days.
pub async fn service_reminders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<ServiceRemindersPayload>>> {
    let service_reminders = sqlx::query_as::<_, ServiceReminder>(
        r#"
        SELECT v.id, v.make, v.model, v.registration_number, v.current_odometer,
               sr.next_service_odometer, sr.next_service_date, sr.service_type,
               CASE
                   WHEN sr.next_service_odometer IS NOT NULL
                        AND v.current_odometer >= sr.next_service_odometer - 500 THEN TRUE
                   WHEN sr.next_service_date IS NOT NULL
                        AND sr.next_service_date <= CURRENT_DATE + INTERVAL '30 days' THEN TRUE
                   ELSE FALSE
               END AS is_due_soon
        FROM vehicles v
        LEFT JOIN LATERAL (
            SELECT next_service_odometer, next_service_date, service_type
            FROM service_records
            WHERE vehicle_id = v.id
            ORDER BY service_date DESC, created_at DESC
            LIMIT 1
        ) sr ON TRUE
        WHERE v.user_id = $1
          AND v.is_active = TRUE
          AND (sr.next_service_odometer IS NOT NULL OR sr.next_service_date IS NOT NULL)
        ORDER BY is_due_soon DESC, sr.next_service_date ASC NULLS LAST
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ApiResponse::new(ServiceRemindersPayload {
        service_reminders,
    })))
}

/// One compliance row per active vehicle, most urgent first
pub async fn vehicle_health(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<VehicleHealthPayload>>> {
    let vehicle_health = sqlx::query_as::<_, VehicleHealth>(
        r#"
        SELECT v.id, v.make, v.model, v.registration_number, v.current_odometer,
               CASE
                   WHEN i.expiry_date IS NOT NULL
                        AND i.expiry_date <= CURRENT_DATE + INTERVAL '30 days' THEN 'insurance_due'
                   WHEN p.expiry_date IS NOT NULL
                        AND p.expiry_date <= CURRENT_DATE + INTERVAL '30 days' THEN 'puc_due'
                   WHEN sr.next_service_odometer IS NOT NULL
                        AND v.current_odometer >= sr.next_service_odometer - 500 THEN 'service_due'
                   ELSE 'healthy'
               END AS status,
               i.expiry_date AS insurance_expiry,
               p.expiry_date AS puc_expiry,
               sr.next_service_date AS service_due_date
        FROM vehicles v
        LEFT JOIN LATERAL (
            SELECT expiry_date
            FROM insurance
            WHERE vehicle_id = v.id AND is_active = TRUE
            ORDER BY expiry_date DESC
            LIMIT 1
        ) i ON TRUE
        LEFT JOIN LATERAL (
            SELECT expiry_date
            FROM puc_certificates
            WHERE vehicle_id = v.id AND is_valid = TRUE
            ORDER BY expiry_date DESC
            LIMIT 1
        ) p ON TRUE
        LEFT JOIN LATERAL (
            SELECT next_service_date, next_service_odometer
            FROM service_records
            WHERE vehicle_id = v.id
            ORDER BY service_date DESC, created_at DESC
            LIMIT 1
        ) sr ON TRUE
        WHERE v.user_id = $1 AND v.is_active = TRUE
        ORDER BY
            CASE
                WHEN i.expiry_date IS NOT NULL
                     AND i.expiry_date <= CURRENT_DATE + INTERVAL '30 days' THEN 1
                WHEN p.expiry_date IS NOT NULL
                     AND p.expiry_date <= CURRENT_DATE + INTERVAL '30 days' THEN 2
                WHEN sr.next_service_odometer IS NOT NULL
                     AND v.current_odometer >= sr.next_service_odometer - 500 THEN 3
                ELSE 4
            END ASC
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ApiResponse::new(VehicleHealthPayload {
        vehicle_health,
    })))
}
