/// Service record model and database operations
///
/// Service records are plain history rows; unlike insurance and PUC there is
/// no active flag. The latest record per vehicle (by service date) carries
/// the next-service schedule the reminder scan watches.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE service_records (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     vehicle_id UUID NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
///     service_date DATE NOT NULL,
///     service_type VARCHAR(50) NOT NULL,
///     odometer_reading INTEGER,
///     cost DOUBLE PRECISION,
///     service_center VARCHAR(100),
///     description TEXT,
///     next_service_date DATE,
///     next_service_odometer INTEGER,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A completed service visit for a vehicle
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServiceRecord {
    /// Unique record ID
    pub id: Uuid,

    /// Vehicle that was serviced
    pub vehicle_id: Uuid,

    /// Date of the service visit
    pub service_date: NaiveDate,

    /// Kind of service performed (e.g. "general", "oil_change")
    pub service_type: String,

    /// Odometer reading at service time, if recorded
    pub odometer_reading: Option<i32>,

    /// Amount paid, if recorded
    pub cost: Option<f64>,

    /// Service center name, if recorded
    pub service_center: Option<String>,

    /// Free-form description of work done
    pub description: Option<String>,

    /// When the next service is due by date
    pub next_service_date: Option<NaiveDate>,

    /// When the next service is due by odometer (km)
    pub next_service_odometer: Option<i32>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new service record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRecord {
    /// Vehicle that was serviced
    pub vehicle_id: Uuid,

    /// Date of the service visit
    pub service_date: NaiveDate,

    /// Kind of service performed
    pub service_type: String,

    /// Odometer reading at service time
    pub odometer_reading: Option<i32>,

    /// Amount paid
    pub cost: Option<f64>,

    /// Service center name
    pub service_center: Option<String>,

    /// Free-form description of work done
    pub description: Option<String>,

    /// When the next service is due by date
    pub next_service_date: Option<NaiveDate>,

    /// When the next service is due by odometer (km)
    pub next_service_odometer: Option<i32>,
}

/// Input for updating an existing service record
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateServiceRecord {
    /// New service date
    pub service_date: Option<NaiveDate>,

    /// New service type
    pub service_type: Option<String>,

    /// New odometer reading (use Some(None) to clear)
    pub odometer_reading: Option<Option<i32>>,

    /// New cost (use Some(None) to clear)
    pub cost: Option<Option<f64>>,

    /// New service center (use Some(None) to clear)
    pub service_center: Option<Option<String>>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New next-service date (use Some(None) to clear)
    pub next_service_date: Option<Option<NaiveDate>>,

    /// New next-service odometer (use Some(None) to clear)
    pub next_service_odometer: Option<Option<i32>>,
}

/// A vehicle whose latest service schedule says it is due
///
/// Due means the odometer is within 500 km of the next-service reading or
/// the next-service date falls within the coming week.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DueService {
    /// Vehicle that is due
    pub vehicle_id: Uuid,

    /// Owner to notify
    pub user_id: Uuid,

    /// Vehicle manufacturer
    pub make: String,

    /// Vehicle model
    pub model: String,

    /// Vehicle registration plate
    pub registration_number: String,

    /// Vehicle's current odometer reading (km)
    pub current_odometer: i32,

    /// Service type from the latest record
    pub service_type: String,

    /// Scheduled next-service date, if set
    pub next_service_date: Option<NaiveDate>,

    /// Scheduled next-service odometer, if set
    pub next_service_odometer: Option<i32>,
}

impl ServiceRecord {
    /// Creates a new service record
    pub async fn create(pool: &PgPool, data: CreateServiceRecord) -> Result<Self, sqlx::Error> {
        let record = sqlx::query_as::<_, ServiceRecord>(
            r#"
            INSERT INTO service_records (
                vehicle_id, service_date, service_type, odometer_reading,
                cost, service_center, description, next_service_date,
                next_service_odometer
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, vehicle_id, service_date, service_type, odometer_reading,
                      cost, service_center, description, next_service_date,
                      next_service_odometer, created_at, updated_at
            "#,
        )
        .bind(data.vehicle_id)
        .bind(data.service_date)
        .bind(data.service_type)
        .bind(data.odometer_reading)
        .bind(data.cost)
        .bind(data.service_center)
        .bind(data.description)
        .bind(data.next_service_date)
        .bind(data.next_service_odometer)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Lists service history for a vehicle, newest first, scoped to the owner
    pub async fn list_by_vehicle(
        pool: &PgPool,
        vehicle_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let records = sqlx::query_as::<_, ServiceRecord>(
            r#"
            SELECT sr.id, sr.vehicle_id, sr.service_date, sr.service_type,
                   sr.odometer_reading, sr.cost, sr.service_center, sr.description,
                   sr.next_service_date, sr.next_service_odometer,
                   sr.created_at, sr.updated_at
            FROM service_records sr
            JOIN vehicles v ON v.id = sr.vehicle_id
            WHERE sr.vehicle_id = $1 AND v.user_id = $2
            ORDER BY sr.service_date DESC, sr.created_at DESC
            "#,
        )
        .bind(vehicle_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Updates a service record, scoped to the owner
    ///
    /// # Returns
    ///
    /// The updated record if found, None otherwise
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdateServiceRecord,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE service_records SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.service_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", service_date = ${}", bind_count));
        }
        if data.service_type.is_some() {
            bind_count += 1;
            query.push_str(&format!(", service_type = ${}", bind_count));
        }
        if data.odometer_reading.is_some() {
            bind_count += 1;
            query.push_str(&format!(", odometer_reading = ${}", bind_count));
        }
        if data.cost.is_some() {
            bind_count += 1;
            query.push_str(&format!(", cost = ${}", bind_count));
        }
        if data.service_center.is_some() {
            bind_count += 1;
            query.push_str(&format!(", service_center = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.next_service_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", next_service_date = ${}", bind_count));
        }
        if data.next_service_odometer.is_some() {
            bind_count += 1;
            query.push_str(&format!(", next_service_odometer = ${}", bind_count));
        }

        query.push_str(
            " FROM vehicles WHERE service_records.id = $1 \
             AND vehicles.id = service_records.vehicle_id AND vehicles.user_id = $2 \
             RETURNING service_records.id, service_records.vehicle_id, \
             service_records.service_date, service_records.service_type, \
             service_records.odometer_reading, service_records.cost, \
             service_records.service_center, service_records.description, \
             service_records.next_service_date, service_records.next_service_odometer, \
             service_records.created_at, service_records.updated_at",
        );

        let mut q = sqlx::query_as::<_, ServiceRecord>(&query)
            .bind(id)
            .bind(user_id);

        if let Some(service_date) = data.service_date {
            q = q.bind(service_date);
        }
        if let Some(service_type) = data.service_type {
            q = q.bind(service_type);
        }
        if let Some(odometer_opt) = data.odometer_reading {
            q = q.bind(odometer_opt);
        }
        if let Some(cost_opt) = data.cost {
            q = q.bind(cost_opt);
        }
        if let Some(center_opt) = data.service_center {
            q = q.bind(center_opt);
        }
        if let Some(description_opt) = data.description {
            q = q.bind(description_opt);
        }
        if let Some(next_date_opt) = data.next_service_date {
            q = q.bind(next_date_opt);
        }
        if let Some(next_odometer_opt) = data.next_service_odometer {
            q = q.bind(next_odometer_opt);
        }

        let record = q.fetch_optional(pool).await?;

        Ok(record)
    }

    /// Deletes a service record, scoped to the owner
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM service_records sr
            USING vehicles v
            WHERE sr.id = $1 AND v.id = sr.vehicle_id AND v.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Vehicles due for service per their latest record, not yet notified
    ///
    /// Looks at the most recent service record per active vehicle. Due means
    /// the current odometer is within 500 km of the next-service reading, or
    /// the next-service date is within the coming 7 days. Vehicles already
    /// notified in the trailing seven days are skipped.
    pub async fn due_unnotified(pool: &PgPool) -> Result<Vec<DueService>, sqlx::Error> {
        let due = sqlx::query_as::<_, DueService>(
            r#"
            SELECT v.id AS vehicle_id, v.user_id, v.make, v.model,
                   v.registration_number, v.current_odometer,
                   sr.service_type, sr.next_service_date, sr.next_service_odometer
            FROM vehicles v
            JOIN users u ON u.id = v.user_id AND u.is_active = TRUE
            JOIN LATERAL (
                SELECT service_type, next_service_date, next_service_odometer
                FROM service_records
                WHERE vehicle_id = v.id
                ORDER BY service_date DESC, created_at DESC
                LIMIT 1
            ) sr ON TRUE
            WHERE v.is_active = TRUE
              AND (
                  (sr.next_service_odometer IS NOT NULL
                   AND v.current_odometer >= sr.next_service_odometer - 500)
                  OR (sr.next_service_date IS NOT NULL
                      AND sr.next_service_date <= CURRENT_DATE + INTERVAL '7 days')
              )
              AND NOT EXISTS (
                  SELECT 1 FROM notifications n
                  WHERE n.user_id = v.user_id
                    AND n.vehicle_id = v.id
                    AND n.notification_type = 'service'
                    AND n.created_at >= CURRENT_DATE - INTERVAL '7 days'
              )
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_service_record_struct() {
        let create = CreateServiceRecord {
            vehicle_id: Uuid::new_v4(),
            service_date: NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            service_type: "general".to_string(),
            odometer_reading: Some(9_500),
            cost: Some(3200.0),
            service_center: Some("Authorized Motors".to_string()),
            description: None,
            next_service_date: NaiveDate::from_ymd_opt(2025, 11, 10),
            next_service_odometer: Some(14_500),
        };

        assert_eq!(create.service_type, "general");
        assert_eq!(create.next_service_odometer, Some(14_500));
    }

    #[test]
    fn test_update_service_record_default() {
        let update = UpdateServiceRecord::default();
        assert!(update.service_date.is_none());
        assert!(update.service_type.is_none());
        assert!(update.cost.is_none());
        assert!(update.next_service_date.is_none());
    }

    // Integration tests for database operations are in motolog-api/tests/
}
