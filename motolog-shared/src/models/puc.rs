/// PUC certificate model and database operations
///
/// Pollution-under-control certificates follow the same latest-wins rule as
/// insurance: creating a certificate invalidates the vehicle's previous
/// valid ones.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE puc_certificates (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     vehicle_id UUID NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
///     certificate_number VARCHAR(50) NOT NULL,
///     testing_center VARCHAR(100),
///     test_date DATE,
///     expiry_date DATE NOT NULL,
///     is_valid BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// PUC certificate for a vehicle
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PucCertificate {
    /// Unique certificate record ID
    pub id: Uuid,

    /// Vehicle this certificate covers
    pub vehicle_id: Uuid,

    /// Certificate number
    pub certificate_number: String,

    /// Testing center name, if recorded
    pub testing_center: Option<String>,

    /// Date the emission test was performed
    pub test_date: Option<NaiveDate>,

    /// Certificate expiry date
    pub expiry_date: NaiveDate,

    /// Whether this is the vehicle's current certificate
    pub is_valid: bool,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new PUC certificate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePuc {
    /// Vehicle this certificate covers
    pub vehicle_id: Uuid,

    /// Certificate number
    pub certificate_number: String,

    /// Testing center name
    pub testing_center: Option<String>,

    /// Date the emission test was performed
    pub test_date: Option<NaiveDate>,

    /// Certificate expiry date
    pub expiry_date: NaiveDate,
}

/// Input for updating an existing PUC certificate
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePuc {
    /// New certificate number
    pub certificate_number: Option<String>,

    /// New testing center (use Some(None) to clear)
    pub testing_center: Option<Option<String>>,

    /// New test date (use Some(None) to clear)
    pub test_date: Option<Option<NaiveDate>>,

    /// New expiry date
    pub expiry_date: Option<NaiveDate>,
}

/// A valid certificate expiring soon, joined with vehicle and owner
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExpiringPuc {
    /// Certificate record ID
    pub id: Uuid,

    /// Certificate number
    pub certificate_number: String,

    /// Testing center name, if recorded
    pub testing_center: Option<String>,

    /// Certificate expiry date
    pub expiry_date: NaiveDate,

    /// Vehicle the certificate covers
    pub vehicle_id: Uuid,

    /// Owner to notify
    pub user_id: Uuid,

    /// Vehicle manufacturer
    pub make: String,

    /// Vehicle model
    pub model: String,

    /// Vehicle registration plate
    pub registration_number: String,
}

impl PucCertificate {
    /// Creates a new certificate, invalidating the vehicle's previous ones
    ///
    /// # Errors
    ///
    /// Returns an error if the vehicle doesn't exist (foreign key violation)
    /// or the database connection fails
    pub async fn create(pool: &PgPool, data: CreatePuc) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE puc_certificates
            SET is_valid = FALSE, updated_at = NOW()
            WHERE vehicle_id = $1 AND is_valid = TRUE
            "#,
        )
        .bind(data.vehicle_id)
        .execute(pool)
        .await?;

        let certificate = sqlx::query_as::<_, PucCertificate>(
            r#"
            INSERT INTO puc_certificates (
                vehicle_id, certificate_number, testing_center, test_date, expiry_date
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, vehicle_id, certificate_number, testing_center,
                      test_date, expiry_date, is_valid, created_at, updated_at
            "#,
        )
        .bind(data.vehicle_id)
        .bind(data.certificate_number)
        .bind(data.testing_center)
        .bind(data.test_date)
        .bind(data.expiry_date)
        .fetch_one(pool)
        .await?;

        Ok(certificate)
    }

    /// Lists all certificates for a vehicle, newest first, scoped to the owner
    pub async fn list_by_vehicle(
        pool: &PgPool,
        vehicle_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let certificates = sqlx::query_as::<_, PucCertificate>(
            r#"
            SELECT p.id, p.vehicle_id, p.certificate_number, p.testing_center,
                   p.test_date, p.expiry_date, p.is_valid, p.created_at, p.updated_at
            FROM puc_certificates p
            JOIN vehicles v ON v.id = p.vehicle_id
            WHERE p.vehicle_id = $1 AND v.user_id = $2
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(vehicle_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(certificates)
    }

    /// Updates a certificate, scoped to the owner
    ///
    /// # Returns
    ///
    /// The updated certificate if found, None otherwise
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdatePuc,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE puc_certificates SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.certificate_number.is_some() {
            bind_count += 1;
            query.push_str(&format!(", certificate_number = ${}", bind_count));
        }
        if data.testing_center.is_some() {
            bind_count += 1;
            query.push_str(&format!(", testing_center = ${}", bind_count));
        }
        if data.test_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", test_date = ${}", bind_count));
        }
        if data.expiry_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", expiry_date = ${}", bind_count));
        }

        query.push_str(
            " FROM vehicles WHERE puc_certificates.id = $1 \
             AND vehicles.id = puc_certificates.vehicle_id AND vehicles.user_id = $2 \
             RETURNING puc_certificates.id, puc_certificates.vehicle_id, \
             puc_certificates.certificate_number, puc_certificates.testing_center, \
             puc_certificates.test_date, puc_certificates.expiry_date, \
             puc_certificates.is_valid, puc_certificates.created_at, \
             puc_certificates.updated_at",
        );

        let mut q = sqlx::query_as::<_, PucCertificate>(&query)
            .bind(id)
            .bind(user_id);

        if let Some(certificate_number) = data.certificate_number {
            q = q.bind(certificate_number);
        }
        if let Some(center_opt) = data.testing_center {
            q = q.bind(center_opt);
        }
        if let Some(test_date_opt) = data.test_date {
            q = q.bind(test_date_opt);
        }
        if let Some(expiry_date) = data.expiry_date {
            q = q.bind(expiry_date);
        }

        let certificate = q.fetch_optional(pool).await?;

        Ok(certificate)
    }

    /// Deletes a certificate record, scoped to the owner
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM puc_certificates p
            USING vehicles v
            WHERE p.id = $1 AND v.id = p.vehicle_id AND v.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Valid certificates expiring within `days_before` days, not yet notified
    ///
    /// Mirrors the insurance scan: active vehicles of active users, skipping
    /// vehicles already notified in the trailing seven days.
    pub async fn expiring_unnotified(
        pool: &PgPool,
        days_before: i32,
    ) -> Result<Vec<ExpiringPuc>, sqlx::Error> {
        let expiring = sqlx::query_as::<_, ExpiringPuc>(
            r#"
            SELECT p.id, p.certificate_number, p.testing_center, p.expiry_date,
                   v.id AS vehicle_id, v.user_id, v.make, v.model, v.registration_number
            FROM puc_certificates p
            JOIN vehicles v ON v.id = p.vehicle_id AND v.is_active = TRUE
            JOIN users u ON u.id = v.user_id AND u.is_active = TRUE
            WHERE p.is_valid = TRUE
              AND p.expiry_date BETWEEN CURRENT_DATE
                  AND CURRENT_DATE + make_interval(days => $1)
              AND NOT EXISTS (
                  SELECT 1 FROM notifications n
                  WHERE n.user_id = v.user_id
                    AND n.vehicle_id = v.id
                    AND n.notification_type = 'puc'
                    AND n.created_at >= CURRENT_DATE - INTERVAL '7 days'
              )
            ORDER BY p.expiry_date ASC
            "#,
        )
        .bind(days_before)
        .fetch_all(pool)
        .await?;

        Ok(expiring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_puc_struct() {
        let create = CreatePuc {
            vehicle_id: Uuid::new_v4(),
            certificate_number: "PUC-9981".to_string(),
            testing_center: Some("City Emission Center".to_string()),
            test_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            expiry_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        };

        assert_eq!(create.certificate_number, "PUC-9981");
    }

    #[test]
    fn test_update_puc_default() {
        let update = UpdatePuc::default();
        assert!(update.certificate_number.is_none());
        assert!(update.testing_center.is_none());
        assert!(update.test_date.is_none());
        assert!(update.expiry_date.is_none());
    }

    // Integration tests for database operations are in motolog-api/tests/
}
