/// Insurance policy model and database operations
///
/// A vehicle keeps its full policy history; only the most recently created
/// policy is active. Creating a new policy deactivates the previous ones in
/// the same call.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE insurance (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     vehicle_id UUID NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
///     policy_number VARCHAR(50) NOT NULL,
///     insurance_company VARCHAR(100) NOT NULL,
///     premium_amount DOUBLE PRECISION,
///     start_date DATE,
///     expiry_date DATE NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Insurance policy for a vehicle
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Insurance {
    /// Unique policy record ID
    pub id: Uuid,

    /// Vehicle this policy covers
    pub vehicle_id: Uuid,

    /// Policy number issued by the insurer
    pub policy_number: String,

    /// Insurer name
    pub insurance_company: String,

    /// Premium paid, if recorded
    pub premium_amount: Option<f64>,

    /// Policy start date, if recorded
    pub start_date: Option<NaiveDate>,

    /// Policy expiry date
    pub expiry_date: NaiveDate,

    /// Whether this is the vehicle's current policy
    pub is_active: bool,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new insurance policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInsurance {
    /// Vehicle this policy covers
    pub vehicle_id: Uuid,

    /// Policy number issued by the insurer
    pub policy_number: String,

    /// Insurer name
    pub insurance_company: String,

    /// Premium paid
    pub premium_amount: Option<f64>,

    /// Policy start date
    pub start_date: Option<NaiveDate>,

    /// Policy expiry date
    pub expiry_date: NaiveDate,
}

/// Input for updating an existing insurance policy
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInsurance {
    /// New policy number
    pub policy_number: Option<String>,

    /// New insurer name
    pub insurance_company: Option<String>,

    /// New premium (use Some(None) to clear)
    pub premium_amount: Option<Option<f64>>,

    /// New start date (use Some(None) to clear)
    pub start_date: Option<Option<NaiveDate>>,

    /// New expiry date
    pub expiry_date: Option<NaiveDate>,
}

/// An active policy expiring soon, joined with vehicle and owner
///
/// Produced by the reminder scan; excludes vehicles already notified in the
/// trailing seven days.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExpiringInsurance {
    /// Policy record ID
    pub id: Uuid,

    /// Policy number
    pub policy_number: String,

    /// Insurer name
    pub insurance_company: String,

    /// Policy expiry date
    pub expiry_date: NaiveDate,

    /// Vehicle the policy covers
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

impl Insurance {
    /// Creates a new policy, deactivating the vehicle's previous ones
    ///
    /// # Errors
    ///
    /// Returns an error if the vehicle doesn't exist (foreign key violation)
    /// or the database connection fails
    pub async fn create(pool: &PgPool, data: CreateInsurance) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE insurance
            SET is_active = FALSE, updated_at = NOW()
            WHERE vehicle_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(data.vehicle_id)
        .execute(pool)
        .await?;

        let policy = sqlx::query_as::<_, Insurance>(
            r#"
            INSERT INTO insurance (
                vehicle_id, policy_number, insurance_company,
                premium_amount, start_date, expiry_date
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, vehicle_id, policy_number, insurance_company,
                      premium_amount, start_date, expiry_date, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(data.vehicle_id)
        .bind(data.policy_number)
        .bind(data.insurance_company)
        .bind(data.premium_amount)
        .bind(data.start_date)
        .bind(data.expiry_date)
        .fetch_one(pool)
        .await?;

        Ok(policy)
    }

    /// Lists all policies for a vehicle, newest first, scoped to the owner
    pub async fn list_by_vehicle(
        pool: &PgPool,
        vehicle_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let policies = sqlx::query_as::<_, Insurance>(
            r#"
            SELECT i.id, i.vehicle_id, i.policy_number, i.insurance_company,
                   i.premium_amount, i.start_date, i.expiry_date, i.is_active,
                   i.created_at, i.updated_at
            FROM insurance i
            JOIN vehicles v ON v.id = i.vehicle_id
            WHERE i.vehicle_id = $1 AND v.user_id = $2
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(vehicle_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(policies)
    }

    /// Updates a policy, scoped to the owner
    ///
    /// Only non-None fields in `data` will be updated.
    ///
    /// # Returns
    ///
    /// The updated policy if found, None otherwise
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdateInsurance,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE insurance SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.policy_number.is_some() {
            bind_count += 1;
            query.push_str(&format!(", policy_number = ${}", bind_count));
        }
        if data.insurance_company.is_some() {
            bind_count += 1;
            query.push_str(&format!(", insurance_company = ${}", bind_count));
        }
        if data.premium_amount.is_some() {
            bind_count += 1;
            query.push_str(&format!(", premium_amount = ${}", bind_count));
        }
        if data.start_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", start_date = ${}", bind_count));
        }
        if data.expiry_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", expiry_date = ${}", bind_count));
        }

        query.push_str(
            " FROM vehicles WHERE insurance.id = $1 AND vehicles.id = insurance.vehicle_id \
             AND vehicles.user_id = $2 \
             RETURNING insurance.id, insurance.vehicle_id, insurance.policy_number, \
             insurance.insurance_company, insurance.premium_amount, insurance.start_date, \
             insurance.expiry_date, insurance.is_active, insurance.created_at, \
             insurance.updated_at",
        );

        let mut q = sqlx::query_as::<_, Insurance>(&query).bind(id).bind(user_id);

        if let Some(policy_number) = data.policy_number {
            q = q.bind(policy_number);
        }
        if let Some(insurance_company) = data.insurance_company {
            q = q.bind(insurance_company);
        }
        if let Some(premium_opt) = data.premium_amount {
            q = q.bind(premium_opt);
        }
        if let Some(start_opt) = data.start_date {
            q = q.bind(start_opt);
        }
        if let Some(expiry_date) = data.expiry_date {
            q = q.bind(expiry_date);
        }

        let policy = q.fetch_optional(pool).await?;

        Ok(policy)
    }

    /// Deletes a policy record, scoped to the owner
    ///
    /// # Returns
    ///
    /// True if the policy was deleted, false if it wasn't found
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM insurance i
            USING vehicles v
            WHERE i.id = $1 AND v.id = i.vehicle_id AND v.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Active policies expiring within `days_before` days, not yet notified
    ///
    /// Only active vehicles of active users are scanned. Vehicles that
    /// already received an insurance notification in the trailing seven
    /// days are skipped.
    pub async fn expiring_unnotified(
        pool: &PgPool,
        days_before: i32,
    ) -> Result<Vec<ExpiringInsurance>, sqlx::Error> {
        let expiring = sqlx::query_as::<_, ExpiringInsurance>(
            r#"
            SELECT i.id, i.policy_number, i.insurance_company, i.expiry_date,
                   v.id AS vehicle_id, v.user_id, v.make, v.model, v.registration_number
            FROM insurance i
            JOIN vehicles v ON v.id = i.vehicle_id AND v.is_active = TRUE
            JOIN users u ON u.id = v.user_id AND u.is_active = TRUE
            WHERE i.is_active = TRUE
              AND i.expiry_date BETWEEN CURRENT_DATE
                  AND CURRENT_DATE + make_interval(days => $1)
              AND NOT EXISTS (
                  SELECT 1 FROM notifications n
                  WHERE n.user_id = v.user_id
                    AND n.vehicle_id = v.id
                    AND n.notification_type = 'insurance'
                    AND n.created_at >= CURRENT_DATE - INTERVAL '7 days'
              )
            ORDER BY i.expiry_date ASC
            "#,
        )
        .bind(days_before)
        .fetch_all(pool)
        .await?;

        Ok(expiring)
    }
}
