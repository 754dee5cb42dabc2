/// Fuel entry model and database operations
///
/// Each entry records one fill-up for a vehicle. Mileage (km per liter) is
/// derived at write time by comparing the entry's odometer reading against
/// the previous entry for the same vehicle, where "previous" means the
/// largest odometer reading strictly below this one. Out-of-order inserts
/// therefore backfill naturally: the mileage of an entry only ever depends
/// on odometer order, not insertion order.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE fuel_entries (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     vehicle_id UUID NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
///     fuel_date DATE NOT NULL,
///     odometer_reading INTEGER NOT NULL,
///     fuel_quantity DOUBLE PRECISION NOT NULL,
///     price_per_liter DOUBLE PRECISION NOT NULL,
///     total_cost DOUBLE PRECISION NOT NULL,
///     fuel_type fuel_type NOT NULL,
///     fuel_station VARCHAR(100),
///     notes TEXT,
///     mileage DOUBLE PRECISION,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::FuelType;

/// Derives mileage in km/l from one fill-up to the next
///
/// Returns None when no meaningful figure exists: the distance is zero or
/// negative, or the fuel quantity is not positive. The result is rounded to
/// two decimal places.
///
/// # Example
///
/// ```
/// use motolog_shared::models::fuel_entry::derive_mileage;
///
/// assert_eq!(derive_mileage(10_400, 10_000, 8.0), Some(50.0));
/// assert_eq!(derive_mileage(10_000, 10_400, 8.0), None);
/// ```
pub fn derive_mileage(
    current_odometer: i32,
    previous_odometer: i32,
    fuel_quantity: f64,
) -> Option<f64> {
    let distance = current_odometer - previous_odometer;
    if distance <= 0 || fuel_quantity <= 0.0 {
        return None;
    }

    let mileage = distance as f64 / fuel_quantity;
    Some((mileage * 100.0).round() / 100.0)
}

/// Fuel entry model representing a single fill-up
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FuelEntry {
    /// Unique entry ID (UUID v4)
    pub id: Uuid,

    /// Vehicle this fill-up belongs to
    pub vehicle_id: Uuid,

    /// Date of the fill-up
    pub fuel_date: NaiveDate,

    /// Odometer reading at the pump (km)
    pub odometer_reading: i32,

    /// Fuel dispensed (liters, or kg for CNG)
    pub fuel_quantity: f64,

    /// Price per liter paid
    pub price_per_liter: f64,

    /// Total amount paid
    pub total_cost: f64,

    /// Fuel dispensed (petrol, diesel, or cng)
    pub fuel_type: FuelType,

    /// Optional station name
    pub fuel_station: Option<String>,

    /// Optional free-form notes
    pub notes: Option<String>,

    /// Derived km/l since the previous entry
    ///
    /// None for the first entry of a vehicle and whenever no meaningful
    /// figure exists
    pub mileage: Option<f64>,

    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// When the entry was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new fuel entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFuelEntry {
    /// Vehicle this fill-up belongs to
    pub vehicle_id: Uuid,

    /// Date of the fill-up
    pub fuel_date: NaiveDate,

    /// Odometer reading at the pump (km)
    pub odometer_reading: i32,

    /// Fuel dispensed (liters)
    pub fuel_quantity: f64,

    /// Price per liter paid
    pub price_per_liter: f64,

    /// Total amount paid
    pub total_cost: f64,

    /// Fuel dispensed
    pub fuel_type: FuelType,

    /// Optional station name
    pub fuel_station: Option<String>,

    /// Optional free-form notes
    pub notes: Option<String>,
}

/// Full replacement values for updating a fuel entry
///
/// Callers merge partial request fields over the stored entry before
/// calling [`FuelEntry::update`]; mileage is recomputed from the final
/// odometer reading and quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFuelEntry {
    /// Date of the fill-up
    pub fuel_date: NaiveDate,

    /// Odometer reading at the pump (km)
    pub odometer_reading: i32,

    /// Fuel dispensed (liters)
    pub fuel_quantity: f64,

    /// Price per liter paid
    pub price_per_liter: f64,

    /// Total amount paid
    pub total_cost: f64,

    /// Fuel dispensed
    pub fuel_type: FuelType,

    /// Station name
    pub fuel_station: Option<String>,

    /// Free-form notes
    pub notes: Option<String>,
}

/// A recent fuel entry joined with its vehicle's identity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecentFuelEntry {
    /// Entry ID
    pub id: Uuid,

    /// Vehicle this fill-up belongs to
    pub vehicle_id: Uuid,

    /// Date of the fill-up
    pub fuel_date: NaiveDate,

    /// Odometer reading at the pump (km)
    pub odometer_reading: i32,

    /// Fuel dispensed (liters)
    pub fuel_quantity: f64,

    /// Price per liter paid
    pub price_per_liter: f64,

    /// Total amount paid
    pub total_cost: f64,

    /// Fuel dispensed
    pub fuel_type: FuelType,

    /// Derived km/l since the previous entry
    pub mileage: Option<f64>,

    /// Vehicle manufacturer
    pub make: String,

    /// Vehicle model
    pub model: String,

    /// Vehicle registration plate
    pub registration_number: String,
}

/// Per-month fuel aggregates for a vehicle
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MonthlyFuelStats {
    /// First day of the month
    pub month: NaiveDate,

    /// Number of fill-ups in the month
    pub entries: i64,

    /// Total fuel dispensed (liters)
    pub total_fuel: f64,

    /// Total amount spent
    pub total_cost: f64,

    /// Average derived mileage, if any entries carried one
    pub avg_mileage: Option<f64>,
}

impl FuelEntry {
    /// Creates a new fuel entry, deriving its mileage
    ///
    /// Looks up the previous entry by odometer order and computes km/l for
    /// the distance covered since it. The vehicle's own odometer is not
    /// touched here; the API layer advances it when the new reading is
    /// higher.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `data` - Fuel entry creation data
    ///
    /// # Returns
    ///
    /// The newly created entry with its derived mileage, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the vehicle doesn't exist (foreign key violation)
    /// or the database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use motolog_shared::models::fuel_entry::{FuelEntry, CreateFuelEntry};
    /// # use motolog_shared::models::vehicle::FuelType;
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, vehicle_id: Uuid) -> Result<(), sqlx::Error> {
    /// let entry = FuelEntry::create(
    ///     &pool,
    ///     CreateFuelEntry {
    ///         vehicle_id,
    ///         fuel_date: chrono::Utc::now().date_naive(),
    ///         odometer_reading: 10_400,
    ///         fuel_quantity: 8.0,
    ///         price_per_liter: 105.50,
    ///         total_cost: 844.0,
    ///         fuel_type: FuelType::Petrol,
    ///         fuel_station: Some("Indian Oil".to_string()),
    ///         notes: None,
    ///     },
    /// )
    /// .await?;
    /// println!("Mileage: {:?}", entry.mileage);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(pool: &PgPool, data: CreateFuelEntry) -> Result<Self, sqlx::Error> {
        let previous =
            Self::find_previous_entry(pool, data.vehicle_id, data.odometer_reading).await?;

        let mileage = previous.and_then(|prev| {
            derive_mileage(data.odometer_reading, prev.odometer_reading, data.fuel_quantity)
        });

        let entry = sqlx::query_as::<_, FuelEntry>(
            r#"
            INSERT INTO fuel_entries (
                vehicle_id, fuel_date, odometer_reading, fuel_quantity,
                price_per_liter, total_cost, fuel_type, fuel_station, notes, mileage
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, vehicle_id, fuel_date, odometer_reading, fuel_quantity,
                      price_per_liter, total_cost, fuel_type, fuel_station, notes,
                      mileage, created_at, updated_at
            "#,
        )
        .bind(data.vehicle_id)
        .bind(data.fuel_date)
        .bind(data.odometer_reading)
        .bind(data.fuel_quantity)
        .bind(data.price_per_liter)
        .bind(data.total_cost)
        .bind(data.fuel_type)
        .bind(data.fuel_station)
        .bind(data.notes)
        .bind(mileage)
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }

    /// Finds the fill-up preceding a given odometer reading
    ///
    /// "Preceding" is by odometer order: the entry with the largest reading
    /// strictly below `odometer_reading`. Fuel date breaks ties.
    pub async fn find_previous_entry(
        pool: &PgPool,
        vehicle_id: Uuid,
        odometer_reading: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        let entry = sqlx::query_as::<_, FuelEntry>(
            r#"
            SELECT id, vehicle_id, fuel_date, odometer_reading, fuel_quantity,
                   price_per_liter, total_cost, fuel_type, fuel_station, notes,
                   mileage, created_at, updated_at
            FROM fuel_entries
            WHERE vehicle_id = $1 AND odometer_reading < $2
            ORDER BY odometer_reading DESC, fuel_date DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(odometer_reading)
        .fetch_optional(pool)
        .await?;

        Ok(entry)
    }

    /// Lists fuel entries for a vehicle, newest first, with pagination
    ///
    /// Scoped to the owner through the vehicles table.
    pub async fn list_by_vehicle(
        pool: &PgPool,
        vehicle_id: Uuid,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let entries = sqlx::query_as::<_, FuelEntry>(
            r#"
            SELECT fe.id, fe.vehicle_id, fe.fuel_date, fe.odometer_reading,
                   fe.fuel_quantity, fe.price_per_liter, fe.total_cost, fe.fuel_type,
                   fe.fuel_station, fe.notes, fe.mileage, fe.created_at, fe.updated_at
            FROM fuel_entries fe
            JOIN vehicles v ON v.id = fe.vehicle_id AND v.is_active = TRUE
            WHERE fe.vehicle_id = $1 AND v.user_id = $2
            ORDER BY fe.fuel_date DESC, fe.odometer_reading DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(vehicle_id)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }

    /// Counts fuel entries for a vehicle, scoped to the owner
    pub async fn count_by_vehicle(
        pool: &PgPool,
        vehicle_id: Uuid,
        user_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM fuel_entries fe
            JOIN vehicles v ON v.id = fe.vehicle_id AND v.is_active = TRUE
            WHERE fe.vehicle_id = $1 AND v.user_id = $2
            "#,
        )
        .bind(vehicle_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Finds a fuel entry by ID, scoped to the owner
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let entry = sqlx::query_as::<_, FuelEntry>(
            r#"
            SELECT fe.id, fe.vehicle_id, fe.fuel_date, fe.odometer_reading,
                   fe.fuel_quantity, fe.price_per_liter, fe.total_cost, fe.fuel_type,
                   fe.fuel_station, fe.notes, fe.mileage, fe.created_at, fe.updated_at
            FROM fuel_entries fe
            JOIN vehicles v ON v.id = fe.vehicle_id AND v.is_active = TRUE
            WHERE fe.id = $1 AND v.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(entry)
    }

    /// Replaces a fuel entry's values and recomputes its mileage
    ///
    /// The previous entry is looked up against the new odometer reading, so
    /// moving an entry along the odometer axis rebases its mileage. Entries
    /// logged after this one are not rewritten.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - ID of entry to update
    /// * `vehicle_id` - Vehicle the entry belongs to
    /// * `data` - Full replacement values (already merged by the caller)
    ///
    /// # Returns
    ///
    /// The updated entry if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        vehicle_id: Uuid,
        data: UpdateFuelEntry,
    ) -> Result<Option<Self>, sqlx::Error> {
        let previous =
            Self::find_previous_entry(pool, vehicle_id, data.odometer_reading).await?;

        let mileage = previous.and_then(|prev| {
            derive_mileage(data.odometer_reading, prev.odometer_reading, data.fuel_quantity)
        });

        let entry = sqlx::query_as::<_, FuelEntry>(
            r#"
            UPDATE fuel_entries
            SET fuel_date = $2, odometer_reading = $3, fuel_quantity = $4,
                price_per_liter = $5, total_cost = $6, fuel_type = $7,
                fuel_station = $8, notes = $9, mileage = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING id, vehicle_id, fuel_date, odometer_reading, fuel_quantity,
                      price_per_liter, total_cost, fuel_type, fuel_station, notes,
                      mileage, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.fuel_date)
        .bind(data.odometer_reading)
        .bind(data.fuel_quantity)
        .bind(data.price_per_liter)
        .bind(data.total_cost)
        .bind(data.fuel_type)
        .bind(data.fuel_station)
        .bind(data.notes)
        .bind(mileage)
        .fetch_optional(pool)
        .await?;

        Ok(entry)
    }

    /// Deletes a fuel entry, scoped to the owner
    ///
    /// # Returns
    ///
    /// True if the entry was deleted, false if it wasn't found
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM fuel_entries fe
            USING vehicles v
            WHERE fe.id = $1 AND v.id = fe.vehicle_id AND v.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Per-month fuel aggregates for the last `months` months
    ///
    /// Callers must have verified vehicle ownership first.
    pub async fn monthly_stats(
        pool: &PgPool,
        vehicle_id: Uuid,
        months: i32,
    ) -> Result<Vec<MonthlyFuelStats>, sqlx::Error> {
        let stats = sqlx::query_as::<_, MonthlyFuelStats>(
            r#"
            SELECT DATE_TRUNC('month', fuel_date)::date AS month,
                   COUNT(*) AS entries,
                   SUM(fuel_quantity) AS total_fuel,
                   SUM(total_cost) AS total_cost,
                   AVG(mileage) AS avg_mileage
            FROM fuel_entries
            WHERE vehicle_id = $1
              AND fuel_date >= CURRENT_DATE - make_interval(months => $2)
            GROUP BY month
            ORDER BY month DESC
            "#,
        )
        .bind(vehicle_id)
        .bind(months)
        .fetch_all(pool)
        .await?;

        Ok(stats)
    }

    /// Average derived mileage across all of a vehicle's entries
    ///
    /// Callers must have verified vehicle ownership first.
    pub async fn average_mileage(
        pool: &PgPool,
        vehicle_id: Uuid,
    ) -> Result<Option<f64>, sqlx::Error> {
        let (avg,): (Option<f64>,) = sqlx::query_as(
            r#"
            SELECT AVG(mileage)
            FROM fuel_entries
            WHERE vehicle_id = $1 AND mileage IS NOT NULL
            "#,
        )
        .bind(vehicle_id)
        .fetch_one(pool)
        .await?;

        Ok(avg)
    }

    /// Total fuel spend for a vehicle, optionally bounded by dates
    ///
    /// Callers must have verified vehicle ownership first.
    pub async fn total_expense(
        pool: &PgPool,
        vehicle_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<f64, sqlx::Error> {
        let (total,): (f64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_cost), 0)
            FROM fuel_entries
            WHERE vehicle_id = $1
              AND ($2::date IS NULL OR fuel_date >= $2)
              AND ($3::date IS NULL OR fuel_date <= $3)
            "#,
        )
        .bind(vehicle_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(pool)
        .await?;

        Ok(total)
    }

    /// Most recent fill-ups across all of a user's active vehicles
    pub async fn recent_for_user(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<RecentFuelEntry>, sqlx::Error> {
        let entries = sqlx::query_as::<_, RecentFuelEntry>(
            r#"
            SELECT fe.id, fe.vehicle_id, fe.fuel_date, fe.odometer_reading,
                   fe.fuel_quantity, fe.price_per_liter, fe.total_cost, fe.fuel_type,
                   fe.mileage, v.make, v.model, v.registration_number
            FROM fuel_entries fe
            JOIN vehicles v ON v.id = fe.vehicle_id AND v.is_active = TRUE
            WHERE v.user_id = $1
            ORDER BY fe.fuel_date DESC, fe.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }
}
