/// Vehicle model and database operations
///
/// Vehicles belong to a single user and carry the running odometer reading
/// that fuel entries are validated against. Deleting a vehicle is a soft
/// delete (`is_active = false`) so its history stays queryable.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE vehicle_type AS ENUM ('car', 'bike', 'scooter', 'truck', 'bus');
/// CREATE TYPE fuel_type AS ENUM ('petrol', 'diesel', 'cng', 'electric', 'hybrid');
///
/// CREATE TABLE vehicles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     make VARCHAR(50) NOT NULL,
///     model VARCHAR(50) NOT NULL,
///     year INTEGER NOT NULL,
///     registration_number VARCHAR(20) NOT NULL,
///     vehicle_type vehicle_type NOT NULL,
///     fuel_type fuel_type NOT NULL,
///     chassis_number VARCHAR(50),
///     engine_number VARCHAR(50),
///     color VARCHAR(30),
///     purchase_date DATE,
///     purchase_odometer INTEGER NOT NULL DEFAULT 0,
///     current_odometer INTEGER NOT NULL DEFAULT 0,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (user_id, registration_number)
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Category of vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vehicle_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Bike,
    Scooter,
    Truck,
    Bus,
}

impl VehicleType {
    /// Returns the string representation used in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Bike => "bike",
            VehicleType::Scooter => "scooter",
            VehicleType::Truck => "truck",
            VehicleType::Bus => "bus",
        }
    }
}

/// Fuel a vehicle runs on
///
/// Fuel entries reuse this type but only accept the pumpable subset
/// (petrol, diesel, cng); electric and hybrid exist for the vehicle record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fuel_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Petrol,
    Diesel,
    Cng,
    Electric,
    Hybrid,
}

impl FuelType {
    /// Returns the string representation used in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Petrol => "petrol",
            FuelType::Diesel => "diesel",
            FuelType::Cng => "cng",
            FuelType::Electric => "electric",
            FuelType::Hybrid => "hybrid",
        }
    }
}

/// Vehicle model representing a vehicle owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vehicle {
    /// Unique vehicle ID (UUID v4)
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Manufacturer name
    pub make: String,

    /// Model name
    pub model: String,

    /// Manufacturing year
    pub year: i32,

    /// Registration plate number
    ///
    /// Unique per user, not globally
    pub registration_number: String,

    /// Category of vehicle
    pub vehicle_type: VehicleType,

    /// Fuel the vehicle runs on
    pub fuel_type: FuelType,

    /// Optional chassis number
    pub chassis_number: Option<String>,

    /// Optional engine number
    pub engine_number: Option<String>,

    /// Optional color
    pub color: Option<String>,

    /// Optional purchase date
    pub purchase_date: Option<NaiveDate>,

    /// Odometer reading at purchase (km)
    pub purchase_odometer: i32,

    /// Latest known odometer reading (km)
    ///
    /// Advanced automatically when a fuel entry with a higher reading is logged
    pub current_odometer: i32,

    /// Whether the vehicle is active (false after soft delete)
    pub is_active: bool,

    /// When the vehicle was created
    pub created_at: DateTime<Utc>,

    /// When the vehicle was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicle {
    /// Owning user
    pub user_id: Uuid,

    /// Manufacturer name
    pub make: String,

    /// Model name
    pub model: String,

    /// Manufacturing year
    pub year: i32,

    /// Registration plate number (unique per user)
    pub registration_number: String,

    /// Category of vehicle
    pub vehicle_type: VehicleType,

    /// Fuel the vehicle runs on
    pub fuel_type: FuelType,

    /// Optional chassis number
    pub chassis_number: Option<String>,

    /// Optional engine number
    pub engine_number: Option<String>,

    /// Optional color
    pub color: Option<String>,

    /// Optional purchase date
    pub purchase_date: Option<NaiveDate>,

    /// Odometer reading at purchase (defaults to 0)
    pub purchase_odometer: Option<i32>,

    /// Current odometer reading (defaults to 0)
    pub current_odometer: Option<i32>,
}

/// Input for updating an existing vehicle
///
/// All fields are optional. Only non-None fields will be updated. Odometer
/// changes go through [`Vehicle::update_odometer`] instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVehicle {
    /// New manufacturer name
    pub make: Option<String>,

    /// New model name
    pub model: Option<String>,

    /// New manufacturing year
    pub year: Option<i32>,

    /// New registration plate number
    pub registration_number: Option<String>,

    /// New vehicle category
    pub vehicle_type: Option<VehicleType>,

    /// New fuel type
    pub fuel_type: Option<FuelType>,

    /// New chassis number (use Some(None) to clear)
    pub chassis_number: Option<Option<String>>,

    /// New engine number (use Some(None) to clear)
    pub engine_number: Option<Option<String>>,

    /// New color (use Some(None) to clear)
    pub color: Option<Option<String>>,

    /// New purchase date (use Some(None) to clear)
    pub purchase_date: Option<Option<NaiveDate>>,
}

/// Aggregate counts for a user's active fleet
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VehicleStats {
    /// Total active vehicles
    pub total_vehicles: i64,

    /// Counts per vehicle type
    pub cars: i64,
    pub bikes: i64,
    pub scooters: i64,
    pub trucks: i64,
    pub buses: i64,

    /// Counts per fuel type
    pub petrol_vehicles: i64,
    pub diesel_vehicles: i64,
    pub cng_vehicles: i64,
    pub electric_vehicles: i64,
    pub hybrid_vehicles: i64,
}

/// A vehicle with insurance or PUC expiring inside the lookahead window
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UpcomingRenewal {
    /// Vehicle ID
    pub id: Uuid,

    /// Manufacturer name
    pub make: String,

    /// Model name
    pub model: String,

    /// Registration plate number
    pub registration_number: String,

    /// Expiry of the active insurance policy, if any
    pub insurance_expiry: Option<NaiveDate>,

    /// Expiry of the valid PUC certificate, if any
    pub puc_expiry: Option<NaiveDate>,

    /// Earliest of the two expiries
    pub next_expiry: Option<NaiveDate>,
}

impl Vehicle {
    /// Creates a new vehicle in the database
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `data` - Vehicle creation data
    ///
    /// # Returns
    ///
    /// The newly created vehicle with generated ID and timestamps
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user already has a vehicle with this registration number
    ///   (unique constraint violation)
    /// - Database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use motolog_shared::models::vehicle::{Vehicle, CreateVehicle, VehicleType, FuelType};
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    /// let new_vehicle = CreateVehicle {
    ///     user_id,
    ///     make: "Honda".to_string(),
    ///     model: "City".to_string(),
    ///     year: 2022,
    ///     registration_number: "MH12AB1234".to_string(),
    ///     vehicle_type: VehicleType::Car,
    ///     fuel_type: FuelType::Petrol,
    ///     chassis_number: None,
    ///     engine_number: None,
    ///     color: Some("White".to_string()),
    ///     purchase_date: None,
    ///     purchase_odometer: Some(0),
    ///     current_odometer: Some(12000),
    /// };
    ///
    /// let vehicle = Vehicle::create(&pool, new_vehicle).await?;
    /// println!("Created vehicle: {}", vehicle.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(pool: &PgPool, data: CreateVehicle) -> Result<Self, sqlx::Error> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                user_id, make, model, year, registration_number,
                vehicle_type, fuel_type, chassis_number, engine_number,
                color, purchase_date, purchase_odometer, current_odometer
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, user_id, make, model, year, registration_number,
                      vehicle_type, fuel_type, chassis_number, engine_number,
                      color, purchase_date, purchase_odometer, current_odometer,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.make)
        .bind(data.model)
        .bind(data.year)
        .bind(data.registration_number)
        .bind(data.vehicle_type)
        .bind(data.fuel_type)
        .bind(data.chassis_number)
        .bind(data.engine_number)
        .bind(data.color)
        .bind(data.purchase_date)
        .bind(data.purchase_odometer.unwrap_or(0))
        .bind(data.current_odometer.unwrap_or(0))
        .fetch_one(pool)
        .await?;

        Ok(vehicle)
    }

    /// Lists active vehicles for a user, newest first, with pagination
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, user_id, make, model, year, registration_number,
                   vehicle_type, fuel_type, chassis_number, engine_number,
                   color, purchase_date, purchase_odometer, current_odometer,
                   is_active, created_at, updated_at
            FROM vehicles
            WHERE user_id = $1 AND is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(vehicles)
    }

    /// Counts a user's active vehicles
    pub async fn count_by_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM vehicles WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Finds an active vehicle by ID, scoped to its owner
    ///
    /// Soft-deleted vehicles and vehicles belonging to other users are not
    /// returned; both cases look identical to the caller.
    ///
    /// # Returns
    ///
    /// The vehicle if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, user_id, make, model, year, registration_number,
                   vehicle_type, fuel_type, chassis_number, engine_number,
                   color, purchase_date, purchase_odometer, current_odometer,
                   is_active, created_at, updated_at
            FROM vehicles
            WHERE id = $1 AND user_id = $2 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(vehicle)
    }

    /// Finds a vehicle by registration number within a user's fleet
    ///
    /// Used for friendly duplicate detection before insert. Includes
    /// soft-deleted vehicles because the unique constraint does too.
    pub async fn find_by_registration(
        pool: &PgPool,
        user_id: Uuid,
        registration_number: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, user_id, make, model, year, registration_number,
                   vehicle_type, fuel_type, chassis_number, engine_number,
                   color, purchase_date, purchase_odometer, current_odometer,
                   is_active, created_at, updated_at
            FROM vehicles
            WHERE user_id = $1 AND registration_number = $2
            "#,
        )
        .bind(user_id)
        .bind(registration_number)
        .fetch_optional(pool)
        .await?;

        Ok(vehicle)
    }

    /// Updates an existing vehicle's descriptive fields
    ///
    /// Only non-None fields in `data` will be updated. The `updated_at`
    /// timestamp is automatically set to the current time.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - ID of vehicle to update
    /// * `user_id` - Owner, for scoping
    /// * `data` - Fields to update (only non-None values are updated)
    ///
    /// # Returns
    ///
    /// The updated vehicle if found, None if it doesn't exist or belongs to
    /// another user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The new registration number collides with another vehicle of the
    ///   same user
    /// - Database connection fails
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdateVehicle,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE vehicles SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.make.is_some() {
            bind_count += 1;
            query.push_str(&format!(", make = ${}", bind_count));
        }
        if data.model.is_some() {
            bind_count += 1;
            query.push_str(&format!(", model = ${}", bind_count));
        }
        if data.year.is_some() {
            bind_count += 1;
            query.push_str(&format!(", year = ${}", bind_count));
        }
        if data.registration_number.is_some() {
            bind_count += 1;
            query.push_str(&format!(", registration_number = ${}", bind_count));
        }
        if data.vehicle_type.is_some() {
            bind_count += 1;
            query.push_str(&format!(", vehicle_type = ${}", bind_count));
        }
        if data.fuel_type.is_some() {
            bind_count += 1;
            query.push_str(&format!(", fuel_type = ${}", bind_count));
        }
        if data.chassis_number.is_some() {
            bind_count += 1;
            query.push_str(&format!(", chassis_number = ${}", bind_count));
        }
        if data.engine_number.is_some() {
            bind_count += 1;
            query.push_str(&format!(", engine_number = ${}", bind_count));
        }
        if data.color.is_some() {
            bind_count += 1;
            query.push_str(&format!(", color = ${}", bind_count));
        }
        if data.purchase_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", purchase_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND user_id = $2 AND is_active = TRUE \
             RETURNING id, user_id, make, model, year, registration_number, \
             vehicle_type, fuel_type, chassis_number, engine_number, color, \
             purchase_date, purchase_odometer, current_odometer, is_active, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Vehicle>(&query).bind(id).bind(user_id);

        if let Some(make) = data.make {
            q = q.bind(make);
        }
        if let Some(model) = data.model {
            q = q.bind(model);
        }
        if let Some(year) = data.year {
            q = q.bind(year);
        }
        if let Some(registration_number) = data.registration_number {
            q = q.bind(registration_number);
        }
        if let Some(vehicle_type) = data.vehicle_type {
            q = q.bind(vehicle_type);
        }
        if let Some(fuel_type) = data.fuel_type {
            q = q.bind(fuel_type);
        }
        if let Some(chassis_opt) = data.chassis_number {
            q = q.bind(chassis_opt);
        }
        if let Some(engine_opt) = data.engine_number {
            q = q.bind(engine_opt);
        }
        if let Some(color_opt) = data.color {
            q = q.bind(color_opt);
        }
        if let Some(purchase_date_opt) = data.purchase_date {
            q = q.bind(purchase_date_opt);
        }

        let vehicle = q.fetch_optional(pool).await?;

        Ok(vehicle)
    }

    /// Sets the current odometer reading directly
    ///
    /// This is the manual correction path. Fuel entries advance the odometer
    /// on their own when a higher reading is logged.
    ///
    /// # Returns
    ///
    /// The updated vehicle if found, None otherwise
    pub async fn update_odometer(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        odometer: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET current_odometer = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_active = TRUE
            RETURNING id, user_id, make, model, year, registration_number,
                      vehicle_type, fuel_type, chassis_number, engine_number,
                      color, purchase_date, purchase_odometer, current_odometer,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(odometer)
        .fetch_optional(pool)
        .await?;

        Ok(vehicle)
    }

    /// Soft-deletes a vehicle
    ///
    /// Marks the vehicle inactive rather than removing the row, so fuel and
    /// compliance history survives. Already-deleted vehicles report false.
    ///
    /// # Returns
    ///
    /// True if the vehicle was deactivated, false if it wasn't found
    pub async fn soft_delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Aggregates per-type and per-fuel counts for a user's active fleet
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn stats(pool: &PgPool, user_id: Uuid) -> Result<VehicleStats, sqlx::Error> {
        let stats = sqlx::query_as::<_, VehicleStats>(
            r#"
            SELECT
                COUNT(*) AS total_vehicles,
                COUNT(CASE WHEN vehicle_type = 'car' THEN 1 END) AS cars,
                COUNT(CASE WHEN vehicle_type = 'bike' THEN 1 END) AS bikes,
                COUNT(CASE WHEN vehicle_type = 'scooter' THEN 1 END) AS scooters,
                COUNT(CASE WHEN vehicle_type = 'truck' THEN 1 END) AS trucks,
                COUNT(CASE WHEN vehicle_type = 'bus' THEN 1 END) AS buses,
                COUNT(CASE WHEN fuel_type = 'petrol' THEN 1 END) AS petrol_vehicles,
                COUNT(CASE WHEN fuel_type = 'diesel' THEN 1 END) AS diesel_vehicles,
                COUNT(CASE WHEN fuel_type = 'cng' THEN 1 END) AS cng_vehicles,
                COUNT(CASE WHEN fuel_type = 'electric' THEN 1 END) AS electric_vehicles,
                COUNT(CASE WHEN fuel_type = 'hybrid' THEN 1 END) AS hybrid_vehicles
            FROM vehicles
            WHERE user_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }

    /// Lists vehicles whose insurance or PUC expires within `days` days
    ///
    /// Joins the active insurance policy and valid PUC certificate per
    /// vehicle and keeps the row with the earliest upcoming expiry.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `user_id` - Owner whose fleet is scanned
    /// * `days` - Lookahead window in days
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn upcoming_renewals(
        pool: &PgPool,
        user_id: Uuid,
        days: i32,
    ) -> Result<Vec<UpcomingRenewal>, sqlx::Error> {
        let renewals = sqlx::query_as::<_, UpcomingRenewal>(
            r#"
            SELECT DISTINCT ON (v.id)
                v.id, v.make, v.model, v.registration_number,
                i.expiry_date AS insurance_expiry,
                p.expiry_date AS puc_expiry,
                LEAST(i.expiry_date, p.expiry_date) AS next_expiry
            FROM vehicles v
            LEFT JOIN insurance i
                ON i.vehicle_id = v.id AND i.is_active = TRUE
            LEFT JOIN puc_certificates p
                ON p.vehicle_id = v.id AND p.is_valid = TRUE
            WHERE v.user_id = $1
              AND v.is_active = TRUE
              AND (
                  i.expiry_date <= CURRENT_DATE + make_interval(days => $2)
                  OR p.expiry_date <= CURRENT_DATE + make_interval(days => $2)
              )
            ORDER BY v.id, next_expiry ASC
            "#,
        )
        .bind(user_id)
        .bind(days)
        .fetch_all(pool)
        .await?;

        Ok(renewals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_type_as_str() {
        assert_eq!(VehicleType::Car.as_str(), "car");
        assert_eq!(VehicleType::Bike.as_str(), "bike");
        assert_eq!(VehicleType::Scooter.as_str(), "scooter");
        assert_eq!(VehicleType::Truck.as_str(), "truck");
        assert_eq!(VehicleType::Bus.as_str(), "bus");
    }

    #[test]
    fn test_fuel_type_as_str() {
        assert_eq!(FuelType::Petrol.as_str(), "petrol");
        assert_eq!(FuelType::Diesel.as_str(), "diesel");
        assert_eq!(FuelType::Cng.as_str(), "cng");
        assert_eq!(FuelType::Electric.as_str(), "electric");
        assert_eq!(FuelType::Hybrid.as_str(), "hybrid");
    }

    #[test]
    fn test_enum_serialization_lowercase() {
        assert_eq!(
            serde_json::to_string(&VehicleType::Scooter).unwrap(),
            "\"scooter\""
        );
        assert_eq!(serde_json::to_string(&FuelType::Cng).unwrap(), "\"cng\"");

        let vt: VehicleType = serde_json::from_str("\"truck\"").unwrap();
        assert_eq!(vt, VehicleType::Truck);
    }

    #[test]
    fn test_create_vehicle_struct() {
        let create = CreateVehicle {
            user_id: Uuid::new_v4(),
            make: "Honda".to_string(),
            model: "City".to_string(),
            year: 2022,
            registration_number: "MH12AB1234".to_string(),
            vehicle_type: VehicleType::Car,
            fuel_type: FuelType::Petrol,
            chassis_number: None,
            engine_number: None,
            color: None,
            purchase_date: None,
            purchase_odometer: None,
            current_odometer: Some(12000),
        };

        assert_eq!(create.make, "Honda");
        assert_eq!(create.current_odometer, Some(12000));
    }

    #[test]
    fn test_update_vehicle_default() {
        let update = UpdateVehicle::default();
        assert!(update.make.is_none());
        assert!(update.model.is_none());
        assert!(update.year.is_none());
        assert!(update.registration_number.is_none());
        assert!(update.color.is_none());
    }

    // Integration tests for database operations are in motolog-api/tests/
}
