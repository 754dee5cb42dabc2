/// Database models for MotoLog
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `vehicle`: Vehicles owned by users
/// - `fuel_entry`: Fuel fill-up log with derived mileage
/// - `insurance`: Insurance policies per vehicle
/// - `puc`: Pollution-under-control certificates per vehicle
/// - `service_record`: Service history and next-service schedules
/// - `notification`: Reminder notifications generated for users
///
/// # Example
///
/// ```no_run
/// use motolog_shared::models::user::{User, CreateUser};
/// use motolog_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     first_name: "John".to_string(),
///     last_name: "Doe".to_string(),
///     phone: None,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```
pub mod fuel_entry;
pub mod insurance;
pub mod notification;
pub mod puc;
pub mod service_record;
pub mod user;
pub mod vehicle;
