/// API route handlers
///
/// Each module owns one resource under `/api`:
///
/// - [`health`]: liveness and database connectivity check
/// - [`auth`]: registration, login, profile, password change
/// - [`vehicles`]: vehicle CRUD, stats, upcoming renewals
/// - [`fuel`]: fuel entries, mileage derivation, per-vehicle statistics
/// - [`insurance`]: insurance policies per vehicle
/// - [`puc`]: pollution-under-control certificates per vehicle
/// - [`services`]: service history and next-service data
/// - [`notifications`]: worker-generated reminders
/// - [`dashboard`]: cross-resource aggregate views

pub mod auth;
pub mod dashboard;
pub mod fuel;
pub mod health;
pub mod insurance;
pub mod notifications;
pub mod puc;
pub mod services;
pub mod vehicles;
