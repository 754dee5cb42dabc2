//! # MotoLog Reminder Worker Library
//!
//! This library provides the core functionality for the daily reminder
//! worker: scanning for expiring insurance policies, PUC certificates,
//! and due services, and writing notifications for them.
//!
//! ## Modules
//!
//! - `config`: Worker configuration from environment variables
//! - `reminders`: The three reminder scans and their message formatting
//! - `scheduler`: Cron job wiring

pub mod config;
pub mod reminders;
pub mod scheduler;
