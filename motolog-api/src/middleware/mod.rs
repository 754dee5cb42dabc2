/// Middleware modules for the API server
///
/// This module contains custom middleware for:
/// - Security headers
/// - Per-client request rate limiting

pub mod rate_limit;
pub mod security;
