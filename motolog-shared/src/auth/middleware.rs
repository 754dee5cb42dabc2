/// Request authentication context
///
/// The API server validates the `Authorization: Bearer <token>` header in a
/// middleware layer and stores an [`AuthContext`] in the request extensions.
/// Handlers extract it with Axum's `Extension` extractor and scope every
/// query to `auth.user_id`.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use motolog_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.user_id, auth.email)
/// }
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;

/// Authentication context added to request extensions
///
/// Built from validated JWT claims; no database lookup is involved, so the
/// email and role reflect the account at token issue time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Account email carried in the token
    pub email: String,

    /// Account role carried in the token
    pub role: String,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.clone(),
            role: claims.role.clone(),
        }
    }

    /// Whether the authenticated account has the admin role
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}
