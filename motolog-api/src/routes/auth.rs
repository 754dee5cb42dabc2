/// Authentication endpoints
///
/// This module provides user account endpoints:
/// - Registration
/// - Login
/// - Profile fetch and update
/// - Password change
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get a token
/// - `GET /api/auth/profile` - Current user profile
/// - `PUT /api/auth/profile` - Update profile fields
/// - `PUT /api/auth/change-password` - Change password

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    response::{ApiResponse, MessageResponse},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Duration, Utc};
use motolog_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{CreateUser, UpdateProfile, User, UserRole},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// First name
    #[validate(length(
        min = 2,
        max = 50,
        message = "First name must be between 2 and 50 characters"
    ))]
    pub first_name: String,

    /// Last name
    #[validate(length(
        min = 2,
        max = 50,
        message = "Last name must be between 2 and 50 characters"
    ))]
    pub last_name: String,

    /// Email address
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    /// Password (checked separately against the account policy)
    pub password: String,

    /// Optional phone number
    #[validate(length(
        min = 7,
        max = 20,
        message = "Please provide a valid phone number"
    ))]
    pub phone: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Profile update request. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(
        min = 2,
        max = 50,
        message = "First name must be between 2 and 50 characters"
    ))]
    pub first_name: Option<String>,

    #[validate(length(
        min = 2,
        max = 50,
        message = "Last name must be between 2 and 50 characters"
    ))]
    pub last_name: Option<String>,

    #[validate(length(
        min = 7,
        max = 20,
        message = "Please provide a valid phone number"
    ))]
    pub phone: Option<String>,
}

/// Password change request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// User payload returned by auth endpoints.
///
/// Deliberately rebuilt from the model so the password hash and login
/// bookkeeping never reach the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Payload for register and login responses
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: UserProfile,
    pub token: String,
}

/// Payload for profile responses
#[derive(Debug, Serialize)]
pub struct ProfilePayload {
    pub user: UserProfile,
}

/// Signs a JWT for the user with the configured lifetime.
fn issue_token(state: &AppState, user: &User) -> Result<String, ApiError> {
    let claims = jwt::Claims::with_expiration(
        user.id,
        user.email.clone(),
        user.role.as_str().to_string(),
        Duration::hours(state.config.jwt.expires_in_hours),
    );

    Ok(jwt::create_token(&claims, state.jwt_secret())?)
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "firstName": "Asha",
///   "lastName": "Nair",
///   "email": "asha@example.com",
///   "password": "Secure1pass",
///   "phone": "+919876543210"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthPayload>>)> {
    req.validate()?;

    password::validate_password_strength(&req.password).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })?;

    let email = req.email.trim().to_lowercase();

    // Checked up front for a clean message; the unique index still backs
    // this up under concurrent registration.
    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
        },
    )
    .await?;

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User registered successfully",
            AuthPayload {
                user: user.into(),
                token,
            },
        )),
    ))
}

/// Login endpoint
///
/// Authenticates a user, records the login time, and returns a JWT.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials or deactivated account
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthPayload>>> {
    req.validate()?;

    let email = req.email.trim().to_lowercase();

    // One message for unknown email and wrong password
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Unauthorized(
            "Account is deactivated".to_string(),
        ));
    }

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    User::update_last_login(&state.db, user.id).await?;

    let token = issue_token(&state, &user)?;

    Ok(Json(ApiResponse::with_message(
        "Login successful",
        AuthPayload {
            user: user.into(),
            token,
        },
    )))
}

/// Current user profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<ProfilePayload>>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::new(ProfilePayload { user: user.into() })))
}

/// Update profile fields
///
/// Accepts any subset of firstName, lastName, and phone.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<ProfilePayload>>> {
    req.validate()?;

    let user = User::update_profile(
        &state.db,
        auth.user_id,
        UpdateProfile {
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone.map(Some),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(
        "Profile updated successfully",
        ProfilePayload { user: user.into() },
    )))
}

/// Change password
///
/// # Errors
///
/// - `400 Bad Request`: New password fails the account policy
/// - `401 Unauthorized`: Current password does not match
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = password::verify_password(&req.current_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    password::validate_password_strength(&req.new_password).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "newPassword".to_string(),
            message,
        }])
    })?;

    let new_hash = password::hash_password(&req.new_password)?;

    let updated = User::update_password(&state.db, user.id, &new_hash).await?;
    if !updated {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %user.id, "Password changed");

    Ok(Json(MessageResponse::new("Password changed successfully")))
}
