use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::UserModel;
use crate::response::ApiResponse;
use crate::services::auth::AuthService;
use anyhow::anyhow;
use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// Username (3-50 characters), the account's identity
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    /// First name
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    /// Last name
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    /// Password (min 8 characters)
    #[validate(length(min = 8))]
    pub password: String,
    /// Affiliation tag
    #[validate(length(min = 1, max = 150))]
    pub mis: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username
    pub username: String,
    /// User password
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// JWT access token
    pub token: String,
    /// Username
    pub username: String,
    /// Role carried by the token
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    /// Username
    pub username: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Affiliation tag
    pub mis: String,
    /// User role (user or admin)
    pub role: String,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            mis: user.mis,
            role: user.role,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created successfully", body = UserResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 409, description = "Username already exists", body = AppError),
    ),
    tag = "auth"
)]
pub async fn signup(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let service = AuthService::new(db);
    let user = service
        .signup(
            &payload.username,
            &payload.first_name,
            &payload.last_name,
            &payload.password,
            &payload.mis,
        )
        .await?;

    Ok(ApiResponse::with_message(
        UserResponse::from(user),
        "Signup successful. Please log in.".to_string(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AppError),
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let service = AuthService::new(db);
    let (user, token) = service.login(&payload.username, &payload.password).await?;

    let response = AuthResponse {
        token: token.clone(),
        username: user.username,
        role: user.role,
    };

    let mut http_response = ApiResponse::ok(response).into_response();
    set_auth_cookie(&mut http_response, &token)?;
    Ok(http_response)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Logout successful", body = String),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "auth"
)]
pub async fn logout(_auth_user: AuthUser) -> AppResult<impl IntoResponse> {
    let mut response = ApiResponse::ok("Logout successful").into_response();
    clear_auth_cookie(&mut response)?;
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Current user retrieved successfully", body = UserResponse),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "auth"
)]
pub async fn get_current_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let service = AuthService::new(db);
    let user = service.get_by_username(&auth_user.username).await?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

fn set_auth_cookie(response: &mut Response, token: &str) -> AppResult<()> {
    let cookie = crate::utils::cookie::build_auth_cookie(
        crate::utils::cookie::ACCESS_TOKEN_COOKIE,
        token,
        crate::utils::jwt::token_expiry_seconds(),
    );
    append_set_cookie(response, &cookie)
}

fn clear_auth_cookie(response: &mut Response) -> AppResult<()> {
    let cookie =
        crate::utils::cookie::build_clear_cookie(crate::utils::cookie::ACCESS_TOKEN_COOKIE);
    append_set_cookie(response, &cookie)
}

fn append_set_cookie(response: &mut Response, cookie_value: &str) -> AppResult<()> {
    let value = HeaderValue::from_str(cookie_value)
        .map_err(|e| AppError::Internal(anyhow!("Invalid cookie value: {e}")))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}
