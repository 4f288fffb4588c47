//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;

use super::dto::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use crate::domain::user::{User, UserRole};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub jwt_config: JwtConfig,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    // `username` may carry either the username or the e-mail
    let user = match state.repos.users().find_by_username(&request.username).await {
        Ok(Some(user)) => Some(user),
        Ok(None) => state
            .repos
            .users()
            .find_by_email(&request.username)
            .await
            .map_err(domain_error_response)?,
        Err(e) => return Err(domain_error_response(e)),
    };

    let Some(user) = user else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials")),
        ));
    };

    if !user.is_active {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Account is disabled")),
        ));
    }

    let password_valid = verify_password(&request.password, &user.password_hash).unwrap_or(false);
    if !password_valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials")),
        ));
    }

    state
        .repos
        .users()
        .touch_last_login(&user.id, Utc::now())
        .await
        .ok();

    let token = create_token(
        &user.id,
        &user.username,
        user.role.as_str(),
        &state.jwt_config,
    )
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let response = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: UserInfo::from_domain(user),
    };

    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserInfo>),
        (status = 409, description = "User already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), (StatusCode, Json<ApiResponse<UserInfo>>)> {
    let taken = state
        .repos
        .users()
        .find_by_username(&request.username)
        .await
        .map_err(domain_error_response)?
        .is_some()
        || state
            .repos
            .users()
            .find_by_email(&request.email)
            .await
            .map_err(domain_error_response)?
            .is_some();

    if taken {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Username or email already registered")),
        ));
    }

    let hash = hash_password(&request.password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let now = Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: request.username,
        email: request.email,
        password_hash: hash,
        role: UserRole::Attendee,
        is_active: true,
        created_at: now,
        updated_at: now,
        last_login_at: None,
    };

    state
        .repos
        .users()
        .save(user.clone())
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserInfo::from_domain(user))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserInfo>>, (StatusCode, Json<ApiResponse<UserInfo>>)> {
    let user = state
        .repos
        .users()
        .find_by_id(&auth.user_id)
        .await
        .map_err(domain_error_response)?;

    let Some(user) = user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User no longer exists")),
        ));
    };

    Ok(Json(ApiResponse::success(UserInfo::from_domain(user))))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<String>),
        (status = 401, description = "Wrong current password")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<String>>)> {
    let user = state
        .repos
        .users()
        .find_by_id(&auth.user_id)
        .await
        .map_err(domain_error_response)?;

    let Some(user) = user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User no longer exists")),
        ));
    };

    let valid = verify_password(&request.current_password, &user.password_hash).unwrap_or(false);
    if !valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Current password is incorrect")),
        ));
    }

    let hash = hash_password(&request.new_password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    state
        .repos
        .users()
        .set_password_hash(&user.id, &hash)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success("Password changed".to_string())))
}
