use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::{validate_password, validate_username};
use super::{
    ApiError, ApiKeyResponse, ApiResponse, AppState, LoginRequest, LoginResponse, SignupRequest,
    UserInfoResponse,
};
use crate::services::{AuthError, UserInfo};

/// Session key holding the logged-in username.
const SESSION_USER_KEY: &str = "user";

/// Identity resolved by [`auth_middleware`], available to handlers as a
/// request extension.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub is_superuser: bool,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized("Invalid credentials".to_string()),
            AuthError::UserNotFound => Self::NotFound("User not found".to_string()),
            AuthError::UsernameTaken => Self::conflict("Username is taken"),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::SessionError(msg) | AuthError::Internal(msg) => Self::internal(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks:
/// 1. Session cookie (from login/signup)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    // Check session first (fastest path for the web UI)
    if let Ok(Some(username)) = session.get::<String>(SESSION_USER_KEY).await
        && let Ok(info) = state.auth().user_info(&username).await
    {
        return Ok(authorize(request, info, next).await);
    }

    if let Some(key) = extract_api_key(&headers)
        && let Ok(Some(info)) = state.auth().verify_api_key(&key).await
    {
        return Ok(authorize(request, info, next).await);
    }

    let response = (StatusCode::UNAUTHORIZED, "Unauthorized");
    Ok(response.into_response())
}

async fn authorize(mut request: Request, info: UserInfo, next: Next) -> Response {
    tracing::Span::current().record("user_id", info.username.as_str());
    request.extensions_mut().insert(CurrentUser {
        id: info.id,
        username: info.username,
        is_superuser: info.is_superuser,
    });
    next.run(request).await
}

/// Rejects authenticated callers that are not superusers. Must run after
/// [`auth_middleware`], which inserts the [`CurrentUser`] extension.
pub async fn require_superuser(
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let Some(user) = request.extensions().get::<CurrentUser>() else {
        return Ok((StatusCode::UNAUTHORIZED, "Unauthorized").into_response());
    };

    if !user.is_superuser {
        return Err(ApiError::forbidden("Superuser access required"));
    }

    Ok(next.run(request).await)
}

/// Extract API key from headers
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    // Check X-Api-Key header
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    // Check Authorization: Bearer header
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/signup
/// Create a regular account, log it in right away, return the API key.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let username = validate_username(payload.username.trim())?;
    validate_password(&payload.password)?;

    let result = state.auth().signup(username, &payload.password).await?;

    if let Err(e) = session.insert(SESSION_USER_KEY, &result.username).await {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    Ok(Json(ApiResponse::success(LoginResponse {
        username: result.username,
        api_key: result.api_key,
        is_superuser: result.is_superuser,
    })))
}

/// POST /auth/login
/// Authenticate with username and password, returns API key on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let result = state
        .auth()
        .login(&payload.username, &payload.password)
        .await?;

    if let Err(e) = session.insert(SESSION_USER_KEY, &result.username).await {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    Ok(Json(ApiResponse::success(LoginResponse {
        username: result.username,
        api_key: result.api_key,
        is_superuser: result.is_superuser,
    })))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// POST /auth/api-key/regenerate
/// Generate a new random API key
pub async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    axum::Extension(user): axum::Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let api_key = state.auth().regenerate_api_key(&user.username).await?;

    Ok(Json(ApiResponse::success(ApiKeyResponse { api_key })))
}

/// GET /auth/me
/// Get current user information (requires authentication)
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    axum::Extension(user): axum::Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserInfoResponse>>, ApiError> {
    let info = state.auth().user_info(&user.username).await?;

    Ok(Json(ApiResponse::success(UserInfoResponse {
        username: info.username,
        is_superuser: info.is_superuser,
        created_at: info.created_at,
    })))
}
