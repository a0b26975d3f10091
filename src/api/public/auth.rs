use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::api::{error_body, AppState};
use crate::catalog::GatewayError;
use crate::middleware::logging::{to_response, ApiError};
use crate::session::SessionError;

//ROUTERS
pub fn auth_router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session))
}

//ROUTES
async fn login(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Response {
    if let Err(err) = payload.validate() {
        return to_response(
            (StatusCode::BAD_REQUEST, error_body(err.to_string())),
            Err(ApiError::ValidationFail(err.to_string())),
        );
    }

    let result = state
        .session
        .login(
            state.catalog.client(),
            &payload.username,
            &payload.password,
            payload.remember,
        )
        .await;
    match result {
        Ok(profile) => to_response(
            (
                StatusCode::OK,
                Json(json!({
                    "username": profile.username,
                    "token": profile.access_token
                })),
            ),
            Ok(()),
        ),
        Err(SessionError::Login(GatewayError::Status { status, message }))
            if status == 400 || status == 401 =>
        {
            to_response(
                (StatusCode::UNAUTHORIZED, error_body("Invalid credentials")),
                Err(ApiError::Session(message)),
            )
        }
        Err(err) => to_response(
            (StatusCode::BAD_GATEWAY, error_body(err.to_string())),
            Err(ApiError::Session(err.to_string())),
        ),
    }
}

async fn logout(Extension(state): Extension<AppState>) -> Response {
    match state.session.logout().await {
        Ok(()) => to_response(
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Logged out successfully"
                })),
            ),
            Ok(()),
        ),
        Err(err) => to_response(
            (StatusCode::INTERNAL_SERVER_ERROR, error_body("Internal server error")),
            Err(ApiError::Session(err.to_string())),
        ),
    }
}

async fn session(Extension(state): Extension<AppState>) -> Response {
    let remembered_username = match state.session.remembered_username().await {
        Ok(username) => username,
        Err(err) => {
            return to_response(
                (StatusCode::INTERNAL_SERVER_ERROR, error_body("Internal server error")),
                Err(ApiError::Session(err.to_string())),
            )
        }
    };
    let response = SessionResponse {
        authenticated: state.session.is_authenticated().await,
        remembered_username,
    };
    to_response((StatusCode::OK, Json(response)), Ok(()))
}

//structs
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username must not be empty"))]
    username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    password: String,
    #[serde(default)]
    remember: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    authenticated: bool,
    remembered_username: Option<String>,
}
