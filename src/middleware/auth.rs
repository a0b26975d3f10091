use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::session::Session;

/// Lets admin requests through only while a session token is stored.
pub async fn auth_middleware(
    State(session): State<Session>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if !session.is_authenticated().await {
        warn!(uri = %req.uri(), "Rejected admin request without a session");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(req).await)
}
