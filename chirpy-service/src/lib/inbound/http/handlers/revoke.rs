use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::ApiError;
use crate::inbound::http::router::AppState;

pub async fn revoke(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.authenticator.revoke(&headers).await?;

    tracing::info!("Refresh token revoked");
    Ok(StatusCode::NO_CONTENT)
}
