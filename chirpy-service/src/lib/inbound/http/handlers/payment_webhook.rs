use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;

use super::ApiError;
use crate::domain::user::errors::UserError;
use crate::domain::user::events::PaymentEvent;
use crate::domain::user::events::PaymentWebhook;
use crate::inbound::http::router::AppState;

/// Receive payment notifications from Polka.
///
/// The caller proves itself with `Authorization: ApiKey <key>`. Events other
/// than an upgrade are acknowledged and dropped.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(webhook): Json<PaymentWebhook>,
) -> Result<StatusCode, ApiError> {
    state.authenticator.authenticate_api_key(&headers)?;

    state
        .user_service
        .handle_payment_event(PaymentEvent::from(webhook))
        .await
        .map_err(|e| match e {
            UserError::InvalidUserId(_) => ApiError::BadRequest(e.to_string()),
            _ => ApiError::from(e),
        })?;

    Ok(StatusCode::NO_CONTENT)
}
