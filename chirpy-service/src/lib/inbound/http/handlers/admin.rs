use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;

use super::ApiError;
use crate::inbound::http::router::AppState;

/// HTML page showing how many times the file server was hit.
pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    \
         <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
        state.hits.hits()
    ))
}

/// Wipe all users and zero the hit counter. Development platform only.
pub async fn reset(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    if !state.is_dev_platform() {
        tracing::warn!(platform = %state.platform, "Reset refused outside development");
        return Err(ApiError::Forbidden(
            "Reset is only allowed in dev environment".to_string(),
        ));
    }

    state.user_service.delete_all_users().await?;
    state.hits.reset();

    Ok(StatusCode::OK)
}
