use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::errors::UserError;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // Unknown email and wrong password must look the same to the caller
    let user = match state.user_service.get_user_by_email(&body.email).await {
        Ok(user) => user,
        Err(UserError::NotFoundByEmail(_)) => {
            tracing::warn!("Login attempt for unknown email");
            return Err(state
                .authenticator
                .reject_unknown_user(&body.password)
                .await
                .into());
        }
        Err(e) => return Err(e.into()),
    };

    let tokens = state
        .authenticator
        .authenticate(&body.password, &user.password_hash, user.id.0)
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            user: (&user).into(),
            token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    #[serde(flatten)]
    pub user: UserData,
    pub token: String,
    pub refresh_token: String,
}
