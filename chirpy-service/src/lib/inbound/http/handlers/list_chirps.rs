use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::ChirpData;
use crate::domain::chirp::models::ListChirpsQuery;
use crate::domain::chirp::models::SortOrder;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListChirpsParams {
    author_id: Option<String>,
    sort: Option<String>,
}

pub async fn list_chirps(
    State(state): State<AppState>,
    Query(params): Query<ListChirpsParams>,
) -> Result<ApiSuccess<Vec<ChirpData>>, ApiError> {
    let author = params
        .author_id
        .filter(|id| !id.is_empty())
        .map(|id| UserId::from_string(&id))
        .transpose()
        .map_err(|e| ApiError::BadRequest(format!("Invalid author_id: {}", e)))?;

    let query = ListChirpsQuery {
        author,
        sort: SortOrder::parse(params.sort.as_deref()),
    };

    let chirps = state.chirp_service.list_chirps(query).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        chirps.iter().map(ChirpData::from).collect(),
    ))
}
