use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::standings::{StandingsQuery, StandingsResponse},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/standings",
    params(StandingsQuery),
    responses(
        (status = 200, description = "Season standings for the scope", body = StandingsResponse)
    ),
    tag = "standings"
)]
pub async fn get_standings(
    State(db): State<Database>,
    Query(query): Query<StandingsQuery>,
) -> Result<Response, WebError> {
    let response = services::get_standings(db.pool(), query.into()).await?;

    Ok(Json(response).into_response())
}
