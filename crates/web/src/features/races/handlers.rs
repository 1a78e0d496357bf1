use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::race::{RaceResponse, RecordShootingRequest, RecordSplitRequest},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/races/{id}",
    params(
        ("id" = i64, Path, description = "Race id")
    ),
    responses(
        (status = 200, description = "Race found", body = RaceResponse),
        (status = 404, description = "Race not found")
    ),
    tag = "races"
)]
pub async fn get_race(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let race = services::get_race(db.pool(), id).await?;

    Ok(Json(RaceResponse::from(race)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/races/{id}/splits",
    params(
        ("id" = i64, Path, description = "Race id")
    ),
    request_body = RecordSplitRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Split recorded", body = RaceResponse),
        (status = 400, description = "Split out of order or outside the course"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Race not found")
    ),
    tag = "races"
)]
pub async fn record_split(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(req): Json<RecordSplitRequest>,
) -> Result<Response, WebError> {
    let race = services::record_split(db.pool(), id, req.phase, req.timestamp_ms).await?;

    Ok(Json(RaceResponse::from(race)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/races/{id}/shooting",
    params(
        ("id" = i64, Path, description = "Race id")
    ),
    request_body = RecordShootingRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Shooting bout recorded", body = RaceResponse),
        (status = 400, description = "Range or hit count out of bounds"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Race not found")
    ),
    tag = "races"
)]
pub async fn record_shooting(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(req): Json<RecordShootingRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let race = services::record_shooting(db.pool(), id, req.range, req.hits).await?;

    Ok(Json(RaceResponse::from(race)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/races/{id}/reset",
    params(
        ("id" = i64, Path, description = "Race id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Race cleared back to its created form", body = RaceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Race not found")
    ),
    tag = "races"
)]
pub async fn reset_race(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let race = services::reset_race(db.pool(), id).await?;

    Ok(Json(RaceResponse::from(race)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/races/{id}",
    params(
        ("id" = i64, Path, description = "Race id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Race and its paired opponent race deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Race not found")
    ),
    tag = "races"
)]
pub async fn remove_duel(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    services::remove_duel(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
