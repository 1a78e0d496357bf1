use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::competitor::{
        CompetitorProfileResponse, CompetitorResponse, CreateCompetitorRequest,
        UpdateCompetitorRequest,
    },
    dto::race::RaceResponse,
    dto::standings::StandingsQuery,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitors",
    responses(
        (status = 200, description = "List all competitors successfully", body = Vec<CompetitorResponse>)
    ),
    tag = "competitors"
)]
pub async fn list_competitors(State(db): State<Database>) -> Result<Response, WebError> {
    let competitors = services::list_competitors(db.pool()).await?;

    let response: Vec<CompetitorResponse> = competitors
        .into_iter()
        .map(CompetitorResponse::from)
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitors/{id}",
    params(
        ("id" = i64, Path, description = "Competitor id")
    ),
    responses(
        (status = 200, description = "Competitor found", body = CompetitorResponse),
        (status = 404, description = "Competitor not found")
    ),
    tag = "competitors"
)]
pub async fn get_competitor(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let competitor = services::get_competitor(db.pool(), id).await?;

    Ok(Json(CompetitorResponse::from(competitor)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitors/{id}/races",
    params(
        ("id" = i64, Path, description = "Competitor id")
    ),
    responses(
        (status = 200, description = "Race history of the competitor", body = Vec<RaceResponse>),
        (status = 404, description = "Competitor not found")
    ),
    tag = "competitors"
)]
pub async fn list_competitor_races(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let races = services::list_competitor_races(db.pool(), id).await?;

    let response: Vec<RaceResponse> = races.into_iter().map(RaceResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitors/{id}/profile",
    params(
        ("id" = i64, Path, description = "Competitor id"),
        StandingsQuery
    ),
    responses(
        (status = 200, description = "Competitor with the aggregated standing for the scope", body = CompetitorProfileResponse),
        (status = 404, description = "Competitor not found")
    ),
    tag = "competitors"
)]
pub async fn get_competitor_profile(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Query(query): Query<StandingsQuery>,
) -> Result<Response, WebError> {
    let profile = services::get_profile(db.pool(), id, query.into()).await?;

    Ok(Json(profile).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitors",
    request_body = CreateCompetitorRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Competitor created successfully", body = CompetitorResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "competitors"
)]
pub async fn create_competitor(
    State(db): State<Database>,
    Json(req): Json<CreateCompetitorRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let competitor = services::create_competitor(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(CompetitorResponse::from(competitor))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/competitors/{id}",
    params(
        ("id" = i64, Path, description = "Competitor id")
    ),
    request_body = UpdateCompetitorRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Competitor updated successfully", body = CompetitorResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competitor not found")
    ),
    tag = "competitors"
)]
pub async fn update_competitor(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(update_req): Json<UpdateCompetitorRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_competitor(db.pool(), id, &update_req.name).await?;

    Ok(Json(CompetitorResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/competitors/{id}",
    params(
        ("id" = i64, Path, description = "Competitor id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Competitor deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competitor not found"),
        (status = 409, description = "Competitor still has recorded races")
    ),
    tag = "competitors"
)]
pub async fn delete_competitor(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    services::delete_competitor(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
