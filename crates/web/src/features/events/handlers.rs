use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::event::{
        CreateEventRequest, EventDetailResponse, EventListQuery, EventResponse,
        PairingPreviewRequest, RelayResultRequest, UpdateEventRequest,
    },
    dto::race::{AddDuelRequest, RaceResponse},
    services::pairing::Pairing,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events",
    params(EventListQuery),
    responses(
        (status = 200, description = "List events at the location", body = Vec<EventResponse>)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(db): State<Database>,
    Query(query): Query<EventListQuery>,
) -> Result<Response, WebError> {
    let events = services::list_events(db.pool(), &query.location, query.discipline).await?;

    let response: Vec<EventResponse> = events.into_iter().map(EventResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event with races and leaderboard", body = EventDetailResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let detail = services::get_event_detail(db.pool(), id).await?;

    Ok(Json(detail).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/pairing-preview",
    request_body = PairingPreviewRequest,
    responses(
        (status = 200, description = "Freshly shuffled start structure", body = Pairing),
        (status = 400, description = "Validation error or duplicate selection")
    ),
    tag = "events"
)]
pub async fn preview_pairing(
    Json(req): Json<PairingPreviewRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let pairing = services::preview_pairing(&req.competitor_ids, req.discipline)?;

    Ok(Json(pairing).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Event created with its race set", body = EventResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(db): State<Database>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let event = services::create_event(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    request_body = UpdateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event updated successfully", body = EventResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn update_event(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(update_req): Json<UpdateEventRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_event(db.pool(), id, &update_req).await?;

    Ok(Json(EventResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Event and its races deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    services::delete_event(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/races",
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    request_body = AddDuelRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Duel races created", body = Vec<RaceResponse>),
        (status = 400, description = "Invalid duel"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn add_duel(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(req): Json<AddDuelRequest>,
) -> Result<Response, WebError> {
    let races = services::add_duel(db.pool(), id, req.competitor_id, req.opponent_id).await?;

    let response: Vec<RaceResponse> = races.into_iter().map(RaceResponse::from).collect();

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/relay-result",
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    request_body = RelayResultRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Relay result recorded for both teams"),
        (status = 400, description = "Not a relay event"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn assert_relay_result(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(req): Json<RelayResultRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    services::assert_relay_result(db.pool(), id, req.winning_team).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
