use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use storage::Database;

use super::handlers::{get_race, record_shooting, record_split, remove_duel, reset_race};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/:id", delete(remove_duel))
        .route("/:id/splits", post(record_split))
        .route("/:id/shooting", post(record_shooting))
        .route("/:id/reset", post(reset_race))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new().route("/:id", get(get_race)).merge(protected)
}
