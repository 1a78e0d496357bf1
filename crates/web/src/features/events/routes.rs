use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{
    add_duel, assert_relay_result, create_event, delete_event, get_event, list_events,
    preview_pairing, update_event,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_event))
        .route("/:id", put(update_event))
        .route("/:id", delete(delete_event))
        .route("/:id/races", post(add_duel))
        .route("/:id/relay-result", post(assert_relay_result))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_events))
        .route("/:id", get(get_event))
        .route("/pairing-preview", post(preview_pairing))
        .merge(protected)
}
