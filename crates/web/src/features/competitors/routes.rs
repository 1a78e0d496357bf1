use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{
    create_competitor, delete_competitor, get_competitor, get_competitor_profile,
    list_competitor_races, list_competitors, update_competitor,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_competitor))
        .route("/:id", put(update_competitor))
        .route("/:id", delete(delete_competitor))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_competitors))
        .route("/:id", get(get_competitor))
        .route("/:id/races", get(list_competitor_races))
        .route("/:id/profile", get(get_competitor_profile))
        .merge(protected)
}
