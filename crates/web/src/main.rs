use anyhow::Context;
use storage::Database;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;

use config::Config;
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::competitors::handlers::list_competitors,
        features::competitors::handlers::get_competitor,
        features::competitors::handlers::list_competitor_races,
        features::competitors::handlers::get_competitor_profile,
        features::competitors::handlers::create_competitor,
        features::competitors::handlers::update_competitor,
        features::competitors::handlers::delete_competitor,
        features::events::handlers::list_events,
        features::events::handlers::get_event,
        features::events::handlers::preview_pairing,
        features::events::handlers::create_event,
        features::events::handlers::update_event,
        features::events::handlers::delete_event,
        features::events::handlers::add_duel,
        features::events::handlers::assert_relay_result,
        features::races::handlers::get_race,
        features::races::handlers::record_split,
        features::races::handlers::record_shooting,
        features::races::handlers::reset_race,
        features::races::handlers::remove_duel,
        features::standings::handlers::get_standings,
    ),
    components(
        schemas(
            storage::dto::competitor::CreateCompetitorRequest,
            storage::dto::competitor::UpdateCompetitorRequest,
            storage::dto::competitor::CompetitorResponse,
            storage::dto::competitor::CompetitorProfileResponse,
            storage::dto::event::CreateEventRequest,
            storage::dto::event::UpdateEventRequest,
            storage::dto::event::PairingPreviewRequest,
            storage::dto::event::RelayResultRequest,
            storage::dto::event::EventResponse,
            storage::dto::event::EventDetailResponse,
            storage::dto::event::LeaderboardEntry,
            storage::dto::race::RecordSplitRequest,
            storage::dto::race::RecordShootingRequest,
            storage::dto::race::AddDuelRequest,
            storage::dto::race::RaceResponse,
            storage::dto::standings::StandingsResponse,
            storage::services::pairing::DuelPair,
            storage::services::pairing::Pairing,
            storage::services::standings::CompetitorStanding,
            storage::services::shooting::ShootingTally,
            storage::services::timing::SplitPhase,
            storage::models::Competitor,
            storage::models::Event,
            storage::models::EventStatus,
            storage::models::Discipline,
            storage::models::Race,
            storage::models::SplitTimes,
        )
    ),
    tags(
        (name = "competitors", description = "Competitor registry and profiles"),
        (name = "events", description = "Events, pairings and relay results"),
        (name = "races", description = "Per-race stopwatch and shooting entry"),
        (name = "standings", description = "Season standings"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting OpenBiathlon API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!("Opening race store at: {}", config.database_url);
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_open() {
        tracing::info!("No API keys configured; mutating endpoints are open");
    }

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let openapi = ApiDoc::openapi();

    let app = axum::Router::new()
        .nest("/api/competitors", features::competitors::routes::routes(api_keys.clone()))
        .nest("/api/events", features::events::routes::routes(api_keys.clone()))
        .nest("/api/races", features::races::routes::routes(api_keys))
        .nest("/api/standings", features::standings::routes::routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .layer(CorsLayer::permissive())
        .with_state(db);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind server address")?;
    axum::serve(listener, app).await?;

    Ok(())
}
