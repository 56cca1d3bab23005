use axum::{Extension, routing::get};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

use kanban_cards::modules::cards::adapters::outbound::projections_in_memory::InMemoryCardProjection;
use kanban_cards::modules::cards::use_cases::manage_cards::handler::CardCommandHandler;
use kanban_cards::shared::core::primitives::{SystemClock, UuidIdGenerator};
use kanban_cards::shared::infrastructure::document_store::DocumentStore;
use kanban_cards::shared::infrastructure::document_store::in_memory::InMemoryDocumentStore;
use kanban_cards::shared::infrastructure::document_store::json_file::JsonFileDocumentStore;
use kanban_cards::shared::infrastructure::list_directory::ListDirectory;
use kanban_cards::shared::infrastructure::list_directory::in_memory::InMemoryListDirectory;
use kanban_cards::shell::config::Config;
use kanban_cards::shell::graphql::{build_schema, graphiql, graphql};
use kanban_cards::shell::http::router;
use kanban_cards::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;

    let store: Arc<dyn DocumentStore> = match &config.data_file {
        Some(path) => Arc::new(JsonFileDocumentStore::open(path.clone()).await?),
        None => {
            tracing::info!("no data file configured, cards live in memory only");
            Arc::new(InMemoryDocumentStore::new())
        }
    };
    // The board container is not part of this service yet
    let lists: Arc<dyn ListDirectory> = Arc::new(InMemoryListDirectory::new());

    let handler = Arc::new(CardCommandHandler::new(
        Arc::new(InMemoryCardProjection::new()),
        store,
        lists,
        Arc::new(UuidIdGenerator),
        Arc::new(SystemClock),
        config.retry,
    ));
    handler.fetch_all().await?;

    let state = AppState::new(handler);
    let schema = build_schema(state.clone());

    let app = router(state)
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("HTTP endpoint: http://{}/cards", config.bind_addr);
    tracing::info!("GraphQL endpoint: http://{}/gql", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
