use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{Extension, http::HeaderMap, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

use attendance::shared::core::primitives::SystemClock;
use attendance::shell::config::Config;
use attendance::shell::graphql::{AppSchema, schema};
use attendance::shell::http::{actor_from_headers, router};
use attendance::shell::seed::load_seed_file;
use attendance::shell::state::{AppState, InMemoryBackends};
use attendance::shell::workers::spawn_nightly_reconciliation;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;

    // In-memory deps for now
    let backends = InMemoryBackends::new();
    if let Some(path) = &config.seed_file {
        load_seed_file(path, &backends).await?;
    }
    let clock = Arc::new(SystemClock::new(config.tz_offset));
    let state = AppState::in_memory(&backends, clock, config.fallback, &config.outbox_topic);

    spawn_nightly_reconciliation(&state, config.reconciliation_time);

    let app = router(state.clone())
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema(state)))
        .layer(TraceLayer::new_for_http());

    tracing::info!(
        addr = %config.server_addr,
        reconciliation_time = %config.reconciliation_time,
        "attendance service listening; GraphQL at /gql"
    );
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn graphql(
    Extension(schema): Extension<AppSchema>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Ok(actor) = actor_from_headers(&headers) {
        request = request.data(actor);
    }
    schema.execute(request).await.into()
}

async fn graphiql() -> axum::response::Html<String> {
    use async_graphql::http::GraphiQLSource;
    axum::response::Html(GraphiQLSource::build().endpoint("/gql").finish())
}
