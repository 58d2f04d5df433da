// File: services/calman_backend/src/main.rs
use axum::{routing::get, Router};
use calman_common::logging;
use calman_config::load_config;
use calman_gcal::auth::resolve_calendar_client;
use calman_gcal::handlers::GcalState;
use calman_gcal::routes as gcal_routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

const WELCOME: &str = "Welcome to the calman API!";

/// Assembles the `/api` router around the calendar state.
fn app(gcal_state: Arc<GcalState>) -> Router {
    let api_router = Router::new()
        .route("/", get(|| async { WELCOME }))
        .merge(gcal_routes::routes(gcal_state));

    #[allow(unused_mut)] // mutated when openapi is enabled
    let mut app = Router::new().nest("/api", api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use calman_gcal::doc::GcalApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "calman API",
                version = "0.1.0",
                description = "Calendar availability service API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(GcalApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    app.layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logging::init();

    let config = Arc::new(load_config()?);
    let calendar = resolve_calendar_client(&config).await;
    let gcal_state = Arc::new(GcalState::new(config.clone(), calendar));

    let mut app = app(gcal_state);

    // Serve static files in dev mode
    if cfg!(debug_assertions) {
        info!("Running in development mode, serving static files from ../../dist");
        app = app.nest_service("/static", ServeDir::new("../../dist"));
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
