//! Coffee Order Backend Server
//!
//! REST API server for the coffee-ordering kiosk.

use coffee_order_backend::api::create_router;
use coffee_order_backend::bot;
use coffee_order_backend::config::Config;
use coffee_order_backend::state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use coffee_order_backend::error::ErrorResponse;
use coffee_order_backend::models::{
    ActionResponse, CoffeeKind, HealthResponse, Order, OrderAction, OrderOptions,
    PlaceOrderRequest, PlaceOrderResponse, StatusResponse,
};
use coffee_order_backend::notifier::{DeliveryReport, NotifierState};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        coffee_order_backend::api::handlers::health_check,
        coffee_order_backend::api::handlers::get_status,
        coffee_order_backend::api::handlers::place_order,
        coffee_order_backend::api::handlers::delete_order,
        coffee_order_backend::api::handlers::clear_orders,
    ),
    components(
        schemas(
            HealthResponse,
            StatusResponse,
            PlaceOrderRequest,
            OrderOptions,
            PlaceOrderResponse,
            ActionResponse,
            Order,
            OrderAction,
            CoffeeKind,
            DeliveryReport,
            NotifierState,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Orders", description = "Order management"),
    ),
    info(
        title = "Coffee Order API",
        version = "0.1.0",
        description = "REST API for a coffee-ordering kiosk",
        license(name = "MIT"),
        contact(name = "Joaquin Bejar", email = "jb@taunais.com")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load .env if present, then configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    let host = config.server.host.clone();
    let port = config.server.port;

    // Create application state and start bot tasks
    let state = Arc::new(AppState::from_config(config)?);
    info!("Loaded {} open orders", state.store.len());
    bot::spawn_background_tasks(&state);

    info!("Starting Coffee Order Backend on {}:{}", host, port);
    info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start the server
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
