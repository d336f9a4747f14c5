//! PLANOVA AI - LLM-powered travel planner
//!
//! Collects trip preferences, asks an LLM for a day-by-day itinerary,
//! enriches it with live weather and destination photos, and exports
//! plans to PDF.

mod api;
mod config;
mod export;
mod images;
mod llm;
mod lookup;
mod planner;
mod prompt;
mod session;
mod trip;
mod weather;

#[cfg(test)]
mod testing;

use api::{create_router, AppState};
use config::AppConfig;
use export::Exporter;
use images::ImageClient;
use planner::TripPlanner;
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather::WeatherClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planova=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env();

    // Plan generation
    let llm = match config.groq_api_key.clone() {
        Some(key) => {
            let service = llm::build_service(key, &config.model, &config.llm_base_url)?;
            tracing::info!(
                model = %config.model,
                base_url = %config.llm_base_url,
                "LLM service initialized"
            );
            Some(service)
        }
        None => {
            tracing::warn!(
                "No LLM API key configured. Set GROQ_API_KEY to enable plan generation."
            );
            None
        }
    };

    // Lookups
    let http = lookup::http_client(config.lookup_timeout)?;
    if config.openweather_api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY not set; weather will be unavailable");
    }
    if config.unsplash_api_key.is_none() {
        tracing::warn!("UNSPLASH_ACCESS_KEY not set; destination photos will be unavailable");
    }
    let weather = WeatherClient::new(
        http.clone(),
        config.openweather_api_key.clone(),
        &config.weather_base_url,
    );
    let images = ImageClient::new(
        http,
        config.unsplash_api_key.clone(),
        &config.unsplash_base_url,
    );

    tracing::info!(path = %config.export_dir.display(), "Using export directory");
    let exporter = Exporter::new(config.export_dir.clone());

    // Create application state
    let state = AppState::new(TripPlanner::new(llm, weather, images, exporter));

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("PLANOVA AI server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
