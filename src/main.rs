use actix_web::{middleware, web, App, HttpServer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod handlers;

use handlers::{health, odds};
use keiba::data::list_snapshots;

/// Application state shared across handlers
pub struct AppState {
    pub odds_dir: PathBuf,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("{}:{}", host, port);

    let odds_dir = std::env::var("ODDS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/odds"));

    let count = list_snapshots(&odds_dir).len();
    if count == 0 {
        warn!("No odds snapshots found in {:?}", odds_dir);
    } else {
        info!("Serving {} odds snapshots from {:?}", count, odds_dir);
    }

    let app_state = Arc::new(AppState { odds_dir });

    info!("Starting odds API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Methods", "GET, OPTIONS")),
            )
            .route("/health", web::get().to(health::health_check))
            .route("/api/odds", web::get().to(odds::get_odds))
            .route("/api/grid", web::get().to(odds::get_grid))
    })
    .bind(&addr)?
    .run()
    .await
}
