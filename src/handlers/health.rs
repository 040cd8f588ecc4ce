use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::AppState;
use keiba::data::list_snapshots;
use keiba::models::HealthResponse;

/// Health check endpoint
pub async fn health_check(state: web::Data<Arc<AppState>>) -> impl Responder {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        snapshots: list_snapshots(&state.odds_dir).len(),
    };

    HttpResponse::Ok().json(response)
}
