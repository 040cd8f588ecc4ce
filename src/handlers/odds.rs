use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::AppState;
use keiba::core::prepare_display;
use keiba::data::load_snapshot;
use keiba::error::{validate_race_param, AppError};
use keiba::models::{Envelope, GridResponse};

/// `?race_id=` accepts a netkeiba URL or bare digits
#[derive(Debug, Deserialize)]
pub struct RaceQuery {
    pub race_id: Option<String>,
}

/// Raw odds snapshot for a race
pub async fn get_odds(
    state: web::Data<Arc<AppState>>,
    query: web::Query<RaceQuery>,
) -> Result<HttpResponse, AppError> {
    let race_id = validate_race_param(query.race_id.as_deref())?;
    let snapshot = load_snapshot(&state.odds_dir, &race_id)?;

    info!("Serving {} odds for race {}", snapshot.len(), race_id);
    Ok(HttpResponse::Ok().json(Envelope::ok(snapshot)))
}

/// Ranked display grid for a race
pub async fn get_grid(
    state: web::Data<Arc<AppState>>,
    query: web::Query<RaceQuery>,
) -> Result<HttpResponse, AppError> {
    let race_id = validate_race_param(query.race_id.as_deref())?;
    let snapshot = load_snapshot(&state.odds_dir, &race_id)?;
    let report = prepare_display(&snapshot);

    info!(
        "Serving grid for race {} ({} columns)",
        race_id,
        report.max_cols()
    );

    let response = GridResponse {
        race_id: race_id.to_string(),
        max_cols: report.max_cols(),
        summary: report.summary,
        grid: report.grid,
    };
    Ok(HttpResponse::Ok().json(Envelope::ok(response)))
}
