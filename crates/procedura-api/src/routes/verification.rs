use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use procedura_core::models::procedure::Procedure;
use procedura_core::models::verification::{SameDiseaseVerification, TraumaVerification};

use crate::error::{ApiError, require_text};
use crate::routes::extraction::TextRequest;
use crate::state::AppState;

/// Trauma entry check. Inference failures are answered by the keyword
/// fallback, so this only fails on a blank text.
pub async fn verify_trauma(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<TraumaVerification>, ApiError> {
    let text = require_text(&req.text)?;
    Ok(Json(state.runner.verify_trauma(text).await))
}

#[derive(Deserialize)]
pub struct SameDiseaseRequest {
    pub procedimentos_verificados: Vec<Procedure>,
}

pub async fn verify_same_disease(
    State(state): State<AppState>,
    Json(req): Json<SameDiseaseRequest>,
) -> Json<SameDiseaseVerification> {
    Json(
        state
            .runner
            .verify_same_disease(&req.procedimentos_verificados)
            .await,
    )
}
