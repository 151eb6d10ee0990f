use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use procedura_core::models::procedure::ProcedureExtraction;
use procedura_core::models::verification::SpecimenIdentification;

use crate::error::{ApiError, require_text};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TextRequest {
    pub text: String,
}

pub async fn extract_procedures(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<ProcedureExtraction>, ApiError> {
    let text = require_text(&req.text)?;
    let extraction = state.runner.extract_procedures(text).await?;
    Ok(Json(extraction))
}

/// Answers `{retirada_peca_anatomica, justificativa}` for a surgical
/// description.
pub async fn identify_specimen(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<SpecimenIdentification>, ApiError> {
    let text = require_text(&req.text)?;
    let identification = state.runner.identify_specimen(text).await?;
    Ok(Json(identification))
}
