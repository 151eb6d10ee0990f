use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use procedura_core::accumulator::ResultAccumulator;
use procedura_core::models::classification::{ClassificationCategory, ClassificationDetails};
use procedura_core::models::decode::Decoding;
use procedura_flows::config::COMPLETE;
use procedura_flows::{FlowInput, TopLevelRouter};

use crate::error::{ApiError, require_text};
use crate::routes::extraction::TextRequest;
use crate::state::AppState;

/// Extract, look up, decode. A failed run still answers 200 with the
/// placeholder decoding.
pub async fn complete_flow(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<Decoding>, ApiError> {
    let text = require_text(&req.text)?;
    let input = FlowInput::new(state.runner.clone(), text);

    let results = state
        .flows
        .execute(COMPLETE, input)
        .await
        .ok_or_else(|| ApiError::Internal(format!("flow {COMPLETE} did not produce a result")))?;

    Ok(Json(Decoding {
        procedures: results.decoding.unwrap_or_default(),
    }))
}

#[derive(Deserialize)]
pub struct PathologyRequest {
    pub text: String,
    #[serde(default)]
    pub laudo: Option<String>,
}

/// Full routing with an optional pathology report. The response is the
/// whole result accumulator, audit trail included.
pub async fn process_with_pathology(
    State(state): State<AppState>,
    Json(req): Json<PathologyRequest>,
) -> Result<Json<ResultAccumulator>, ApiError> {
    let text = require_text(&req.text)?;
    let router = TopLevelRouter::new(state.flows, state.runner.clone());
    let results = router.route(text, req.laudo.as_deref()).await;
    Ok(Json(results))
}

#[derive(Serialize)]
pub struct ClassificationResponse {
    pub classificacao_final: ClassificationCategory,
    pub justificativa: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalhes: Option<ClassificationDetails>,
}

impl From<ResultAccumulator> for ClassificationResponse {
    fn from(results: ResultAccumulator) -> Self {
        Self {
            classificacao_final: results
                .classification
                .unwrap_or(ClassificationCategory::Unclassified),
            justificativa: results.classification_justification.unwrap_or_else(|| {
                "Não foi possível determinar uma justificativa.".to_string()
            }),
            detalhes: results.classification_details,
        }
    }
}

pub async fn final_classification(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<ClassificationResponse>, ApiError> {
    let text = require_text(&req.text)?;
    let router = TopLevelRouter::new(state.flows, state.runner.clone());
    let results = router.route(text, None).await;
    Ok(Json(results.into()))
}
