use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use procedura_core::models::decode::DecodedProcedure;
use procedura_core::models::procedure::Procedure;
use procedura_core::models::similarity::SimilarityRecord;

use crate::error::ApiError;
use crate::state::AppState;

pub const DEFAULT_MATCH_COUNT: usize = 10;

fn default_match_count() -> usize {
    DEFAULT_MATCH_COUNT
}

#[derive(Deserialize)]
pub struct SimilarRequest {
    pub procedimentos_verificados: Vec<Procedure>,
    #[serde(default = "default_match_count")]
    pub match_count: usize,
}

#[derive(Serialize)]
pub struct SimilarResponse {
    pub documentos_similares: Vec<SimilarityRecord>,
}

/// Reference records nearest to the given procedures. Lookup failures
/// yield an empty list, never an error.
pub async fn search_similar(
    State(state): State<AppState>,
    Json(req): Json<SimilarRequest>,
) -> Result<Json<SimilarResponse>, ApiError> {
    let documentos_similares = state
        .runner
        .search_similar(&req.procedimentos_verificados, req.match_count)
        .await;
    Ok(Json(SimilarResponse {
        documentos_similares,
    }))
}

#[derive(Deserialize)]
pub struct DecodeRequest {
    pub procedimentos_verificados: Vec<Procedure>,
    #[serde(default)]
    pub documentos_similares: Option<Vec<SimilarityRecord>>,
}

#[derive(Serialize)]
pub struct DecodeResponse {
    pub procedimentos_decodificados: Vec<DecodedProcedure>,
}

pub async fn decode_procedures(
    State(state): State<AppState>,
    Json(req): Json<DecodeRequest>,
) -> Result<Json<DecodeResponse>, ApiError> {
    if req.procedimentos_verificados.is_empty() {
        return Err(ApiError::BadRequest(
            "Nenhum procedimento informado para decodificação.".to_string(),
        ));
    }

    let procedimentos_decodificados = state
        .runner
        .decode(&req.procedimentos_verificados, req.documentos_similares)
        .await?;
    Ok(Json(DecodeResponse {
        procedimentos_decodificados,
    }))
}
