//! In-memory reference table with brute-force cosine similarity.
//!
//! Loaded from a JSON array of reference rows, each carrying its embedding:
//!
//! ```json
//! [{"codigo_procedimento": "0407030026", "nome_procedimento": "COLECISTECTOMIA",
//!   "descricao_procedimento": "...", "embedding": [0.01, ...]}]
//! ```

use std::cmp::Ordering;
use std::path::Path;

use procedura_core::error::SearchError;
use procedura_core::gateway::{BoxFuture, SimilarityStore};
use procedura_core::models::similarity::SimilarityRecord;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ReferenceTableError;

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceEntry {
    #[serde(flatten)]
    pub record: SimilarityRecord,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<ReferenceEntry>,
    dimensions: usize,
}

impl MemoryStore {
    /// Build a store from entries. All embeddings must share one dimension.
    pub fn from_entries(entries: Vec<ReferenceEntry>) -> Result<Self, ReferenceTableError> {
        let dimensions = entries.first().map_or(0, |e| e.embedding.len());
        if let Some(bad) = entries.iter().find(|e| e.embedding.len() != dimensions) {
            return Err(ReferenceTableError::DimensionMismatch {
                code: bad.record.code.clone(),
                found: bad.embedding.len(),
                expected: dimensions,
            });
        }
        Ok(Self {
            entries,
            dimensions,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ReferenceTableError> {
        let bytes = std::fs::read(path)?;
        let entries: Vec<ReferenceEntry> = serde_json::from_slice(&bytes)?;
        let store = Self::from_entries(entries)?;
        info!(
            path = %path.display(),
            entries = store.len(),
            dimensions = store.dimensions,
            "reference table loaded"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `match_count` records by cosine similarity, most similar first.
    pub fn nearest(
        &self,
        query: &[f32],
        match_count: usize,
    ) -> Result<Vec<SimilarityRecord>, SearchError> {
        if self.entries.is_empty() || match_count == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            warn!(
                query_dimensions = query.len(),
                table_dimensions = self.dimensions,
                "query embedding dimension mismatch"
            );
            return Err(SearchError::Embedding(format!(
                "query has {} dimensions, reference table has {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(f32, &ReferenceEntry)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(query, &e.embedding), e))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(match_count)
            .map(|(score, e)| SimilarityRecord {
                similarity: Some(score),
                ..e.record.clone()
            })
            .collect())
    }
}

impl SimilarityStore for MemoryStore {
    fn search(
        &self,
        query_embedding: Vec<f32>,
        match_count: usize,
    ) -> BoxFuture<'_, Result<Vec<SimilarityRecord>, SearchError>> {
        Box::pin(async move { self.nearest(&query_embedding, match_count) })
    }
}

/// Cosine similarity of two equal-length vectors. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
