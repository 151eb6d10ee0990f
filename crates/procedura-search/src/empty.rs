use procedura_core::error::SearchError;
use procedura_core::gateway::{BoxFuture, SimilarityStore};
use procedura_core::models::similarity::SimilarityRecord;

/// A store with no reference data. Every lookup succeeds with no matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyStore;

impl SimilarityStore for EmptyStore {
    fn search(
        &self,
        _query_embedding: Vec<f32>,
        _match_count: usize,
    ) -> BoxFuture<'_, Result<Vec<SimilarityRecord>, SearchError>> {
        Box::pin(async { Ok(Vec::new()) })
    }
}
