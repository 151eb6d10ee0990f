//! Similarity lookup through a Supabase RPC.
//!
//! The database exposes a SQL function (by default `match_procedimentos`)
//! taking `{query_embedding, match_count}` and returning reference rows
//! ordered by descending cosine similarity. PostgREST serves it at
//! `POST {url}/rest/v1/rpc/{function}`.

use std::time::Duration;

use procedura_core::error::SearchError;
use procedura_core::gateway::{BoxFuture, SimilarityStore};
use procedura_core::models::similarity::SimilarityRecord;
use serde::Serialize;
use tracing::{info, warn};

pub const DEFAULT_MATCH_FUNCTION: &str = "match_procedimentos";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct MatchRequest<'a> {
    query_embedding: &'a [f32],
    match_count: usize,
}

#[derive(Clone)]
pub struct SupabaseStore {
    client: reqwest::Client,
    endpoint: String,
    service_key: String,
}

impl SupabaseStore {
    pub fn new(
        base_url: &str,
        service_key: impl Into<String>,
        function: &str,
    ) -> Result<Self, SearchError> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(SearchError::Configuration("empty Supabase URL".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SearchError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: rpc_endpoint(base_url, function),
            service_key: service_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn match_records(
        &self,
        query_embedding: &[f32],
        match_count: usize,
    ) -> Result<Vec<SimilarityRecord>, SearchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&MatchRequest {
                query_embedding,
                match_count,
            })
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), endpoint = %self.endpoint, "similarity RPC failed");
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // PostgREST answers `null` for a function returning no rows.
        let records: Option<Vec<SimilarityRecord>> = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;
        let records = records.unwrap_or_default();

        info!(match_count, found = records.len(), "similarity lookup complete");
        Ok(records)
    }
}

impl SimilarityStore for SupabaseStore {
    fn search(
        &self,
        query_embedding: Vec<f32>,
        match_count: usize,
    ) -> BoxFuture<'_, Result<Vec<SimilarityRecord>, SearchError>> {
        Box::pin(async move { self.match_records(&query_embedding, match_count).await })
    }
}

/// `{base}/rest/v1/rpc/{function}`.
pub fn rpc_endpoint(base_url: &str, function: &str) -> String {
    format!("{}/rest/v1/rpc/{}", base_url.trim_end_matches('/'), function)
}
