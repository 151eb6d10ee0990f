use std::sync::Arc;

use eyre::WrapErr;

use procedura_bedrock::{BedrockGateway, TitanEmbedder};
use procedura_core::gateway::SimilarityStore;
use procedura_flows::{ProcedureFlows, PromptSet, StepRunner};
use procedura_search::{EmptyStore, MemoryStore, SupabaseStore};

use crate::settings::Settings;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub runner: StepRunner,
    pub flows: &'static ProcedureFlows,
}

impl AppState {
    pub fn new(runner: StepRunner, flows: &'static ProcedureFlows) -> Self {
        Self { runner, flows }
    }

    /// Wire the Bedrock collaborators, the similarity store and the prompt
    /// set described by `settings` to the process-wide registry.
    pub async fn from_settings(settings: &Settings) -> eyre::Result<Self> {
        let sdk_config = procedura_bedrock::client::load_config(&settings.region).await;
        let client = procedura_bedrock::client::runtime_client(&sdk_config);
        let gateway =
            BedrockGateway::from_client(client.clone(), &settings.model_id, settings.temperature);
        let embedder = TitanEmbedder::from_client(client, &settings.embedding_model_id);

        let prompts = match &settings.prompts_dir {
            Some(dir) => PromptSet::load(dir)
                .wrap_err_with(|| format!("failed to load prompts from {}", dir.display()))?,
            None => PromptSet::builtin(),
        };

        tracing::info!(
            region = %settings.region,
            model_id = gateway.model_id(),
            embedding_model_id = %settings.embedding_model_id,
            "collaborators configured"
        );

        let runner = StepRunner::new(
            Arc::new(gateway),
            Arc::new(embedder),
            build_store(settings)?,
            Arc::new(prompts),
        );
        Ok(Self::new(runner, procedura_flows::registry()))
    }
}

/// Supabase when configured, then a local reference table, then a store
/// with no matches.
fn build_store(settings: &Settings) -> eyre::Result<Arc<dyn SimilarityStore>> {
    if let Some(supabase) = &settings.supabase {
        let store =
            SupabaseStore::new(&supabase.url, supabase.key.clone(), &supabase.match_function)?;
        tracing::info!(endpoint = store.endpoint(), "using Supabase similarity store");
        return Ok(Arc::new(store));
    }

    if let Some(path) = &settings.reference_table {
        let store = MemoryStore::load(path)
            .wrap_err_with(|| format!("failed to load reference table {}", path.display()))?;
        return Ok(Arc::new(store));
    }

    tracing::warn!("no similarity store configured, lookups will return no matches");
    Ok(Arc::new(EmptyStore))
}
