//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use eyre::WrapErr;

use procedura_bedrock::embed::DEFAULT_EMBEDDING_MODEL;
use procedura_search::supabase::DEFAULT_MATCH_FUNCTION;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Credentials for the Supabase `match_procedimentos` RPC.
#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseSettings {
    pub url: String,
    pub key: String,
    pub match_function: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub region: String,
    pub model_id: String,
    pub embedding_model_id: String,
    pub temperature: f32,
    pub supabase: Option<SupabaseSettings>,
    pub reference_table: Option<PathBuf>,
    pub prompts_dir: Option<PathBuf>,
    pub bind: SocketAddr,
}

impl Settings {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let temperature = match var("PROCEDURA_TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .wrap_err_with(|| format!("invalid PROCEDURA_TEMPERATURE: {raw}"))?,
            None => 0.0,
        };

        let bind_raw = var("PROCEDURA_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .wrap_err_with(|| format!("invalid PROCEDURA_BIND: {bind_raw}"))?;

        let supabase = match (var("SUPABASE_URL"), var("SERVICE_KEY_SUPABASE")) {
            (Some(url), Some(key)) => Some(SupabaseSettings {
                url,
                key,
                match_function: var("PROCEDURA_MATCH_FUNCTION")
                    .unwrap_or_else(|| DEFAULT_MATCH_FUNCTION.to_string()),
            }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!("SUPABASE_URL and SERVICE_KEY_SUPABASE must both be set, ignoring");
                None
            }
            (None, None) => None,
        };

        Ok(Self {
            region: var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            model_id: var("PROCEDURA_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            embedding_model_id: var("PROCEDURA_EMBEDDING_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            temperature,
            supabase,
            reference_table: var("PROCEDURA_REFERENCE_TABLE").map(PathBuf::from),
            prompts_dir: var("PROCEDURA_PROMPTS_DIR").map(PathBuf::from),
            bind,
        })
    }
}
