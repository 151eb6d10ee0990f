//! One runner per inference step.
//!
//! Each step renders its input into a user message, calls the gateway with
//! the step's system prompt and output shape, and deserializes the answer
//! into the step's record type. A value that does not match the record type
//! is a [`InferenceError::SchemaViolation`].
//!
//! Two steps never fail: trauma and same-disease verification fall back to
//! deterministic rules. Similarity lookups never fail either; any embedding
//! or store error yields an empty match list.

use std::collections::BTreeSet;
use std::sync::Arc;

use procedura_core::error::InferenceError;
use procedura_core::fallback;
use procedura_core::format;
use procedura_core::gateway::{
    Embedder, InferenceGateway, InferenceRequest, OutputShape, SimilarityStore,
};
use procedura_core::models::decode::{DecodedProcedure, Decoding};
use procedura_core::models::procedure::{
    PathologyExtraction, PathologyFinding, Procedure, ProcedureExtraction,
};
use procedura_core::models::similarity::SimilarityRecord;
use procedura_core::models::verification::{
    SameDiseaseVerification, SpecimenIdentification, TraumaVerification,
};
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use crate::prompts::PromptSet;

pub type StepResult<T> = Result<T, InferenceError>;

/// Matches fetched as adjudication context for reconciliation.
pub const RECONCILIATION_MATCH_COUNT: usize = 10;
/// Matches fetched by decode when the caller supplies none.
pub const DECODE_MATCH_COUNT: usize = 15;
/// Matches fetched for the surgical procedures when no pathology report exists.
pub const SURGICAL_MATCH_COUNT: usize = 10;

/// Shared handles to the collaborators. Cloning is cheap; each request gets
/// its own clone.
#[derive(Clone)]
pub struct StepRunner {
    gateway: Arc<dyn InferenceGateway>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn SimilarityStore>,
    prompts: Arc<PromptSet>,
}

impl StepRunner {
    pub fn new(
        gateway: Arc<dyn InferenceGateway>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn SimilarityStore>,
        prompts: Arc<PromptSet>,
    ) -> Self {
        Self {
            gateway,
            embedder,
            store,
            prompts,
        }
    }

    async fn infer<T: DeserializeOwned>(
        &self,
        shape: OutputShape,
        user_message: String,
    ) -> StepResult<T> {
        let request = InferenceRequest::new(shape, self.prompts.get(shape), user_message);
        let value = self.gateway.infer(request).await?;
        serde_json::from_value(value).map_err(|e| InferenceError::SchemaViolation {
            shape: shape.name(),
            message: e.to_string(),
        })
    }

    pub async fn extract_procedures(&self, text: &str) -> StepResult<ProcedureExtraction> {
        info!(text_len = text.len(), "extracting procedures");
        let extraction: ProcedureExtraction = self
            .infer(OutputShape::ProcedureExtraction, format!("Texto:\n{text}"))
            .await?;
        info!(procedure_count = extraction.len(), "procedures extracted");
        Ok(extraction)
    }

    pub async fn extract_pathology(&self, report: &str) -> StepResult<PathologyExtraction> {
        info!(text_len = report.len(), "extracting procedures from pathology report");
        let extraction: PathologyExtraction = self
            .infer(
                OutputShape::PathologyExtraction,
                format!("Laudo Anatomopatológico:\n{report}"),
            )
            .await?;
        info!(finding_count = extraction.len(), "pathology findings extracted");
        Ok(extraction)
    }

    /// Reference records nearest to the procedures' names, joined with
    /// spaces. No names means no lookup.
    pub async fn search_similar(
        &self,
        procedures: &[Procedure],
        match_count: usize,
    ) -> Vec<SimilarityRecord> {
        let names: Vec<&str> = procedures
            .iter()
            .map(|p| p.name.trim())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            warn!("no procedure names to search for");
            return Vec::new();
        }
        self.lookup(names.join(" "), match_count).await
    }

    async fn lookup(&self, query: String, match_count: usize) -> Vec<SimilarityRecord> {
        let query_len = query.len();
        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                error!(
                    error = %e,
                    query_len,
                    "embedding failed, continuing without similar records"
                );
                return Vec::new();
            }
        };

        match self.store.search(embedding, match_count).await {
            Ok(records) => {
                if records.is_empty() {
                    warn!(match_count, "no similar records found");
                } else {
                    info!(match_count, found = records.len(), "similar records found");
                }
                records
            }
            Err(e) => {
                error!(
                    error = %e,
                    match_count,
                    "similarity search failed, continuing without similar records"
                );
                Vec::new()
            }
        }
    }

    /// Correct the surgical list `surgical` against the pathology findings.
    ///
    /// When `similar` is `None`, context is fetched with a query built from
    /// [`reconciliation_query`].
    pub async fn reconcile(
        &self,
        surgical: &[Procedure],
        findings: &[PathologyFinding],
        similar: Option<Vec<SimilarityRecord>>,
    ) -> StepResult<ProcedureExtraction> {
        let similar = match similar {
            Some(records) => records,
            None => {
                let query = reconciliation_query(surgical, findings);
                if query.is_empty() {
                    warn!("no terms to search for reconciliation context");
                    Vec::new()
                } else {
                    self.lookup(query, RECONCILIATION_MATCH_COUNT).await
                }
            }
        };

        let message = format!(
            "Procedimentos da Descrição Cirúrgica:\n{}\n\n\
             Procedimentos do Laudo Anatomopatológico:\n{}\n\n\
             Documentos Similares:\n{}",
            format::surgical_procedures(surgical),
            format::pathology_findings(findings),
            format::similarity_records(&similar)
        );

        let reconciled: ProcedureExtraction =
            self.infer(OutputShape::Reconciliation, message).await?;
        info!(
            surgical_count = surgical.len(),
            finding_count = findings.len(),
            reconciled_count = reconciled.len(),
            "procedures reconciled"
        );
        Ok(reconciled)
    }

    /// Assign a reference code to each procedure. When `similar` is `None`
    /// the step runs its own lookup.
    pub async fn decode(
        &self,
        procedures: &[Procedure],
        similar: Option<Vec<SimilarityRecord>>,
    ) -> StepResult<Vec<DecodedProcedure>> {
        let similar = match similar {
            Some(records) => records,
            None => self.search_similar(procedures, DECODE_MATCH_COUNT).await,
        };

        let message = format!(
            "Procedimentos Verificados:\n{}\n\nDocumentos Similares:\n{}",
            format::procedures_with_diagnoses(procedures),
            format::similarity_records(&similar)
        );

        let decoding: Decoding = self.infer(OutputShape::Decoding, message).await?;
        info!(decoded_count = decoding.procedures.len(), "procedures decoded");
        Ok(decoding.procedures)
    }

    pub async fn identify_specimen(&self, text: &str) -> StepResult<SpecimenIdentification> {
        info!(text_len = text.len(), "identifying specimen removal");
        let identification: SpecimenIdentification = self
            .infer(OutputShape::SpecimenIdentification, format!("Texto:\n{text}"))
            .await?;
        info!(specimen_removed = identification.value, "specimen removal identified");
        Ok(identification)
    }

    /// Trauma entry check. Falls back to keyword matching on inference
    /// failure.
    pub async fn verify_trauma(&self, text: &str) -> TraumaVerification {
        let result: StepResult<TraumaVerification> = self
            .infer(
                OutputShape::TraumaVerification,
                format!("Texto da descrição cirúrgica:\n{text}"),
            )
            .await;

        match result {
            Ok(verification) => {
                info!(trauma_entry = verification.value, "trauma entry verified");
                verification
            }
            Err(e) => {
                error!(
                    error = %e,
                    text_len = text.len(),
                    "trauma verification failed, using keywords"
                );
                fallback::trauma_by_keywords(text)
            }
        }
    }

    /// Same-disease check. At most one procedure short-circuits to `true`
    /// without an inference call; inference failure falls back to comparing
    /// diagnoses.
    pub async fn verify_same_disease(&self, procedures: &[Procedure]) -> SameDiseaseVerification {
        if procedures.len() <= 1 {
            info!("single procedure, counting as same disease");
            return fallback::single_procedure_same_disease();
        }

        let result: StepResult<SameDiseaseVerification> = self
            .infer(
                OutputShape::SameDiseaseVerification,
                format!("Procedimentos:\n{}", format::procedures_with_diagnoses(procedures)),
            )
            .await;

        match result {
            Ok(verification) => {
                info!(same_disease = verification.value, "same disease verified");
                verification
            }
            Err(e) => {
                error!(
                    error = %e,
                    procedure_count = procedures.len(),
                    "same disease verification failed, using diagnoses"
                );
                fallback::same_disease_by_diagnoses(procedures)
            }
        }
    }
}

/// Search terms for reconciliation context: every distinct non-blank
/// procedure name, specimen and diagnosis from both lists, space-joined.
pub fn reconciliation_query(surgical: &[Procedure], findings: &[PathologyFinding]) -> String {
    let mut terms: BTreeSet<&str> = BTreeSet::new();

    for procedure in surgical {
        terms.insert(procedure.name.trim());
        if let Some(diagnosis) = procedure.diagnosis() {
            terms.insert(diagnosis);
        }
    }
    for finding in findings {
        terms.insert(finding.procedure.name.trim());
        if let Some(specimen) = finding.specimen.as_deref() {
            terms.insert(specimen.trim());
        }
        if let Some(diagnosis) = finding.procedure.diagnosis() {
            terms.insert(diagnosis);
        }
    }
    terms.remove("");

    info!(terms = ?terms, "reconciliation search terms");
    terms.into_iter().collect::<Vec<_>>().join(" ")
}
