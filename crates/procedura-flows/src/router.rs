//! Top-level routing and the fallback ladder.
//!
//! ```text
//! no report ─────────────────────────────► without specimen ─┐
//! report ─► identify specimen ─ error ───► without specimen ─┤
//!                             └ removed ─► with specimen ────┤
//!                             └ kept ────► without specimen ─┤
//!                                                            ▼
//!                      failed or tagged as failed ─► simplified ─► error
//! ```
//!
//! Whatever happens, [`TopLevelRouter::route`] returns an accumulator.

use procedura_core::accumulator::{FlowKind, ResultAccumulator};
use procedura_core::classify::{ClassificationSignals, decide};
use procedura_core::models::classification::ClassificationCategory;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{ProcedureFlows, WITHOUT_SPECIMEN};
use crate::error::FlowError;
use crate::input::FlowInput;
use crate::steps::StepRunner;

pub struct TopLevelRouter<'r> {
    registry: &'r ProcedureFlows,
    runner: StepRunner,
}

impl<'r> TopLevelRouter<'r> {
    pub fn new(registry: &'r ProcedureFlows, runner: StepRunner) -> Self {
        Self { registry, runner }
    }

    /// Classify a surgical description, optionally with its pathology
    /// report.
    pub async fn route(
        &self,
        surgical_text: &str,
        pathology_text: Option<&str>,
    ) -> ResultAccumulator {
        let request_id = Uuid::new_v4();
        let pathology_text = pathology_text.map(str::trim).filter(|p| !p.is_empty());
        info!(
            %request_id,
            text_len = surgical_text.len(),
            has_pathology = pathology_text.is_some(),
            "routing request"
        );

        let mut results = ResultAccumulator::new(request_id);
        let flow = match pathology_text {
            None => {
                results.trace("roteamento", "sem laudo anatomopatológico");
                WITHOUT_SPECIMEN
            }
            Some(_) => match self.runner.identify_specimen(surgical_text).await {
                Ok(identification) => {
                    results
                        .record_specimen(identification.value, identification.justification)
                        .trace("retirada_peca_anatomica", identification.value.to_string());
                    self.registry
                        .decide(&results, Some(WITHOUT_SPECIMEN))
                        .unwrap_or(WITHOUT_SPECIMEN)
                }
                Err(e) => {
                    error!(%request_id, error = %e, "specimen identification failed");
                    results.trace("retirada_peca_anatomica", format!("falha: {e}"));
                    WITHOUT_SPECIMEN
                }
            },
        };

        let input = FlowInput::new(self.runner.clone(), surgical_text)
            .with_pathology(pathology_text.map(str::to_string))
            .with_results(results.clone());

        match self.registry.execute(flow, input).await {
            Some(output) if !output.is_failure() => output,
            outcome => {
                // A failure-tagged result carries the trail up to the error.
                let mut prior = outcome.unwrap_or(results);
                let reason = prior
                    .error
                    .clone()
                    .unwrap_or_else(|| format!("flow '{flow}' failed"));
                warn!(%request_id, flow, reason = %reason, "escalating to simplified flow");
                prior.trace("escalonamento", format!("{flow}: {reason}"));
                simplified_flow(&self.runner, surgical_text, prior).await
            }
        }
    }
}

/// Last-resort classification: extract, verify, apply the rule table.
///
/// If this fails too the result is tagged `erro` and classified
/// `não_classificado`.
pub async fn simplified_flow(
    runner: &StepRunner,
    surgical_text: &str,
    prior: ResultAccumulator,
) -> ResultAccumulator {
    let mut results = ResultAccumulator {
        request_id: prior.request_id,
        trail: prior.trail,
        ..ResultAccumulator::default()
    };

    match simplified_steps(runner, surgical_text, &mut results).await {
        Ok(()) => results,
        Err(e) => {
            error!(
                request_id = ?results.request_id,
                text_len = surgical_text.len(),
                error = %e,
                "simplified flow failed"
            );
            let mut terminal = ResultAccumulator {
                request_id: results.request_id,
                trail: results.trail,
                classification: Some(ClassificationCategory::Unclassified),
                ..ResultAccumulator::default()
            };
            terminal
                .record_error(e.to_string())
                .record_flow_kind(FlowKind::Error)
                .trace("erro", e.to_string());
            terminal
        }
    }
}

async fn simplified_steps(
    runner: &StepRunner,
    surgical_text: &str,
    results: &mut ResultAccumulator,
) -> Result<(), FlowError> {
    let extraction = runner.extract_procedures(surgical_text).await?;

    let (trauma, same_disease) = futures::join!(
        runner.verify_trauma(surgical_text),
        runner.verify_same_disease(&extraction.procedures)
    );

    let signals = ClassificationSignals {
        trauma_entry: trauma.value,
        procedure_count: extraction.len(),
        same_disease: same_disease.value,
    };
    let decision = decide(signals);
    info!(
        classification = %decision.category,
        procedure_count = signals.procedure_count,
        "simplified classification"
    );

    results
        .record_extraction(extraction)
        .record_flow_kind(FlowKind::Simplified)
        .trace("classificacao_final", decision.category.as_str());
    results.classification = Some(decision.category);
    results.classification_justification = Some(decision.justification.to_string());
    results.classification_details = Some(signals.details());
    Ok(())
}
