//! The registered flows.
//!
//! Each flow takes a [`FlowInput`] and returns the accumulator it was given,
//! filled in. `with_specimen` and `complete` contain their own failures and
//! always return `Ok`; the others propagate step errors so the registry
//! reports them as failed.

use procedura_core::accumulator::{FlowKind, ResultAccumulator};
use procedura_core::classify::classify;
use procedura_core::models::decode::DecodedProcedure;
use procedura_core::models::procedure::ProcedureExtraction;
use tracing::{error, info};

use crate::config::{COMPLETE, WITH_SPECIMEN};
use crate::error::FlowError;
use crate::input::FlowInput;
use crate::steps::{DECODE_MATCH_COUNT, SURGICAL_MATCH_COUNT, StepRunner};

pub const COMPLETE_FLOW_ERROR: &str = "Erro ao processar texto completo";

/// Surgical description plus pathology report: extract both, reconcile,
/// decode the reconciled list, verify, classify.
///
/// Any step error is caught here and turned into a partial result tagged
/// `com_peca_anatomica_com_erro` that keeps whichever extractions succeeded.
pub async fn with_specimen(input: FlowInput) -> Result<ResultAccumulator, FlowError> {
    let FlowInput {
        runner,
        surgical_text,
        pathology_text,
        mut results,
    } = input;
    info!(
        request_id = ?results.request_id,
        text_len = surgical_text.len(),
        pathology_len = pathology_text.as_deref().map_or(0, str::len),
        "running flow with specimen"
    );

    match with_specimen_steps(&runner, &surgical_text, pathology_text.as_deref(), &mut results)
        .await
    {
        Ok(()) => Ok(classify(results)),
        Err(e) => {
            error!(
                flow = WITH_SPECIMEN,
                request_id = ?results.request_id,
                text_len = surgical_text.len(),
                error = %e,
                "flow with specimen failed"
            );
            Ok(partial_failure(results, &e))
        }
    }
}

async fn with_specimen_steps(
    runner: &StepRunner,
    surgical_text: &str,
    pathology_text: Option<&str>,
    results: &mut ResultAccumulator,
) -> Result<(), FlowError> {
    let surgical = runner.extract_procedures(surgical_text).await?;
    results
        .record_surgical_extraction(surgical.clone())
        .trace("extracao_cirurgia", count_detail(surgical.len()));

    let reconciled = match pathology_text {
        Some(report) => {
            let pathology = runner.extract_pathology(report).await?;
            results
                .record_pathology_extraction(Some(pathology.clone()))
                .trace("extracao_laudo", count_detail(pathology.len()));

            runner
                .reconcile(&surgical.procedures, &pathology.findings, None)
                .await?
        }
        None => {
            results.record_pathology_extraction(None);
            // Looked up for the log only; the surgical list is used as is.
            let similar = runner
                .search_similar(&surgical.procedures, SURGICAL_MATCH_COUNT)
                .await;
            info!(found = similar.len(), "similar records for surgical procedures");
            surgical
        }
    };
    results
        .record_reconciled(reconciled.clone())
        .trace("procedimentos_corrigidos", count_detail(reconciled.len()));

    let decoded = runner.decode(&reconciled.procedures, None).await?;
    record_verified(runner, surgical_text, &reconciled, decoded, results).await;
    results.record_flow_kind(FlowKind::WithSpecimen);
    Ok(())
}

fn partial_failure(results: ResultAccumulator, e: &FlowError) -> ResultAccumulator {
    let mut partial = ResultAccumulator {
        request_id: results.request_id,
        surgical_extraction: results.surgical_extraction,
        pathology_extraction: results.pathology_extraction,
        specimen_removed: results.specimen_removed,
        specimen_justification: results.specimen_justification,
        trail: results.trail,
        ..ResultAccumulator::default()
    };
    partial
        .record_error(e.to_string())
        .record_flow_kind(FlowKind::WithSpecimenFailed)
        .trace("erro", e.to_string());
    partial
}

/// Surgical description only: extract, decode, verify, classify.
pub async fn without_specimen(input: FlowInput) -> Result<ResultAccumulator, FlowError> {
    let FlowInput {
        runner,
        surgical_text,
        mut results,
        ..
    } = input;
    info!(
        request_id = ?results.request_id,
        text_len = surgical_text.len(),
        "running flow without specimen"
    );

    let extraction = runner.extract_procedures(&surgical_text).await?;
    results
        .record_extraction(extraction.clone())
        .trace("extracao", count_detail(extraction.len()));

    let decoded = runner.decode(&extraction.procedures, None).await?;
    record_verified(&runner, &surgical_text, &extraction, decoded, &mut results).await;
    results.record_flow_kind(FlowKind::WithoutSpecimen);

    Ok(classify(results))
}

/// Record decoding plus both verifications. The two verifications are
/// independent and run concurrently.
async fn record_verified(
    runner: &StepRunner,
    surgical_text: &str,
    procedures: &ProcedureExtraction,
    decoded: Vec<DecodedProcedure>,
    results: &mut ResultAccumulator,
) {
    results
        .record_decoding(decoded.clone())
        .trace("decodificacao", count_detail(decoded.len()));

    let (trauma, same_disease) = futures::join!(
        runner.verify_trauma(surgical_text),
        runner.verify_same_disease(&procedures.procedures)
    );

    results
        .record_trauma_entry(trauma.value)
        .trace(
            "entrada_por_trauma",
            format!("{} ({}): {}", trauma.value, trauma.source.as_str(), trauma.justification),
        )
        .record_same_disease(same_disease.value)
        .trace(
            "mesma_doenca",
            format!(
                "{} ({}): {}",
                same_disease.value,
                same_disease.source.as_str(),
                same_disease.justification
            ),
        );
}

/// Extract, look up reference records, decode. Never fails: on any error
/// the decoding holds a single placeholder entry.
pub async fn complete(input: FlowInput) -> Result<ResultAccumulator, FlowError> {
    let FlowInput {
        runner,
        surgical_text,
        mut results,
        ..
    } = input;
    info!(
        request_id = ?results.request_id,
        text_len = surgical_text.len(),
        "running complete flow"
    );

    match complete_steps(&runner, &surgical_text, &mut results).await {
        Ok(decoded) => {
            results
                .record_decoding(decoded.clone())
                .trace("decodificacao", count_detail(decoded.len()));
        }
        Err(e) => {
            error!(
                flow = COMPLETE,
                text_len = surgical_text.len(),
                error = %e,
                "complete flow failed"
            );
            results
                .record_error(e.to_string())
                .record_decoding(vec![DecodedProcedure::placeholder(COMPLETE_FLOW_ERROR)])
                .trace("erro", e.to_string());
        }
    }
    Ok(results)
}

async fn complete_steps(
    runner: &StepRunner,
    text: &str,
    results: &mut ResultAccumulator,
) -> Result<Vec<DecodedProcedure>, FlowError> {
    let extraction = runner.extract_procedures(text).await?;
    results
        .record_extraction(extraction.clone())
        .trace("extracao", count_detail(extraction.len()));

    let similar = runner
        .search_similar(&extraction.procedures, DECODE_MATCH_COUNT)
        .await;
    Ok(runner.decode(&extraction.procedures, Some(similar)).await?)
}

/// Classify whatever the input accumulator already holds.
pub async fn final_classification(input: FlowInput) -> Result<ResultAccumulator, FlowError> {
    Ok(classify(input.results))
}

fn count_detail(count: usize) -> String {
    match count {
        1 => "1 procedimento".to_string(),
        n => format!("{n} procedimentos"),
    }
}
