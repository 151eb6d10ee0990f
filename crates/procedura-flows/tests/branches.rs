mod common;

use common::*;
use procedura_core::accumulator::{FlowKind, ResultAccumulator};
use procedura_core::gateway::OutputShape;
use procedura_core::models::classification::ClassificationCategory;
use procedura_flows::FlowInput;
use procedura_flows::branches::{
    COMPLETE_FLOW_ERROR, complete, final_classification, with_specimen, without_specimen,
};
use procedura_flows::steps::SURGICAL_MATCH_COUNT;

fn input(harness: &Harness, pathology: Option<&str>) -> FlowInput {
    FlowInput::new(harness.runner.clone(), SURGICAL_TEXT)
        .with_pathology(pathology.map(str::to_string))
}

#[tokio::test]
async fn with_specimen_reconciles_and_classifies() {
    let harness = Harness::new(happy_gateway());
    let results = with_specimen(input(&harness, Some(PATHOLOGY_TEXT))).await.unwrap();

    assert_eq!(results.flow_kind, Some(FlowKind::WithSpecimen));
    assert!(results.surgical_extraction.is_some());
    assert_eq!(results.pathology().unwrap().len(), 1);
    assert_eq!(results.reconciled.as_ref().unwrap().len(), 2);
    assert_eq!(results.decoding.as_ref().unwrap().len(), 2);
    assert_eq!(results.trauma_entry, Some(false));
    assert_eq!(results.same_disease, Some(false));
    assert_eq!(results.classification, Some(ClassificationCategory::Multiple));
    assert!(harness.gateway.called(OutputShape::Reconciliation));
}

#[tokio::test]
async fn with_specimen_without_report_uses_surgical_list() {
    let harness = Harness::new(happy_gateway());
    let results = with_specimen(input(&harness, None)).await.unwrap();

    assert_eq!(results.flow_kind, Some(FlowKind::WithSpecimen));
    assert_eq!(results.pathology_extraction, Some(None));
    assert_eq!(results.reconciled, results.surgical_extraction);

    let value = serde_json::to_value(&results).unwrap();
    assert!(value.as_object().unwrap().contains_key("extracao_laudo"));
    assert!(value["extracao_laudo"].is_null());
    assert!(!harness.gateway.called(OutputShape::Reconciliation));
    assert!(!harness.gateway.called(OutputShape::PathologyExtraction));
    assert_eq!(harness.store.match_counts()[0], SURGICAL_MATCH_COUNT);
}

#[tokio::test]
async fn with_specimen_failure_returns_tagged_partial() {
    let harness = Harness::new(happy_gateway().fail(OutputShape::Decoding));
    let results = with_specimen(input(&harness, Some(PATHOLOGY_TEXT))).await.unwrap();

    assert_eq!(results.flow_kind, Some(FlowKind::WithSpecimenFailed));
    assert!(results.is_failure());
    assert!(results.error.as_deref().unwrap().contains("Decoding"));
    assert!(results.surgical_extraction.is_some());
    assert!(results.pathology().is_some());
    assert!(results.reconciled.is_none());
    assert!(results.decoding.is_none());
    assert!(results.classification.is_none());
}

#[tokio::test]
async fn with_specimen_failure_before_report_keeps_surgical_only() {
    let harness = Harness::new(happy_gateway().fail(OutputShape::PathologyExtraction));
    let results = with_specimen(input(&harness, Some(PATHOLOGY_TEXT))).await.unwrap();

    assert_eq!(results.flow_kind, Some(FlowKind::WithSpecimenFailed));
    assert!(results.surgical_extraction.is_some());
    assert!(results.pathology_extraction.is_none());
}

#[tokio::test]
async fn without_specimen_records_plain_extraction() {
    let gateway = happy_gateway().respond(OutputShape::SameDiseaseVerification, same_disease(true));
    let harness = Harness::new(gateway);
    let results = without_specimen(input(&harness, None)).await.unwrap();

    assert_eq!(results.flow_kind, Some(FlowKind::WithoutSpecimen));
    assert!(results.extraction.is_some());
    assert!(results.surgical_extraction.is_none());
    assert_eq!(results.classification, Some(ClassificationCategory::Sequential));
    assert_eq!(
        results.classification_details.unwrap().numero_procedimentos,
        2
    );
}

#[tokio::test]
async fn without_specimen_propagates_step_errors() {
    let harness = Harness::new(happy_gateway().fail(OutputShape::ProcedureExtraction));
    assert!(without_specimen(input(&harness, None)).await.is_err());
}

#[tokio::test]
async fn verification_failures_do_not_fail_the_branch() {
    let gateway = happy_gateway()
        .fail(OutputShape::TraumaVerification)
        .fail(OutputShape::SameDiseaseVerification);
    let harness = Harness::new(gateway);
    let results = without_specimen(
        FlowInput::new(harness.runner.clone(), "Politrauma após colisão de moto."),
    )
    .await
    .unwrap();

    assert_eq!(results.trauma_entry, Some(true));
    // Distinct diagnoses in the extraction.
    assert_eq!(results.same_disease, Some(false));
    assert_eq!(results.classification, Some(ClassificationCategory::Polytrauma));
}

#[tokio::test]
async fn complete_flow_decodes_with_fifteen_matches() {
    let harness = Harness::new(happy_gateway());
    let results = complete(input(&harness, None)).await.unwrap();

    assert_eq!(results.decoding.as_ref().unwrap()[1].code, "0407040102");
    assert_eq!(harness.store.match_counts(), vec![15]);
    assert!(results.classification.is_none());
}

#[tokio::test]
async fn complete_flow_failure_yields_placeholder() {
    let harness = Harness::new(ScriptedGateway::new());
    let results = complete(input(&harness, None)).await.unwrap();

    let decoding = results.decoding.unwrap();
    assert_eq!(decoding.len(), 1);
    assert_eq!(decoding[0].procedure.name, COMPLETE_FLOW_ERROR);
    assert_eq!(decoding[0].code, "N/A");
    assert!(results.error.is_some());
}

#[tokio::test]
async fn final_classification_classifies_given_results() {
    let harness = Harness::new(ScriptedGateway::new());
    let mut results = ResultAccumulator::default();
    results.record_decoding(Vec::new());
    results.record_trauma_entry(true);

    let classified = final_classification(input(&harness, None).with_results(results))
        .await
        .unwrap();
    assert_eq!(classified.classification, Some(ClassificationCategory::SingleProcedure));
    assert!(harness.gateway.calls().is_empty());
}
