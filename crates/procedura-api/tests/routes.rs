mod common;

use axum::http::StatusCode;
use procedura_api::error::INTERNAL_PREFIX;
use procedura_core::gateway::OutputShape;
use serde_json::json;

use common::{CannedGateway, SURGICAL_TEXT, decoded, get, post_json, test_app, two_procedures};

fn classifying_gateway() -> CannedGateway {
    CannedGateway::default()
        .respond(OutputShape::ProcedureExtraction, two_procedures())
        .respond(OutputShape::Decoding, decoded())
        .respond(
            OutputShape::TraumaVerification,
            json!({"entrada_por_trauma": false, "justificativa": "cirurgia eletiva"}),
        )
        .respond(
            OutputShape::SameDiseaseVerification,
            json!({"mesma_doenca": false, "justificativa": "diagnósticos distintos"}),
        )
}

#[tokio::test]
async fn root_reports_online() {
    let app = test_app(CannedGateway::default());
    let (status, body) = get(&app.router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
}

#[tokio::test]
async fn health_check_is_ok() {
    let app = test_app(CannedGateway::default());
    let (status, body) = get(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn extract_returns_procedures() {
    let app = test_app(classifying_gateway());
    let (status, body) = post_json(
        &app.router,
        "/extrair_procedimentos/",
        json!({"text": SURGICAL_TEXT}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let procedures = body["procedimentos_identificados"].as_array().unwrap();
    assert_eq!(procedures.len(), 2);
    assert_eq!(procedures[0]["procedimento"], "Colecistectomia");
}

#[tokio::test]
async fn blank_text_is_rejected() {
    let app = test_app(classifying_gateway());
    for path in [
        "/extrair_procedimentos/",
        "/fluxo_completo/",
        "/identificar_peca_anatomica/",
        "/processar_com_laudo/",
        "/verificar_entrada_por_trauma/",
        "/classificacao_final/",
    ] {
        let (status, body) = post_json(&app.router, path, json!({"text": "   "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
        assert!(body["detail"].is_string(), "{path}");
    }
    assert!(app.gateway.calls().is_empty());
}

#[tokio::test]
async fn step_failure_maps_to_internal_error() {
    let app = test_app(CannedGateway::default());
    let (status, body) = post_json(
        &app.router,
        "/extrair_procedimentos/",
        json!({"text": SURGICAL_TEXT}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with(INTERNAL_PREFIX));
    assert!(detail.contains("model unavailable"));
}

#[tokio::test]
async fn similar_search_defaults_to_ten_matches() {
    let app = test_app(CannedGateway::default());
    let (status, body) = post_json(
        &app.router,
        "/buscar_documentos_similares/",
        json!({
            "procedimentos_verificados": [{"procedimento": "Colecistectomia", "descricao": ""}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(*app.store.match_counts.lock().unwrap(), vec![10]);
    let records = body["documentos_similares"].as_array().unwrap();
    assert_eq!(records[0]["codigo_procedimento"], "0407030026");
}

#[tokio::test]
async fn similar_search_honours_match_count() {
    let app = test_app(CannedGateway::default());
    let (status, _) = post_json(
        &app.router,
        "/buscar_documentos_similares/",
        json!({
            "procedimentos_verificados": [{"procedimento": "Colecistectomia", "descricao": ""}],
            "match_count": 3
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(*app.store.match_counts.lock().unwrap(), vec![3]);
}

#[tokio::test]
async fn decode_uses_supplied_documents() {
    let app = test_app(classifying_gateway());
    let (status, body) = post_json(
        &app.router,
        "/decodificar_procedimentos/",
        json!({
            "procedimentos_verificados": [{"procedimento": "Colecistectomia", "descricao": ""}],
            "documentos_similares": [{
                "codigo_procedimento": "0407030026",
                "nome_procedimento": "COLECISTECTOMIA",
                "descricao_procedimento": "Retirada da vesícula biliar"
            }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(app.store.match_counts.lock().unwrap().is_empty());
    assert_eq!(body["procedimentos_decodificados"][0]["codigo"], "0407030026");
}

#[tokio::test]
async fn decode_without_documents_runs_its_own_lookup() {
    let app = test_app(classifying_gateway());
    let (status, _) = post_json(
        &app.router,
        "/decodificar_procedimentos/",
        json!({
            "procedimentos_verificados": [{"procedimento": "Colecistectomia", "descricao": ""}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(*app.store.match_counts.lock().unwrap(), vec![15]);
}

#[tokio::test]
async fn complete_flow_returns_decoding() {
    let app = test_app(classifying_gateway());
    let (status, body) =
        post_json(&app.router, "/fluxo_completo/", json!({"text": SURGICAL_TEXT})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["procedimentos_decodificados"][0]["codigo"], "0407030026");
}

#[tokio::test]
async fn complete_flow_failure_returns_placeholder() {
    let app = test_app(CannedGateway::default());
    let (status, body) =
        post_json(&app.router, "/fluxo_completo/", json!({"text": SURGICAL_TEXT})).await;

    assert_eq!(status, StatusCode::OK);
    let decoded = body["procedimentos_decodificados"].as_array().unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0]["procedimento"]["procedimento"], "Erro ao processar texto completo");
    assert_eq!(decoded[0]["codigo"], "N/A");
}

#[tokio::test]
async fn identify_specimen_answers_with_justification() {
    let gateway = CannedGateway::default().respond(
        OutputShape::SpecimenIdentification,
        json!({"retirada_peca_anatomica": true, "justificativa": "vesícula enviada para exame"}),
    );
    let app = test_app(gateway);
    let (status, body) = post_json(
        &app.router,
        "/identificar_peca_anatomica/",
        json!({"text": SURGICAL_TEXT}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["retirada_peca_anatomica"], true);
    assert_eq!(body["justificativa"], "vesícula enviada para exame");
}

#[tokio::test]
async fn process_without_report_runs_without_specimen_flow() {
    let app = test_app(classifying_gateway());
    let (status, body) = post_json(
        &app.router,
        "/processar_com_laudo/",
        json!({"text": SURGICAL_TEXT}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tipo_fluxo"], "sem_peca_anatomica");
    assert_eq!(body["classificacao_final"], "multipla");
    assert!(body["id_requisicao"].is_string());
    assert!(body["trilha"].as_array().is_some_and(|t| !t.is_empty()));
    assert!(!app.gateway.calls().contains(&OutputShape::SpecimenIdentification));
}

#[tokio::test]
async fn trauma_falls_back_to_keywords() {
    let app = test_app(CannedGateway::default());
    let (status, body) = post_json(
        &app.router,
        "/verificar_entrada_por_trauma/",
        json!({"text": "Paciente vítima de queda da própria altura."}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entrada_por_trauma"], true);
    assert_eq!(body["origem"], "palavras_chave");
    assert!(body["justificativa"].as_str().unwrap().contains("queda"));
}

#[tokio::test]
async fn single_procedure_is_same_disease_without_inference() {
    let app = test_app(CannedGateway::default());
    let (status, body) = post_json(
        &app.router,
        "/verificar_mesma_doenca/",
        json!({"procedimentos_verificados": [{"procedimento": "Apendicectomia", "descricao": ""}]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mesma_doenca"], true);
    assert_eq!(body["origem"], "procedimento_unico");
    assert!(app.gateway.calls().is_empty());
}

#[tokio::test]
async fn final_classification_reports_category_and_details() {
    let app = test_app(classifying_gateway());
    let (status, body) = post_json(
        &app.router,
        "/classificacao_final/",
        json!({"text": SURGICAL_TEXT}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classificacao_final"], "multipla");
    assert_eq!(body["detalhes"]["numero_procedimentos"], 2);
    assert_eq!(body["detalhes"]["mesma_doenca"], false);
    assert!(body["justificativa"].is_string());
}

#[tokio::test]
async fn final_classification_total_failure_is_unclassified() {
    let app = test_app(CannedGateway::default());
    let (status, body) = post_json(
        &app.router,
        "/classificacao_final/",
        json!({"text": SURGICAL_TEXT}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classificacao_final"], "não_classificado");
}
