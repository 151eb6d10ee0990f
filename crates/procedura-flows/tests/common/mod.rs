//! In-process fakes for the inference, embedding and similarity
//! collaborators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use procedura_core::error::{InferenceError, SearchError};
use procedura_core::gateway::{
    BoxFuture, Embedder, InferenceGateway, InferenceRequest, OutputShape, SimilarityStore,
};
use procedura_core::models::similarity::SimilarityRecord;
use procedura_flows::{PromptSet, StepRunner};
use serde_json::{Value, json};

/// Answers each output shape with a fixed response. Shapes without a
/// scripted response fail with an invocation error.
#[derive(Default)]
pub struct ScriptedGateway {
    responses: HashMap<OutputShape, Result<Value, InferenceError>>,
    requests: Mutex<Vec<InferenceRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, shape: OutputShape, value: Value) -> Self {
        self.responses.insert(shape, Ok(value));
        self
    }

    pub fn fail(mut self, shape: OutputShape) -> Self {
        self.responses.insert(
            shape,
            Err(InferenceError::Invocation(format!("{} unavailable", shape.name()))),
        );
        self
    }

    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<OutputShape> {
        self.requests().into_iter().map(|r| r.shape).collect()
    }

    pub fn called(&self, shape: OutputShape) -> bool {
        self.calls().contains(&shape)
    }

    pub fn request_for(&self, shape: OutputShape) -> Option<InferenceRequest> {
        self.requests().into_iter().find(|r| r.shape == shape)
    }
}

impl InferenceGateway for ScriptedGateway {
    fn infer(&self, request: InferenceRequest) -> BoxFuture<'_, Result<Value, InferenceError>> {
        let shape = request.shape;
        self.requests.lock().unwrap().push(request);
        let response = self.responses.get(&shape).cloned().unwrap_or_else(|| {
            Err(InferenceError::Invocation(format!(
                "no scripted response for {}",
                shape.name()
            )))
        });
        Box::pin(async move { response })
    }
}

/// Returns a fixed vector and records every query.
#[derive(Default)]
pub struct RecordingEmbedder {
    queries: Mutex<Vec<String>>,
    failing: bool,
}

impl RecordingEmbedder {
    pub fn failing() -> Self {
        Self {
            queries: Mutex::default(),
            failing: true,
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Embedder for RecordingEmbedder {
    fn embed(&self, text: String) -> BoxFuture<'_, Result<Vec<f32>, SearchError>> {
        self.queries.lock().unwrap().push(text);
        let result = if self.failing {
            Err(SearchError::Embedding("embedding service down".to_string()))
        } else {
            Ok(vec![1.0, 0.0, 0.0])
        };
        Box::pin(async move { result })
    }
}

/// Returns fixed records and records each requested match count.
#[derive(Default)]
pub struct RecordingStore {
    records: Vec<SimilarityRecord>,
    match_counts: Mutex<Vec<usize>>,
    failing: bool,
}

impl RecordingStore {
    pub fn with_records(records: Vec<SimilarityRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn match_counts(&self) -> Vec<usize> {
        self.match_counts.lock().unwrap().clone()
    }
}

impl SimilarityStore for RecordingStore {
    fn search(
        &self,
        _query_embedding: Vec<f32>,
        match_count: usize,
    ) -> BoxFuture<'_, Result<Vec<SimilarityRecord>, SearchError>> {
        self.match_counts.lock().unwrap().push(match_count);
        let result = if self.failing {
            Err(SearchError::Transport("connection refused".to_string()))
        } else {
            Ok(self.records.iter().take(match_count).cloned().collect())
        };
        Box::pin(async move { result })
    }
}

/// Collaborators plus a runner wired to them.
pub struct Harness {
    pub gateway: Arc<ScriptedGateway>,
    pub embedder: Arc<RecordingEmbedder>,
    pub store: Arc<RecordingStore>,
    pub runner: StepRunner,
}

impl Harness {
    pub fn new(gateway: ScriptedGateway) -> Self {
        Self::with(
            gateway,
            RecordingEmbedder::default(),
            RecordingStore::with_records(reference_records()),
        )
    }

    pub fn with(
        gateway: ScriptedGateway,
        embedder: RecordingEmbedder,
        store: RecordingStore,
    ) -> Self {
        let gateway = Arc::new(gateway);
        let embedder = Arc::new(embedder);
        let store = Arc::new(store);
        let runner = StepRunner::new(
            gateway.clone(),
            embedder.clone(),
            store.clone(),
            Arc::new(PromptSet::builtin()),
        );
        Self {
            gateway,
            embedder,
            store,
            runner,
        }
    }
}

pub fn reference_records() -> Vec<SimilarityRecord> {
    vec![
        SimilarityRecord::new("0407030026", "COLECISTECTOMIA", "Retirada da vesícula biliar"),
        SimilarityRecord::new(
            "0407030034",
            "COLECISTECTOMIA VIDEOLAPAROSCOPICA",
            "Retirada da vesícula por via laparoscópica",
        ),
        SimilarityRecord::new(
            "0407040102",
            "HERNIOPLASTIA INGUINAL",
            "Correção de hérnia inguinal",
        ),
    ]
}

pub fn extraction(procedures: &[(&str, Option<&str>)]) -> Value {
    let list: Vec<Value> = procedures
        .iter()
        .map(|(name, diagnosis)| {
            json!({
                "procedimento": name,
                "descricao": format!("{name} realizada sem intercorrências"),
                "diagnostico": diagnosis,
            })
        })
        .collect();
    json!({ "procedimentos_identificados": list })
}

pub fn pathology(findings: &[(&str, &str, &str)]) -> Value {
    let list: Vec<Value> = findings
        .iter()
        .map(|(name, specimen, diagnosis)| {
            json!({
                "procedimento": name,
                "descricao": "",
                "peca_anatomica": specimen,
                "diagnostico": diagnosis,
            })
        })
        .collect();
    json!({ "procedimentos_laudo": list })
}

pub fn decoding(entries: &[(&str, &str)]) -> Value {
    let list: Vec<Value> = entries
        .iter()
        .map(|(name, code)| {
            json!({
                "procedimento": {"procedimento": name, "descricao": ""},
                "codigo": code,
                "tratar_cancer": false,
            })
        })
        .collect();
    json!({ "procedimentos_decodificados": list })
}

pub fn specimen(removed: bool) -> Value {
    json!({"retirada_peca_anatomica": removed, "justificativa": "conforme descrição"})
}

pub fn trauma(value: bool) -> Value {
    json!({"entrada_por_trauma": value, "justificativa": "conforme descrição"})
}

pub fn same_disease(value: bool) -> Value {
    json!({"mesma_doenca": value, "justificativa": "conforme diagnósticos"})
}

pub const SURGICAL_TEXT: &str = "Paciente submetida a colecistectomia videolaparoscópica e \
    hernioplastia inguinal direita no mesmo ato cirúrgico.";

pub const PATHOLOGY_TEXT: &str = "Vesícula biliar medindo 8 cm. Diagnóstico: colecistite \
    crônica calculosa.";

/// A gateway where every step succeeds with two procedures for different
/// diseases and no trauma.
pub fn happy_gateway() -> ScriptedGateway {
    let procedures = [
        ("Colecistectomia videolaparoscópica", Some("colelitíase")),
        ("Hernioplastia inguinal", Some("hérnia inguinal")),
    ];
    ScriptedGateway::new()
        .respond(OutputShape::ProcedureExtraction, extraction(&procedures))
        .respond(OutputShape::Reconciliation, extraction(&procedures))
        .respond(
            OutputShape::PathologyExtraction,
            pathology(&[("Colecistectomia", "Vesícula biliar", "Colecistite crônica calculosa")]),
        )
        .respond(
            OutputShape::Decoding,
            decoding(&[
                ("Colecistectomia videolaparoscópica", "0407030034"),
                ("Hernioplastia inguinal", "0407040102"),
            ]),
        )
        .respond(OutputShape::TraumaVerification, trauma(false))
        .respond(OutputShape::SameDiseaseVerification, same_disease(false))
}
