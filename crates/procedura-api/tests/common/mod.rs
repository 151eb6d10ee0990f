//! Fake collaborators and request helpers for driving the router in-process.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use procedura_api::state::AppState;
use procedura_core::error::{InferenceError, SearchError};
use procedura_core::gateway::{
    BoxFuture, Embedder, InferenceGateway, InferenceRequest, OutputShape, SimilarityStore,
};
use procedura_core::models::similarity::SimilarityRecord;
use procedura_flows::{PromptSet, StepRunner};
use serde_json::{Value, json};
use tower::ServiceExt;

/// One canned answer per output shape; anything else fails.
#[derive(Default)]
pub struct CannedGateway {
    responses: HashMap<OutputShape, Value>,
    calls: Mutex<Vec<OutputShape>>,
}

impl CannedGateway {
    pub fn respond(mut self, shape: OutputShape, value: Value) -> Self {
        self.responses.insert(shape, value);
        self
    }

    pub fn calls(&self) -> Vec<OutputShape> {
        self.calls.lock().unwrap().clone()
    }
}

impl InferenceGateway for CannedGateway {
    fn infer(&self, request: InferenceRequest) -> BoxFuture<'_, Result<Value, InferenceError>> {
        let shape = request.shape;
        self.calls.lock().unwrap().push(shape);
        let result = self
            .responses
            .get(&shape)
            .cloned()
            .ok_or_else(|| InferenceError::Invocation("model unavailable".to_string()));
        Box::pin(async move { result })
    }
}

pub struct FixedEmbedder;

impl Embedder for FixedEmbedder {
    fn embed(&self, _text: String) -> BoxFuture<'_, Result<Vec<f32>, SearchError>> {
        Box::pin(async { Ok(vec![0.5, 0.5]) })
    }
}

#[derive(Default)]
pub struct CountingStore {
    pub match_counts: Mutex<Vec<usize>>,
}

impl SimilarityStore for CountingStore {
    fn search(
        &self,
        _query_embedding: Vec<f32>,
        match_count: usize,
    ) -> BoxFuture<'_, Result<Vec<SimilarityRecord>, SearchError>> {
        self.match_counts.lock().unwrap().push(match_count);
        let records = vec![SimilarityRecord::new(
            "0407030026",
            "COLECISTECTOMIA",
            "Retirada da vesícula biliar",
        )];
        Box::pin(async move { Ok(records) })
    }
}

pub struct TestApp {
    pub router: Router,
    pub gateway: Arc<CannedGateway>,
    pub store: Arc<CountingStore>,
}

pub fn test_app(gateway: CannedGateway) -> TestApp {
    let gateway = Arc::new(gateway);
    let store = Arc::new(CountingStore::default());
    let runner = StepRunner::new(
        gateway.clone(),
        Arc::new(FixedEmbedder),
        store.clone(),
        Arc::new(PromptSet::builtin()),
    );
    let state = AppState::new(runner, procedura_flows::registry());
    TestApp {
        router: procedura_api::app(state),
        gateway,
        store,
    }
}

pub async fn post_json(router: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

pub async fn get(router: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub fn two_procedures() -> Value {
    json!({
        "procedimentos_identificados": [
            {"procedimento": "Colecistectomia", "descricao": "videolaparoscópica", "diagnostico": "colelitíase"},
            {"procedimento": "Hernioplastia inguinal", "descricao": "à direita", "diagnostico": "hérnia inguinal"}
        ]
    })
}

pub fn decoded() -> Value {
    json!({
        "procedimentos_decodificados": [
            {
                "procedimento": {"procedimento": "Colecistectomia", "descricao": ""},
                "codigo": "0407030026",
                "tratar_cancer": false
            }
        ]
    })
}

pub const SURGICAL_TEXT: &str = "Realizada colecistectomia e hernioplastia inguinal direita.";
