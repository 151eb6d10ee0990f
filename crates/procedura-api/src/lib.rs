//! procedura-api
//!
//! HTTP surface over the classification flows. The same router runs behind
//! API Gateway on Lambda or as a standalone server.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod middleware;
pub mod routes;
pub mod settings;
pub mod state;

use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route(
            "/extrair_procedimentos/",
            post(routes::extraction::extract_procedures),
        )
        .route(
            "/buscar_documentos_similares/",
            post(routes::search::search_similar),
        )
        .route(
            "/decodificar_procedimentos/",
            post(routes::search::decode_procedures),
        )
        .route("/fluxo_completo/", post(routes::flows::complete_flow))
        .route(
            "/identificar_peca_anatomica/",
            post(routes::extraction::identify_specimen),
        )
        .route(
            "/processar_com_laudo/",
            post(routes::flows::process_with_pathology),
        )
        .route(
            "/verificar_entrada_por_trauma/",
            post(routes::verification::verify_trauma),
        )
        .route(
            "/verificar_mesma_doenca/",
            post(routes::verification::verify_same_disease),
        )
        .route(
            "/classificacao_final/",
            post(routes::flows::final_classification),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum_mw::from_fn(middleware::audit::audit_log))
                .layer(cors),
        )
        .with_state(state)
}
