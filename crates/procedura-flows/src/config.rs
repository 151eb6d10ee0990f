//! The process-wide flow registry.

use std::sync::LazyLock;

use procedura_core::accumulator::ResultAccumulator;

use crate::branches;
use crate::input::FlowInput;
use crate::registry::FlowRegistry;

pub const COMPLETE: &str = "fluxo_completo";
pub const WITH_SPECIMEN: &str = "fluxo_com_peca_anatomica";
pub const WITHOUT_SPECIMEN: &str = "fluxo_sem_peca_anatomica";
pub const FINAL_CLASSIFICATION: &str = "fluxo_classificacao_final";

pub type ProcedureFlows = FlowRegistry<FlowInput, ResultAccumulator>;

static REGISTRY: LazyLock<ProcedureFlows> = LazyLock::new(configure_registry);

/// Build the registry. Order matters: guards are scanned top to bottom.
pub fn configure_registry() -> ProcedureFlows {
    let mut flows = ProcedureFlows::new();
    flows
        .register(COMPLETE, branches::complete)
        .register_guarded(
            WITH_SPECIMEN,
            |results: &ResultAccumulator| Ok(results.specimen_removed == Some(true)),
            branches::with_specimen,
        )
        .register_guarded(
            WITHOUT_SPECIMEN,
            |results: &ResultAccumulator| Ok(results.specimen_removed == Some(false)),
            branches::without_specimen,
        )
        .register_guarded(
            FINAL_CLASSIFICATION,
            |results: &ResultAccumulator| Ok(results.decoding.is_some()),
            branches::final_classification,
        );
    flows
}

/// Shared registry, built on first use and read-only afterwards.
pub fn registry() -> &'static ProcedureFlows {
    &REGISTRY
}
