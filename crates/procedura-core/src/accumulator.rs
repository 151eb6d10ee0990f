//! Per-request result accumulator.
//!
//! Every step of a flow writes its output into one [`ResultAccumulator`],
//! which is what the classifier reads and what the caller finally receives.
//! Field names on the wire follow the keys clients already consume
//! (`extracao`, `decodificacao`, `classificacao_final`, ...).
//!
//! A slot is written at most once per flow. The only exception is the
//! classification block, which the classifier always writes last.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::models::classification::{ClassificationCategory, ClassificationDetails};
use crate::models::decode::DecodedProcedure;
use crate::models::procedure::{PathologyExtraction, Procedure, ProcedureExtraction};

/// Which flow produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowKind {
    #[serde(rename = "com_peca_anatomica")]
    WithSpecimen,
    #[serde(rename = "com_peca_anatomica_com_erro")]
    WithSpecimenFailed,
    #[serde(rename = "sem_peca_anatomica")]
    WithoutSpecimen,
    #[serde(rename = "simplificado")]
    Simplified,
    #[serde(rename = "erro")]
    Error,
}

impl FlowKind {
    /// Whether this tag marks a result that should trigger the next
    /// fallback tier.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::WithSpecimenFailed | Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithSpecimen => "com_peca_anatomica",
            Self::WithSpecimenFailed => "com_peca_anatomica_com_erro",
            Self::WithoutSpecimen => "sem_peca_anatomica",
            Self::Simplified => "simplificado",
            Self::Error => "erro",
        }
    }
}

/// One step of the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailEntry {
    #[serde(rename = "etapa")]
    pub step: String,
    #[serde(rename = "detalhe")]
    pub detail: String,
    #[serde(rename = "em")]
    pub at: jiff::Timestamp,
}

/// Where the classifier found the procedure list, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureSource<'a> {
    Reconciled(&'a [Procedure]),
    Extraction(&'a [Procedure]),
    SurgicalExtraction(&'a [Procedure]),
    Missing,
}

impl<'a> ProcedureSource<'a> {
    pub fn procedures(&self) -> &'a [Procedure] {
        match self {
            Self::Reconciled(p) | Self::Extraction(p) | Self::SurgicalExtraction(p) => p,
            Self::Missing => &[],
        }
    }

    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::Reconciled(_) => Some("procedimentos_corrigidos"),
            Self::Extraction(_) => Some("extracao"),
            Self::SurgicalExtraction(_) => Some("extracao_cirurgia"),
            Self::Missing => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultAccumulator {
    #[serde(rename = "id_requisicao", default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,

    #[serde(rename = "extracao", default, skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ProcedureExtraction>,
    #[serde(rename = "extracao_cirurgia", default, skip_serializing_if = "Option::is_none")]
    pub surgical_extraction: Option<ProcedureExtraction>,
    /// `Some(None)` marks a flow that had no report to extract; it is
    /// written as `null` rather than omitted.
    #[serde(
        rename = "extracao_laudo",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub pathology_extraction: Option<Option<PathologyExtraction>>,
    #[serde(rename = "procedimentos_corrigidos", default, skip_serializing_if = "Option::is_none")]
    pub reconciled: Option<ProcedureExtraction>,
    #[serde(rename = "decodificacao", default, skip_serializing_if = "Option::is_none")]
    pub decoding: Option<Vec<DecodedProcedure>>,

    #[serde(rename = "entrada_por_trauma", default, skip_serializing_if = "Option::is_none")]
    pub trauma_entry: Option<bool>,
    #[serde(rename = "mesma_doenca", default, skip_serializing_if = "Option::is_none")]
    pub same_disease: Option<bool>,
    #[serde(rename = "retirada_peca_anatomica", default, skip_serializing_if = "Option::is_none")]
    pub specimen_removed: Option<bool>,
    #[serde(rename = "justificativa_peca", default, skip_serializing_if = "Option::is_none")]
    pub specimen_justification: Option<String>,

    #[serde(rename = "classificacao_final", default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationCategory>,
    #[serde(
        rename = "justificativa_classificacao",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub classification_justification: Option<String>,
    #[serde(rename = "detalhes_classificacao", default, skip_serializing_if = "Option::is_none")]
    pub classification_details: Option<ClassificationDetails>,
    #[serde(rename = "erro_classificacao", default, skip_serializing_if = "Option::is_none")]
    pub classification_error: Option<String>,

    #[serde(rename = "erro", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "tipo_fluxo", default, skip_serializing_if = "Option::is_none")]
    pub flow_kind: Option<FlowKind>,

    #[serde(rename = "trilha", default, skip_serializing_if = "Vec::is_empty")]
    pub trail: Vec<TrailEntry>,
}

impl ResultAccumulator {
    pub fn new(request_id: Uuid) -> Self {
        Self {
            request_id: Some(request_id),
            ..Self::default()
        }
    }

    /// Resolve the procedure list the classifier should count.
    ///
    /// Probes reconciled, then plain extraction, then surgical extraction.
    /// The first populated slot wins, even if its list is empty.
    pub fn procedure_source(&self) -> ProcedureSource<'_> {
        if let Some(r) = &self.reconciled {
            ProcedureSource::Reconciled(&r.procedures)
        } else if let Some(e) = &self.extraction {
            ProcedureSource::Extraction(&e.procedures)
        } else if let Some(s) = &self.surgical_extraction {
            ProcedureSource::SurgicalExtraction(&s.procedures)
        } else {
            ProcedureSource::Missing
        }
    }

    /// Whether the result is tagged as a failure of its flow.
    pub fn is_failure(&self) -> bool {
        self.flow_kind.is_some_and(|k| k.is_failure())
    }

    pub fn record_extraction(&mut self, value: ProcedureExtraction) -> &mut Self {
        write_once(&mut self.extraction, value, "extracao");
        self
    }

    pub fn record_surgical_extraction(&mut self, value: ProcedureExtraction) -> &mut Self {
        write_once(&mut self.surgical_extraction, value, "extracao_cirurgia");
        self
    }

    /// The pathology extraction, if one was recorded with content.
    pub fn pathology(&self) -> Option<&PathologyExtraction> {
        self.pathology_extraction.as_ref().and_then(Option::as_ref)
    }

    /// Record the pathology extraction, or `None` when the flow ran without
    /// a report.
    pub fn record_pathology_extraction(
        &mut self,
        value: Option<PathologyExtraction>,
    ) -> &mut Self {
        write_once(&mut self.pathology_extraction, value, "extracao_laudo");
        self
    }

    pub fn record_reconciled(&mut self, value: ProcedureExtraction) -> &mut Self {
        write_once(&mut self.reconciled, value, "procedimentos_corrigidos");
        self
    }

    pub fn record_decoding(&mut self, value: Vec<DecodedProcedure>) -> &mut Self {
        write_once(&mut self.decoding, value, "decodificacao");
        self
    }

    pub fn record_trauma_entry(&mut self, value: bool) -> &mut Self {
        write_once(&mut self.trauma_entry, value, "entrada_por_trauma");
        self
    }

    pub fn record_same_disease(&mut self, value: bool) -> &mut Self {
        write_once(&mut self.same_disease, value, "mesma_doenca");
        self
    }

    pub fn record_specimen(&mut self, removed: bool, justification: String) -> &mut Self {
        write_once(&mut self.specimen_removed, removed, "retirada_peca_anatomica");
        write_once(&mut self.specimen_justification, justification, "justificativa_peca");
        self
    }

    pub fn record_error(&mut self, message: impl Into<String>) -> &mut Self {
        write_once(&mut self.error, message.into(), "erro");
        self
    }

    pub fn record_flow_kind(&mut self, kind: FlowKind) -> &mut Self {
        write_once(&mut self.flow_kind, kind, "tipo_fluxo");
        self
    }

    /// Append a step to the audit trail.
    pub fn trace(&mut self, step: impl Into<String>, detail: impl Into<String>) -> &mut Self {
        self.trail.push(TrailEntry {
            step: step.into(),
            detail: detail.into(),
            at: jiff::Timestamp::now(),
        });
        self
    }
}

/// Distinguishes an explicit `null` from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn write_once<T>(slot: &mut Option<T>, value: T, key: &'static str) {
    if slot.is_some() {
        warn!(key, "accumulator slot already written, keeping first value");
        return;
    }
    *slot = Some(value);
}
