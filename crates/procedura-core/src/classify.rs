//! Final classification rule table.
//!
//! | trauma | multiple | same disease | category |
//! |---|---|---|---|
//! | yes | yes | any | politrauma |
//! | no | yes | yes | sequencial |
//! | no | yes | no | multipla |
//! | any | no | any | procedimento_isolado |
//!
//! Rows are evaluated top to bottom. Trauma with a single procedure lands on
//! `procedimento_isolado`: politrauma requires both signals.

use tracing::{info, warn};

use crate::accumulator::{ProcedureSource, ResultAccumulator};
use crate::error::ClassificationError;
use crate::models::classification::{ClassificationCategory, ClassificationDetails};

/// The three signals the rule table consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationSignals {
    pub trauma_entry: bool,
    pub procedure_count: usize,
    pub same_disease: bool,
}

impl ClassificationSignals {
    pub fn multiple(&self) -> bool {
        self.procedure_count > 1
    }

    pub fn details(&self) -> ClassificationDetails {
        ClassificationDetails {
            entrada_por_trauma: self.trauma_entry,
            multiplos_procedimentos: self.multiple(),
            mesma_doenca: self.same_disease,
            numero_procedimentos: self.procedure_count,
        }
    }

    /// Derive signals from an accumulator. Missing booleans read as `false`.
    pub fn from_accumulator(acc: &ResultAccumulator) -> Result<Self, ClassificationError> {
        if acc.is_failure() {
            let reason = acc
                .error
                .clone()
                .unwrap_or_else(|| "flow tagged as failed".to_string());
            return Err(ClassificationError::FailedFlow(reason));
        }

        let source = acc.procedure_source();
        if source == ProcedureSource::Missing || source.procedures().is_empty() {
            warn!("no procedures found in results, counting zero");
        }

        Ok(Self {
            trauma_entry: acc.trauma_entry.unwrap_or(false),
            procedure_count: source.procedures().len(),
            same_disease: acc.same_disease.unwrap_or(false),
        })
    }
}

/// A category with the sentence that justifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub category: ClassificationCategory,
    pub justification: &'static str,
}

/// Apply the rule table. Pure.
pub fn decide(signals: ClassificationSignals) -> Decision {
    let multiple = signals.multiple();

    if signals.trauma_entry && multiple {
        Decision {
            category: ClassificationCategory::Polytrauma,
            justification: "Paciente deu entrada no hospital por trauma/acidente e tem múltiplos procedimentos.",
        }
    } else if multiple && signals.same_disease {
        Decision {
            category: ClassificationCategory::Sequential,
            justification: "Múltiplos procedimentos para tratar a mesma doença.",
        }
    } else if multiple {
        Decision {
            category: ClassificationCategory::Multiple,
            justification: "Múltiplos procedimentos para tratar doenças diferentes.",
        }
    } else {
        Decision {
            category: ClassificationCategory::SingleProcedure,
            justification: "Apenas um procedimento cirúrgico identificado ou paciente com trauma e apenas um procedimento.",
        }
    }
}

/// Classify an accumulator in place and hand it back.
///
/// Never fails: if the signals cannot be derived the result is marked
/// `não_classificado` with the reason in the justification.
pub fn classify(mut acc: ResultAccumulator) -> ResultAccumulator {
    match ClassificationSignals::from_accumulator(&acc) {
        Ok(signals) => {
            let decision = decide(signals);
            info!(
                classification = %decision.category,
                trauma_entry = signals.trauma_entry,
                procedure_count = signals.procedure_count,
                same_disease = signals.same_disease,
                "final classification"
            );
            acc.classification = Some(decision.category);
            acc.classification_justification = Some(decision.justification.to_string());
            acc.classification_details = Some(signals.details());
            acc.trace("classificacao_final", decision.category.as_str());
        }
        Err(e) => {
            tracing::error!(error = %e, "final classification failed");
            acc.classification = Some(ClassificationCategory::Unclassified);
            acc.classification_justification =
                Some(format!("Erro durante a classificação: {e}"));
            acc.classification_error = Some(e.to_string());
            acc.trace("classificacao_final", ClassificationCategory::Unclassified.as_str());
        }
    }
    acc
}
