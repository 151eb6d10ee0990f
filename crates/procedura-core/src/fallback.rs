//! Deterministic answers for the verification steps, used only when the
//! inference call behind them fails.

use std::collections::BTreeSet;

use tracing::info;

use crate::models::procedure::Procedure;
use crate::models::verification::{
    SameDiseaseVerification, TraumaVerification, Verification, VerificationSource,
};

/// Terms that indicate a trauma/accident admission. Matched as
/// case-insensitive substrings, in this order.
pub const TRAUMA_KEYWORDS: &[&str] = &[
    "trauma",
    "acidente",
    "queda",
    "colisão",
    "fratura",
    "politrauma",
    "atropelamento",
    "ferimento",
    "lesão traumática",
    "contusão",
    "traumatismo",
    "acidentado",
    "impacto",
    "explosão",
    "queimadura",
    "esmagamento",
    "perfuração",
    "laceração",
    "amputação traumática",
];

/// First trauma keyword found in `text`, if any.
pub fn find_trauma_keyword(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    TRAUMA_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| lowered.contains(keyword))
}

pub fn trauma_by_keywords(text: &str) -> TraumaVerification {
    match find_trauma_keyword(text) {
        Some(keyword) => {
            info!(keyword, "trauma entry identified by keyword");
            Verification::new(
                true,
                format!("Palavra-chave de trauma encontrada no texto: '{keyword}'."),
                VerificationSource::KeywordFallback,
            )
        }
        None => Verification::new(
            false,
            "Não foram encontradas evidências de trauma/acidente.",
            VerificationSource::KeywordFallback,
        ),
    }
}

/// Distinct, non-blank diagnoses across `procedures`.
pub fn distinct_diagnoses(procedures: &[Procedure]) -> BTreeSet<&str> {
    procedures.iter().filter_map(Procedure::diagnosis).collect()
}

/// Same-disease answer when at most one procedure exists.
pub fn single_procedure_same_disease() -> SameDiseaseVerification {
    Verification::new(
        true,
        "Apenas um procedimento identificado, considerado como mesma doença.",
        VerificationSource::SingleProcedure,
    )
}

/// Same disease iff there is at most one distinct diagnosis. No diagnosis
/// information at all also counts as the same disease.
pub fn same_disease_by_diagnoses(procedures: &[Procedure]) -> SameDiseaseVerification {
    if procedures.len() <= 1 {
        return single_procedure_same_disease();
    }

    let diagnoses = distinct_diagnoses(procedures);
    let same = diagnoses.len() <= 1;
    info!(same_disease = same, diagnoses = ?diagnoses, "same disease by diagnoses");

    let justification = match diagnoses.len() {
        0 => "Nenhum diagnóstico informado nos procedimentos.".to_string(),
        1 => "Todos os procedimentos compartilham o mesmo diagnóstico.".to_string(),
        n => format!("Foram encontrados {n} diagnósticos distintos."),
    };

    Verification::new(same, justification, VerificationSource::DiagnosisFallback)
}
