//! Plain-text renderings of domain records for inclusion in prompts.

use crate::models::procedure::{PathologyFinding, Procedure};
use crate::models::similarity::SimilarityRecord;

/// `1. name: description` per procedure, for the reconciliation prompt.
pub fn surgical_procedures(procedures: &[Procedure]) -> String {
    if procedures.is_empty() {
        return "Nenhum procedimento identificado na descrição cirúrgica.".to_string();
    }

    procedures
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {}: {}", i + 1, p.name, p.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pathology findings with their specimen and diagnosis lines.
pub fn pathology_findings(findings: &[PathologyFinding]) -> String {
    if findings.is_empty() {
        return "Nenhum procedimento identificado no laudo anatomopatológico.".to_string();
    }

    findings
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let mut line = numbered_procedure(i, &f.procedure);
            if let Some(specimen) = f.specimen.as_deref().filter(|s| !s.trim().is_empty()) {
                line.push_str(&format!("\n   Peça anatômica: {specimen}"));
            }
            if let Some(diagnosis) = f.procedure.diagnosis() {
                line.push_str(&format!("\n   Diagnóstico: {diagnosis}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Procedures with descriptions and diagnoses, for the same-disease and
/// decoding prompts.
pub fn procedures_with_diagnoses(procedures: &[Procedure]) -> String {
    if procedures.is_empty() {
        return "Nenhum procedimento identificado.".to_string();
    }

    procedures
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut line = numbered_procedure(i, p);
            if let Some(diagnosis) = p.diagnosis() {
                line.push_str(&format!("\n   Diagnóstico: {diagnosis}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reference records as `Código/Nome/Descrição` blocks.
pub fn similarity_records(records: &[SimilarityRecord]) -> String {
    if records.is_empty() {
        return "Nenhum documento similar encontrado.".to_string();
    }

    records
        .iter()
        .map(|r| {
            format!(
                "Código: {}\nNome: {}\nDescrição: {}\n",
                or_na(&r.code),
                or_na(&r.name),
                or_na(&r.description)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn numbered_procedure(index: usize, procedure: &Procedure) -> String {
    let mut line = format!("{}. {}", index + 1, procedure.name);
    if !procedure.description.trim().is_empty() {
        line.push_str(&format!(": {}", procedure.description));
    }
    line
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() { "N/A" } else { value }
}
