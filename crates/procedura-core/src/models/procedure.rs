use serde::{Deserialize, Serialize};

/// A single surgical or medical intervention identified in a narrative.
///
/// Procedures have no identity of their own; they are addressed by their
/// position in the sequence that produced them and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    #[serde(rename = "procedimento")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(
        rename = "diagnostico",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub diagnosis: Option<String>,
}

impl Procedure {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            diagnosis: None,
        }
    }

    pub fn with_diagnosis(mut self, diagnosis: impl Into<String>) -> Self {
        self.diagnosis = Some(diagnosis.into());
        self
    }

    /// The diagnosis, if present and not blank.
    pub fn diagnosis(&self) -> Option<&str> {
        self.diagnosis
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Procedures extracted from a surgical description, or the reconciled set
/// that supersedes it when a pathology report is available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureExtraction {
    #[serde(rename = "procedimentos_identificados")]
    pub procedures: Vec<Procedure>,
}

impl ProcedureExtraction {
    pub fn new(procedures: Vec<Procedure>) -> Self {
        Self { procedures }
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}

/// A procedure as described by a pathology report, with the specimen it
/// produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathologyFinding {
    #[serde(flatten)]
    pub procedure: Procedure,
    #[serde(
        rename = "peca_anatomica",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub specimen: Option<String>,
}

/// Procedures extracted from a pathology report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathologyExtraction {
    #[serde(rename = "procedimentos_laudo")]
    pub findings: Vec<PathologyFinding>,
}

impl PathologyExtraction {
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}
