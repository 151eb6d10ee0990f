use std::fmt;

use serde::{Deserialize, Serialize};

/// Final billing/clinical category of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassificationCategory {
    /// Entered by trauma and underwent more than one procedure.
    #[serde(rename = "politrauma")]
    Polytrauma,
    /// Several procedures treating the same disease.
    #[serde(rename = "sequencial")]
    Sequential,
    /// Several procedures treating different diseases.
    #[serde(rename = "multipla")]
    Multiple,
    #[serde(rename = "procedimento_isolado")]
    SingleProcedure,
    #[serde(rename = "não_classificado")]
    Unclassified,
}

impl ClassificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polytrauma => "politrauma",
            Self::Sequential => "sequencial",
            Self::Multiple => "multipla",
            Self::SingleProcedure => "procedimento_isolado",
            Self::Unclassified => "não_classificado",
        }
    }
}

impl fmt::Display for ClassificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signals a classification was derived from, kept for transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationDetails {
    pub entrada_por_trauma: bool,
    pub multiplos_procedimentos: bool,
    pub mesma_doenca: bool,
    pub numero_procedimentos: usize,
}
