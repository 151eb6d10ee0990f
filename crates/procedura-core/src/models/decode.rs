use serde::{Deserialize, Serialize};

use super::procedure::Procedure;

/// A procedure mapped to its billing/reference code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedProcedure {
    #[serde(rename = "procedimento")]
    pub procedure: Procedure,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "tratar_cancer", default)]
    pub treats_current_cancer: bool,
}

impl DecodedProcedure {
    /// Placeholder returned by the complete flow when it cannot decode.
    pub fn placeholder(message: impl Into<String>) -> Self {
        Self {
            procedure: Procedure::new(message, ""),
            code: "N/A".to_string(),
            treats_current_cancer: false,
        }
    }
}

/// Shape of the decoding inference step's answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoding {
    #[serde(rename = "procedimentos_decodificados")]
    pub procedures: Vec<DecodedProcedure>,
}
