use serde::{Deserialize, Serialize};

/// A reference procedure returned by a nearest-neighbour lookup.
///
/// Field names follow the columns of the reference table behind the
/// `match_procedimentos` function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRecord {
    #[serde(rename = "codigo_procedimento")]
    pub code: String,
    #[serde(rename = "nome_procedimento", default)]
    pub name: String,
    #[serde(rename = "descricao_procedimento", default)]
    pub description: String,
    #[serde(
        rename = "similaridade",
        alias = "similarity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub similarity: Option<f32>,
}

impl SimilarityRecord {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: description.into(),
            similarity: None,
        }
    }
}
