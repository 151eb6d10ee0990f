use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Names one of the yes/no checks. The wire field carrying the answer is
/// different per check, everything else is shared.
pub trait VerificationKind: 'static {
    /// JSON field holding the boolean answer.
    const FIELD: &'static str;
    /// Human-readable name used in logs.
    const LABEL: &'static str;
}

/// Did the patient enter the hospital because of trauma or an accident?
#[derive(Debug, Clone, Copy)]
pub struct TraumaEntry;

impl VerificationKind for TraumaEntry {
    const FIELD: &'static str = "entrada_por_trauma";
    const LABEL: &'static str = "trauma entry";
}

/// Do all procedures treat the same disease?
#[derive(Debug, Clone, Copy)]
pub struct SameDisease;

impl VerificationKind for SameDisease {
    const FIELD: &'static str = "mesma_doenca";
    const LABEL: &'static str = "same disease";
}

/// Was anatomical tissue removed from the patient?
#[derive(Debug, Clone, Copy)]
pub struct SpecimenRemoval;

impl VerificationKind for SpecimenRemoval {
    const FIELD: &'static str = "retirada_peca_anatomica";
    const LABEL: &'static str = "specimen removal";
}

/// Where a verification answer came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationSource {
    #[default]
    #[serde(rename = "modelo")]
    Model,
    #[serde(rename = "palavras_chave")]
    KeywordFallback,
    #[serde(rename = "diagnosticos")]
    DiagnosisFallback,
    #[serde(rename = "procedimento_unico")]
    SingleProcedure,
}

impl VerificationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "modelo",
            Self::KeywordFallback => "palavras_chave",
            Self::DiagnosisFallback => "diagnosticos",
            Self::SingleProcedure => "procedimento_unico",
        }
    }
}

/// A boolean answer plus the reasoning behind it.
pub struct Verification<K: VerificationKind> {
    pub value: bool,
    pub justification: String,
    pub source: VerificationSource,
    kind: PhantomData<fn() -> K>,
}

pub type TraumaVerification = Verification<TraumaEntry>;
pub type SameDiseaseVerification = Verification<SameDisease>;
pub type SpecimenIdentification = Verification<SpecimenRemoval>;

impl<K: VerificationKind> Verification<K> {
    pub fn new(value: bool, justification: impl Into<String>, source: VerificationSource) -> Self {
        Self {
            value,
            justification: justification.into(),
            source,
            kind: PhantomData,
        }
    }

    pub fn from_model(value: bool, justification: impl Into<String>) -> Self {
        Self::new(value, justification, VerificationSource::Model)
    }

    pub fn field() -> &'static str {
        K::FIELD
    }

    pub fn label() -> &'static str {
        K::LABEL
    }
}

impl<K: VerificationKind> Clone for Verification<K> {
    fn clone(&self) -> Self {
        Self::new(self.value, self.justification.clone(), self.source)
    }
}

impl<K: VerificationKind> PartialEq for Verification<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.justification == other.justification
            && self.source == other.source
    }
}

impl<K: VerificationKind> fmt::Debug for Verification<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verification")
            .field("kind", &K::LABEL)
            .field("value", &self.value)
            .field("justification", &self.justification)
            .field("source", &self.source)
            .finish()
    }
}

impl<K: VerificationKind> Serialize for Verification<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(K::FIELD, &self.value)?;
        map.serialize_entry("justificativa", &self.justification)?;
        map.serialize_entry("origem", &self.source)?;
        map.end()
    }
}

impl<'de, K: VerificationKind> Deserialize<'de> for Verification<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;

        let value = match map.remove(K::FIELD) {
            Some(serde_json::Value::Bool(b)) => b,
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "field `{}` must be a boolean, got {other}",
                    K::FIELD
                )));
            }
            None => return Err(de::Error::missing_field(K::FIELD)),
        };

        let justification = match map.remove("justificativa") {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        let source = match map.remove("origem") {
            Some(v) => serde_json::from_value(v).map_err(de::Error::custom)?,
            None => VerificationSource::Model,
        };

        Ok(Self::new(value, justification, source))
    }
}
