//! System prompts for each inference step.
//!
//! Every step has a built-in prompt. A deployment can replace any of them by
//! dropping `<stem>.txt` into a prompts directory; steps without a file keep
//! the built-in text.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use procedura_core::gateway::OutputShape;
use tracing::info;

const EXTRACTION: &str = "\
Você é um auditor médico especializado em faturamento hospitalar. \
Leia a descrição cirúrgica e identifique todos os procedimentos cirúrgicos \
efetivamente realizados. \
Para cada procedimento informe o nome técnico, uma descrição curta do que foi feito e, \
quando o texto permitir, o diagnóstico que motivou o procedimento. \
Não liste exames pré-operatórios, anestesia ou cuidados de rotina como procedimentos. \
Não invente procedimentos que não estejam descritos no texto.";

const PATHOLOGY_EXTRACTION: &str = "\
Você é um patologista auxiliando a auditoria de contas hospitalares. \
Leia o laudo anatomopatológico e identifique os procedimentos que originaram cada peça examinada. \
Para cada item informe o procedimento, uma descrição curta, a peça anatômica recebida \
e o diagnóstico anatomopatológico conclusivo. \
Use apenas informações presentes no laudo.";

const RECONCILIATION: &str = "\
Você é um auditor médico. Compare os procedimentos extraídos da descrição cirúrgica com os \
procedimentos extraídos do laudo anatomopatológico. \
Corrija nomes imprecisos, complemente procedimentos que aparecem apenas no laudo e remova \
duplicidades, usando os documentos similares da tabela de referência como apoio para a \
nomenclatura correta. \
Quando houver diagnóstico no laudo, associe-o ao procedimento correspondente. \
Retorne a lista final de procedimentos realizados.";

const DECODING: &str = "\
Você é um codificador de procedimentos médicos. Para cada procedimento verificado, escolha o \
código mais adequado entre os documentos similares da tabela de referência. \
Informe também se o procedimento tem como finalidade tratar um câncer atual do paciente. \
Se nenhum documento similar corresponder ao procedimento, use o código \"N/A\".";

const SPECIMEN_IDENTIFICATION: &str = "\
Você é um auditor médico. Determine se, durante a cirurgia descrita, houve retirada de peça \
anatômica do paciente (órgão, tecido, segmento ou fragmento enviado ou não para exame \
anatomopatológico). \
Responda com um valor booleano e uma justificativa curta baseada no texto.";

const TRAUMA_VERIFICATION: &str = "\
Você é um auditor médico. Determine se o paciente deu entrada no hospital em decorrência de \
trauma ou acidente (queda, colisão, atropelamento, ferimento por arma, queimadura e similares). \
Procedimentos eletivos ou motivados por doença clínica não caracterizam trauma. \
Responda com um valor booleano e uma justificativa curta baseada no texto.";

const SAME_DISEASE_VERIFICATION: &str = "\
Você é um auditor médico. Determine se os procedimentos listados foram realizados para tratar \
a mesma doença ou condição de base, considerando os diagnósticos informados. \
Procedimentos complementares de um mesmo tratamento contam como mesma doença. \
Responda com um valor booleano e uma justificativa curta.";

/// File stem of the override for a step's prompt.
pub fn file_stem(shape: OutputShape) -> &'static str {
    match shape {
        OutputShape::ProcedureExtraction => "system_extracao_procedimentos",
        OutputShape::PathologyExtraction => "system_extracao_procedimentos_laudo",
        OutputShape::Reconciliation => "system_comparacao_procedimentos",
        OutputShape::Decoding => "system_decodificacao",
        OutputShape::SpecimenIdentification => "system_identificacao_peca_anatomica",
        OutputShape::TraumaVerification => "system_verificacao_trauma",
        OutputShape::SameDiseaseVerification => "system_verificacao_mesma_doenca",
    }
}

fn builtin(shape: OutputShape) -> &'static str {
    match shape {
        OutputShape::ProcedureExtraction => EXTRACTION,
        OutputShape::PathologyExtraction => PATHOLOGY_EXTRACTION,
        OutputShape::Reconciliation => RECONCILIATION,
        OutputShape::Decoding => DECODING,
        OutputShape::SpecimenIdentification => SPECIMEN_IDENTIFICATION,
        OutputShape::TraumaVerification => TRAUMA_VERIFICATION,
        OutputShape::SameDiseaseVerification => SAME_DISEASE_VERIFICATION,
    }
}

const ALL_SHAPES: [OutputShape; 7] = [
    OutputShape::ProcedureExtraction,
    OutputShape::PathologyExtraction,
    OutputShape::Reconciliation,
    OutputShape::Decoding,
    OutputShape::SpecimenIdentification,
    OutputShape::TraumaVerification,
    OutputShape::SameDiseaseVerification,
];

#[derive(Debug, Clone, Default)]
pub struct PromptSet {
    overrides: HashMap<OutputShape, String>,
}

impl PromptSet {
    /// Only the built-in prompts.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Built-in prompts, replaced by any `<stem>.txt` found in `dir`.
    /// Missing or blank files are ignored; other read errors are returned.
    pub fn load(dir: &Path) -> std::io::Result<Self> {
        let mut set = Self::default();
        for shape in ALL_SHAPES {
            let path = dir.join(format!("{}.txt", file_stem(shape)));
            match std::fs::read_to_string(&path) {
                Ok(text) if !text.trim().is_empty() => {
                    info!(path = %path.display(), step = shape.name(), "prompt override loaded");
                    set.overrides.insert(shape, text.trim().to_string());
                }
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(set)
    }

    pub fn with_override(mut self, shape: OutputShape, text: impl Into<String>) -> Self {
        self.overrides.insert(shape, text.into());
        self
    }

    pub fn get(&self, shape: OutputShape) -> &str {
        self.overrides
            .get(&shape)
            .map(String::as_str)
            .unwrap_or_else(|| builtin(shape))
    }

    pub fn is_overridden(&self, shape: OutputShape) -> bool {
        self.overrides.contains_key(&shape)
    }
}
