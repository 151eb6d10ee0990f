use procedura_core::accumulator::ResultAccumulator;
use uuid::Uuid;

use crate::steps::StepRunner;

/// Everything a registered flow needs, owned so that flows can run as
/// `'static` futures.
#[derive(Clone)]
pub struct FlowInput {
    pub runner: StepRunner,
    pub surgical_text: String,
    pub pathology_text: Option<String>,
    /// Results gathered before the flow was chosen. Flows write into this
    /// accumulator and hand it back.
    pub results: ResultAccumulator,
}

impl FlowInput {
    pub fn new(runner: StepRunner, surgical_text: impl Into<String>) -> Self {
        Self {
            runner,
            surgical_text: surgical_text.into(),
            pathology_text: None,
            results: ResultAccumulator::new(Uuid::new_v4()),
        }
    }

    /// Attach a pathology report. Blank reports count as absent.
    pub fn with_pathology(mut self, report: Option<String>) -> Self {
        self.pathology_text = report.filter(|r| !r.trim().is_empty());
        self
    }

    pub fn with_results(mut self, results: ResultAccumulator) -> Self {
        self.results = results;
        self
    }
}
