//! procedura-flows
//!
//! Orchestration of the classification pipeline: the step runners that wrap
//! each inference call, the guarded flow registry, the branch flows, and the
//! top-level router with its fallback ladder.

pub mod branches;
pub mod config;
pub mod error;
pub mod input;
pub mod prompts;
pub mod registry;
pub mod router;
pub mod steps;

pub use config::{ProcedureFlows, configure_registry, registry};
pub use error::FlowError;
pub use input::FlowInput;
pub use prompts::PromptSet;
pub use registry::FlowRegistry;
pub use router::TopLevelRouter;
pub use steps::StepRunner;
