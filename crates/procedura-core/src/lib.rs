//! procedura-core
//!
//! Pure domain types, the classification rule table, and the collaborator
//! traits the flows consume. No AWS SDK or HTTP dependency; this is the
//! shared vocabulary of the Procedura system.

pub mod accumulator;
pub mod classify;
pub mod error;
pub mod fallback;
pub mod format;
pub mod gateway;
pub mod models;
