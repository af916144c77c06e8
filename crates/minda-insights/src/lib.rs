//! minda-insights
//!
//! The risk triage and insight pipeline: crisis classification, context
//! composition, model orchestration with schema validation, and the
//! deterministic fallback that guarantees a safe result when the model path
//! fails.

pub mod config;
pub mod context;
pub mod crisis;
pub mod error;
pub mod fallback;
pub mod hotlines;
pub mod orchestrator;
pub mod prompts;
pub mod validate;
