//! minda-bedrock
//!
//! Generative model and embedding clients over Amazon Bedrock, each behind a
//! small trait so the pipeline can be driven by deterministic fakes in tests.

pub mod client;
pub mod embed;
pub mod error;
pub mod generate;
pub mod tokens;
