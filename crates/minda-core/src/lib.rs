//! minda-core
//!
//! Pure domain types for the Minda screening pipeline: risk levels, score
//! results, knowledge articles, the structured insight contract, and chat
//! messages. No AWS dependency; this is the shared vocabulary of the system.

pub mod error;
pub mod models;
