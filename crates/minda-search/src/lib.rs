//! minda-search
//!
//! Nearest-neighbour retrieval over the knowledge corpus: the vector store
//! seam, an in-memory cosine store loaded from an S3 snapshot, and the
//! retrieval service with category fan-out.

pub mod corpus;
pub mod error;
pub mod retrieval;
pub mod store;
