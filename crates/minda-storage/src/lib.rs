//! minda-storage
//!
//! Read-only S3 access for corpus snapshots. Thin wrapper around the AWS S3 SDK.

pub mod client;
pub mod error;
pub mod objects;
