//! AWS-oriented adapters and handlers for the bucket pipeline functions.
//!
//! This crate owns runtime integration details (Lambda handlers, the S3
//! adapter, environment configuration and log setup). Domain rules live in
//! `bucket_pipeline_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
