//! Shared bucket pipeline domain primitives.
//!
//! This crate owns notification parsing, object key rules, processed-object
//! content and the result/summary contracts returned by both functions. It
//! intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod contract;
pub mod notification;
pub mod processing;
pub mod storage_keys;
