//! Blocking HTTP transport for the `/_snapshot` API
//!
//! Implements `esnap_core::SnapshotApi` on top of `reqwest::blocking`,
//! applying the per-operation timeouts from the configuration.

pub mod client;
pub mod errors;

pub use client::EsSnapshotClient;
