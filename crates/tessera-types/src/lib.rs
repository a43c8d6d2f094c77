//! Shared domain types for Tessera.
//!
//! This crate contains the types passed between the orchestrator core, its
//! infrastructure adapters, and the transport layer: jobs and node states,
//! the submitted graph and its translated spec, the stage runner contract,
//! status DTOs, the static node catalog, configuration, and error enums.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod job;
pub mod stage;
pub mod status;
