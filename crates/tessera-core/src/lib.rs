//! Orchestration core for Tessera.
//!
//! This crate owns the job lifecycle: translating submitted graphs into a
//! single stage request, dispatching that request with bounded retries,
//! tracking per-job and per-node state, and serving status snapshots. It
//! defines the `StageRunner` port that the infrastructure layer
//! (tessera-infra) implements, and never performs network I/O itself.

pub mod orchestrator;
pub mod stage;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;
