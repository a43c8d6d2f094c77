//! HTTP transport for the orchestrator service.
//!
//! JSON request/response for the unary calls, Server-Sent Events for
//! `StreamStatus`.

pub mod error;
pub mod handlers;
pub mod router;
