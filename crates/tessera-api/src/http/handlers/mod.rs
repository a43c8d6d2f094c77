//! HTTP request handlers.

pub mod nodes;
pub mod workflow;
