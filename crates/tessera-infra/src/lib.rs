//! Infrastructure layer for Tessera.
//!
//! Contains the implementation of the `StageRunner` port defined in
//! `tessera-core` (an HTTP client for the stage runner) and the
//! `config.toml` loader.

pub mod config;
pub mod stage;
