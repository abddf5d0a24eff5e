//! Pulse Core
//!
//! Core types for the Pulse scheduled fetch service.
//!
//! This crate contains:
//! - Domain types: targets, per-target outcomes and job reports
//! - Errors: the startup configuration error taxonomy
//!
//! Nothing in here performs I/O. The client crate turns targets into
//! outcomes and the server crate assembles outcomes into reports.

pub mod domain;
pub mod error;

pub use error::ConfigError;
