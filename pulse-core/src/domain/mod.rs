//! Core domain types
//!
//! These types are shared between the fetch client (which produces
//! outcomes) and the server (which runs jobs and renders reports).

pub mod outcome;
pub mod report;
pub mod target;
