//! `whiff-model` library crate.
//!
//! The binary (`whiff`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the labeling and fitting modules are reusable from notebooks or other tools
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
