//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - CSV exports: predictions, synthetic pitches (`export`)
//! - models JSON read/write (`models`)

pub mod export;
pub mod ingest;
pub mod models;

pub use export::*;
pub use ingest::*;
pub use models::*;
