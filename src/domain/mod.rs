//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - pitch inputs and their labeled/projected forms (`PitchRecord`, `LabeledPitch`, `AnalysisRecord`)
//! - model identities (`ModelKind`, `Predictor`)
//! - fit outputs and the saved models file (`FittedModel`, `ModelsFile`, etc.)

pub mod types;

pub use types::*;
