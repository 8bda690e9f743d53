//! Logistic model evaluation.
//!
//! Models are implemented as small, pure functions so that fitting and
//! reporting code can stay generic over `ModelKind`.

pub mod model;

pub use model::*;
