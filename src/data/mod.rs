//! Dataset preparation: whiff labeling, analysis projection, synthetic samples.

pub mod label;
pub mod sample;

pub use label::*;
pub use sample::*;
