//! Plotting: terminal ASCII plots and SVG chart files.

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;
