//! Mathematical utilities: logistic transforms and weighted least squares.

pub mod logistic;
pub mod ols;

pub use logistic::*;
pub use ols::*;
