//! Logistic model fitting.
//!
//! Responsibilities:
//!
//! - fit one model by IRLS with per-model row filtering (`irls`)
//! - fit the V / S / C suite independently (`suite`)
//! - solve the 50% decision boundary of a univariate fit (`boundary`)

pub mod boundary;
pub mod irls;
pub mod suite;

pub use boundary::*;
pub use irls::*;
pub use suite::*;
