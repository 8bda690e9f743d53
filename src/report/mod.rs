//! Reporting: per-row predictions, descriptive summaries, and terminal formatting.

pub mod format;
pub mod predictions;
pub mod summary;

pub use format::*;
pub use predictions::*;
pub use summary::*;
