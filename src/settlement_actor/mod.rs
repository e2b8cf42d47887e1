//! Settlement-specific domain logic: the pending/paid/overdue lifecycle of a
//! nightly per-seller due. The breakdown itself is computed by
//! [`crate::domain::settlement::compute_breakdown`].

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
