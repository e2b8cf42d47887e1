//! Rider-specific domain logic: availability, reservation for an order, and
//! delivery completion.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
