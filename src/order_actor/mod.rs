//! Order-specific domain logic: the status state machine, rider association,
//! payment verification and the complaint sub-machine.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
