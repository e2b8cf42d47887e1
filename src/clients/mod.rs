//! Domain clients over the generic actor clients. Cross-aggregate workflows
//! (rider reservation, replacement orders, settlement projection) live here.

mod macros;
pub mod order_client;
pub mod rider_client;
pub mod settlement_client;

pub use order_client::*;
pub use rider_client::*;
pub use settlement_client::*;
