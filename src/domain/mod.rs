pub mod order;
pub mod rider;
pub mod settlement;

pub use order::*;
pub use rider::*;
pub use settlement::*;
