//! Radio transceiver abstraction and the RF slot driver built on it

/// Transceiver HAL trait
pub mod traits;

mod driver;

pub use driver::{NoSwitch, RfDriver};
pub use traits::Radio;
