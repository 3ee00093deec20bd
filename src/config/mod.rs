//! Stack-wide constants and driver configuration
//!
//! This module contains:
//! - Buffer and queue dimensions shared by every driver
//! - Null driver configuration
//! - RF driver configuration

/// RF driver configuration
pub mod rf;

pub use rf::RfConfig;

/// Version of the driver contract, format `Vx.yy.zz`
pub const NETSTK_VERSION: u32 = 0x00_00_01;

/// Device identifier type
pub type DevId = u16;

/// Largest frame any driver of this crate can hold
pub const MAX_FRAME_LEN: usize = 256;

/// Frames an RF driver can queue before `send` reports busy
pub const TX_QUEUE_LEN: usize = 4;

/// Capacity of the stack's event queue
pub const EVENT_QUEUE_LEN: usize = 16;

/// Null driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullConfig {
    /// Longest frame the driver passes through
    pub max_frame_len: usize,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            max_frame_len: MAX_FRAME_LEN,
        }
    }
}
