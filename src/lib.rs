//! Driver abstraction core of an embedded wireless network stack
//!
//! This crate defines the contract shared by every link-layer module of a
//! low-power wireless stack, and the machinery that composes those modules
//! into one stack. The modules are logical link control, medium access
//! control, physical layer, low-power radio (duty cycling) and the RF
//! transceiver. Any implementation that satisfies [`Driver`] can occupy a
//! slot, and swapping one does not touch its neighbours.
//!
//! # Features
//! - One driver contract for every layer: lifecycle, data path and control
//! - Banded outcome and command codes with room for per-layer extensions
//! - Asynchronous completion through callbacks delivered as queued events
//! - Static stack composition with pass-through null drivers for empty slots
//! - Process-wide last-error mirror for diagnostics
//! - A chip-agnostic [`Radio`](radio::Radio) HAL trait and an RF driver built on it
//! - No unsafe code
//!
//! # Example
//! ```no_run
//! use netstk::{
//!     command::{Command, Value},
//!     config::RfConfig,
//!     error::Outcome,
//!     layer::Layer,
//!     radio::RfDriver,
//!     stack::Netstack,
//! };
//!
//! fn tx_done(arg: usize, outcome: Outcome) {
//!     // frame `arg` left the radio with `outcome`
//!     let _ = (arg, outcome);
//! }
//!
//! # fn run<R: netstk::radio::Radio>(radio: R) -> Outcome {
//! let mut stack = Netstack::builder()
//!     .rf(RfDriver::new(radio, RfConfig::default()))
//!     .build();
//!
//! stack.init()?;
//! stack.on_all()?;
//! stack.ioctl(Layer::Llc, Command::SET_TX_CALLBACK, &mut Value::TxCallback(Some(tx_done)))?;
//!
//! stack.send(b"Hello, radio!")?;
//! loop {
//!     stack.process()?;
//!     stack.dispatch();
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

/// Command codes and values for the control channel
pub mod command;

/// Stack-wide constants and driver configuration
pub mod config;

/// Process-wide last-error mirror
pub mod diag;

/// Module driver contract
pub mod driver;

/// Outcome codes
pub mod error;

/// Asynchronous completion events
pub mod event;

/// Stack layers and numeric bands
pub mod layer;

/// Pass-through driver
pub mod null;

/// Radio hardware abstraction layer
pub mod radio;

/// Stack composition
pub mod stack;

pub use command::{Command, Value};
pub use driver::{Driver, Link};
pub use error::{Error, Outcome};
pub use layer::Layer;
pub use null::NullDriver;
pub use stack::{Netstack, StackBuilder};
