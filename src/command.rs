//! Control and query commands (ioctl)
//!
//! Commands share the banded numbering of [`crate::error`]: the common band
//! holds callback registration, and each [`Layer`] owns the hundred codes
//! starting at its base. Every command reads or writes exactly one kind of
//! [`Value`]. A (command, value kind) pair never changes once published,
//! because drivers and callers are built separately.

use core::fmt;

use crate::error::Error;
use crate::event::{CallbackArg, RxCallback, TxCallback};
use crate::layer::{Layer, BAND_SIZE};

/// I/O control command code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command(u16);

impl Command {
    /// No operation
    pub const NONE: Command = Command(0);
    /// Register the transmission completion callback, [`Value::TxCallback`]
    pub const SET_TX_CALLBACK: Command = Command(1);
    /// Register the context passed to the completion callback, [`Value::CallbackArg`]
    pub const SET_TX_CALLBACK_ARG: Command = Command(2);
    /// Register the reception callback, [`Value::RxCallback`]
    pub const SET_RX_CALLBACK: Command = Command(3);

    /// Set the MAC data sequence number, [`Value::U8`]
    pub const MAC_SET_DSN: Command = Command(201);

    /// Set transmit power in dBm, [`Value::I8`]
    pub const RF_SET_TX_POWER: Command = Command(501);
    /// Get transmit power in dBm, [`Value::I8`]
    pub const RF_GET_TX_POWER: Command = Command(502);
    /// Set receiver sensitivity in dBm, [`Value::I8`]
    pub const RF_SET_SENSITIVITY: Command = Command(503);
    /// Get receiver sensitivity in dBm, [`Value::I8`]
    pub const RF_GET_SENSITIVITY: Command = Command(504);
    /// Read the current RSSI in dBm, [`Value::I16`]
    pub const RF_GET_RSSI: Command = Command(505);
    /// Run a clear channel assessment, `true` when clear, [`Value::Bool`]
    pub const RF_GET_CCA: Command = Command(506);
    /// Enable or disable antenna diversity, [`Value::Bool`]
    pub const RF_SET_ANT_DIV: Command = Command(507);
    /// Drive the external RF switch, [`Value::Bool`]
    pub const RF_SWITCH: Command = Command(508);
    /// Query whether a frame is being received, [`Value::Bool`]
    pub const RF_IS_RX_BUSY: Command = Command(509);
    /// Query whether a frame is being transmitted, [`Value::Bool`]
    pub const RF_IS_TX_BUSY: Command = Command(510);
    /// Set the sync word, [`Value::U32`]
    pub const RF_SET_SYNC: Command = Command(511);
    /// Get the sync word, [`Value::U32`]
    pub const RF_GET_SYNC: Command = Command(512);

    /// Command from its raw code
    pub const fn from_code(code: u16) -> Self {
        Command(code)
    }

    /// Command at `offset` inside `layer`'s band
    ///
    /// Offset 0 is the band placeholder and offsets past the band width would
    /// spill into the next layer, so both are rejected.
    pub const fn extension(layer: Layer, offset: u16) -> Result<Self, Error> {
        if offset == 0 || offset >= BAND_SIZE {
            return Err(Error::InvalidArgument);
        }
        Ok(Command(layer.base() + offset))
    }

    /// Raw code
    pub const fn code(self) -> u16 {
        self.0
    }

    /// Band owner, `None` for the common band
    pub const fn layer(self) -> Option<Layer> {
        Layer::of_code(self.0)
    }

    /// True for the commands every driver shares
    pub const fn is_common(self) -> bool {
        self.0 < BAND_SIZE
    }

    /// Kind of value the command reads or writes, `None` when the code is not
    /// a published command
    pub const fn value_kind(self) -> Option<ValueKind> {
        let kind = match self {
            Command::NONE => ValueKind::None,
            Command::SET_TX_CALLBACK => ValueKind::TxCallback,
            Command::SET_TX_CALLBACK_ARG => ValueKind::CallbackArg,
            Command::SET_RX_CALLBACK => ValueKind::RxCallback,
            Command::MAC_SET_DSN => ValueKind::U8,
            Command::RF_SET_TX_POWER
            | Command::RF_GET_TX_POWER
            | Command::RF_SET_SENSITIVITY
            | Command::RF_GET_SENSITIVITY => ValueKind::I8,
            Command::RF_GET_RSSI => ValueKind::I16,
            Command::RF_GET_CCA
            | Command::RF_SET_ANT_DIV
            | Command::RF_SWITCH
            | Command::RF_IS_RX_BUSY
            | Command::RF_IS_TX_BUSY => ValueKind::Bool,
            Command::RF_SET_SYNC | Command::RF_GET_SYNC => ValueKind::U32,
            _ => return None,
        };
        Some(kind)
    }

    /// Name of a published command
    pub const fn name(self) -> Option<&'static str> {
        let name = match self {
            Command::NONE => "NONE",
            Command::SET_TX_CALLBACK => "SET_TX_CALLBACK",
            Command::SET_TX_CALLBACK_ARG => "SET_TX_CALLBACK_ARG",
            Command::SET_RX_CALLBACK => "SET_RX_CALLBACK",
            Command::MAC_SET_DSN => "MAC_SET_DSN",
            Command::RF_SET_TX_POWER => "RF_SET_TX_POWER",
            Command::RF_GET_TX_POWER => "RF_GET_TX_POWER",
            Command::RF_SET_SENSITIVITY => "RF_SET_SENSITIVITY",
            Command::RF_GET_SENSITIVITY => "RF_GET_SENSITIVITY",
            Command::RF_GET_RSSI => "RF_GET_RSSI",
            Command::RF_GET_CCA => "RF_GET_CCA",
            Command::RF_SET_ANT_DIV => "RF_SET_ANT_DIV",
            Command::RF_SWITCH => "RF_SWITCH",
            Command::RF_IS_RX_BUSY => "RF_IS_RX_BUSY",
            Command::RF_IS_TX_BUSY => "RF_IS_TX_BUSY",
            Command::RF_SET_SYNC => "RF_SET_SYNC",
            Command::RF_GET_SYNC => "RF_GET_SYNC",
            _ => return None,
        };
        Some(name)
    }

    /// Check that `value` has the kind this command reads or writes
    ///
    /// Unpublished codes yield `CmdUnsupported`, a value of the wrong kind
    /// yields `InvalidArgument`. Getters are checked too, because the pair is
    /// fixed for both directions.
    pub fn check_value(self, value: &Value) -> Result<(), Error> {
        match self.value_kind() {
            None => Err(Error::CmdUnsupported),
            Some(kind) if kind == value.kind() => Ok(()),
            Some(_) => Err(Error::InvalidArgument),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({})", name, self.0),
            None => write!(f, "CMD({})", self.0),
        }
    }
}

/// Kind of value a command carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueKind {
    /// No value
    None,
    /// Transmission completion callback
    TxCallback,
    /// Reception callback
    RxCallback,
    /// Callback context
    CallbackArg,
    /// Boolean flag
    Bool,
    /// Unsigned byte
    U8,
    /// Signed byte
    I8,
    /// Signed 16-bit value
    I16,
    /// Unsigned 32-bit value
    U32,
}

/// Value read or written by a command
#[derive(Debug, Clone, Copy)]
pub enum Value {
    /// No value
    None,
    /// Transmission completion callback, `None` to unregister
    TxCallback(Option<TxCallback>),
    /// Reception callback, `None` to unregister
    RxCallback(Option<RxCallback>),
    /// Callback context
    CallbackArg(CallbackArg),
    /// Boolean flag
    Bool(bool),
    /// Unsigned byte
    U8(u8),
    /// Signed byte
    I8(i8),
    /// Signed 16-bit value
    I16(i16),
    /// Unsigned 32-bit value
    U32(u32),
}

impl Value {
    /// Kind of the value
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::None,
            Value::TxCallback(_) => ValueKind::TxCallback,
            Value::RxCallback(_) => ValueKind::RxCallback,
            Value::CallbackArg(_) => ValueKind::CallbackArg,
            Value::Bool(_) => ValueKind::Bool,
            Value::U8(_) => ValueKind::U8,
            Value::I8(_) => ValueKind::I8,
            Value::I16(_) => ValueKind::I16,
            Value::U32(_) => ValueKind::U32,
        }
    }
}
