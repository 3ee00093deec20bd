//! Outcome codes shared by every layer of the stack
//!
//! An operation either succeeds (numeric code `0`) or fails with exactly one
//! [`Error`]. The numeric space is split into a common band and one band per
//! [`Layer`], so a layer can add its own failure reasons without colliding
//! with another layer.

use core::fmt;

use crate::layer::Layer;

/// Result of every driver operation
pub type Outcome = Result<(), Error>;

/// Numeric code of a successful outcome
pub const NONE: u16 = 0;

/// Low-power radio (duty cycling) failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum LprError {
    /// Frame type cannot be handled by the duty-cycling scheme
    UnsupportedFrame = 401,
    /// Broadcast ended on its last strobe
    BroadcastLastStrobe = 402,
    /// Broadcast strobe was not acknowledged
    BroadcastNoAck = 403,
    /// Destination address is not valid
    InvalidAddr = 404,
    /// Strobe collided with a transmission to the same destination
    TxCollisionSameDest = 405,
    /// Strobe collided with a transmission to another destination
    TxCollisionDiffDest = 406,
    /// Received acknowledgement is malformed
    InvalidAck = 407,
}

/// Radio transceiver failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum RfError {
    /// The transceiver failed to put the frame on air
    Send = 501,
}

/// Failure reason of a stack operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Driver is not initialized, or initialization failed
    Init,
    /// Resource is busy
    Busy,
    /// Frame exceeds the layer's maximum size
    BufOverflow,
    /// Argument is missing, empty or of the wrong kind
    InvalidArgument,
    /// Frame could not be parsed
    InvalidFrame,
    /// Transmission did not complete in time
    TxTimeout,
    /// Transmission was not acknowledged
    TxNoAck,
    /// Command is not recognized by the driver
    CmdUnsupported,
    /// Channel could not be acquired
    ChannelAccessFailure,
    /// Stack is unusable until reinitialized
    Fatal,
    /// Low-power radio failure
    Lpr(LprError),
    /// Radio transceiver failure
    Rf(RfError),
    /// Code inside a layer band with no name in this crate
    Layer(LayerCode),
    /// Code outside every known band
    Unrecognized(UnknownCode),
}

/// Unnamed code inside a layer band
///
/// Only [`from_code`] builds one, so the code is never `0` and never collides
/// with a named error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerCode {
    layer: Layer,
    code: u16,
}

impl LayerCode {
    /// Band owner
    pub const fn layer(&self) -> Layer {
        self.layer
    }

    /// Raw code
    pub const fn code(&self) -> u16 {
        self.code
    }
}

/// Code outside every band, built only by [`from_code`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownCode(u16);

impl UnknownCode {
    /// Raw code
    pub const fn code(&self) -> u16 {
        self.0
    }
}

impl Error {
    /// Numeric code of the error
    pub const fn code(&self) -> u16 {
        match *self {
            Error::Init => 1,
            Error::Busy => 2,
            Error::BufOverflow => 3,
            Error::InvalidArgument => 4,
            Error::InvalidFrame => 5,
            Error::TxTimeout => 6,
            Error::TxNoAck => 7,
            Error::CmdUnsupported => 8,
            Error::ChannelAccessFailure => 9,
            Error::Fatal => 10,
            Error::Lpr(e) => e as u16,
            Error::Rf(e) => e as u16,
            Error::Layer(unnamed) => unnamed.code,
            Error::Unrecognized(unknown) => unknown.0,
        }
    }

    /// Layer whose band holds this error, `None` for common errors
    pub const fn layer(&self) -> Option<Layer> {
        Layer::of_code(self.code())
    }

    /// Only `Fatal` requires the stack to be reinitialized
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Error::Fatal)
    }

    /// Short description
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::Init => "init error",
            Error::Busy => "busy",
            Error::BufOverflow => "buffer overflow",
            Error::InvalidArgument => "invalid argument",
            Error::InvalidFrame => "invalid frame",
            Error::TxTimeout => "tx timeout",
            Error::TxNoAck => "no ack",
            Error::CmdUnsupported => "unsupported command",
            Error::ChannelAccessFailure => "channel access failure",
            Error::Fatal => "fatal",
            Error::Lpr(LprError::UnsupportedFrame) => "lpr: unsupported frame",
            Error::Lpr(LprError::BroadcastLastStrobe) => "lpr: broadcast last strobe",
            Error::Lpr(LprError::BroadcastNoAck) => "lpr: broadcast no ack",
            Error::Lpr(LprError::InvalidAddr) => "lpr: invalid address",
            Error::Lpr(LprError::TxCollisionSameDest) => "lpr: collision, same destination",
            Error::Lpr(LprError::TxCollisionDiffDest) => "lpr: collision, other destination",
            Error::Lpr(LprError::InvalidAck) => "lpr: invalid ack",
            Error::Rf(RfError::Send) => "rf: send failed",
            Error::Layer(_) => "layer-specific failure",
            Error::Unrecognized(_) => "unrecognized code",
        }
    }
}

/// Numeric code of an outcome, `0` on success
pub const fn to_code(outcome: Outcome) -> u16 {
    match outcome {
        Ok(()) => NONE,
        Err(e) => e.code(),
    }
}

/// Decode a numeric code
///
/// Never fails: codes without a name decode to [`Error::Layer`] when they lie
/// inside a layer band and to [`Error::Unrecognized`] otherwise.
pub const fn from_code(code: u16) -> Outcome {
    let err = match code {
        NONE => return Ok(()),
        1 => Error::Init,
        2 => Error::Busy,
        3 => Error::BufOverflow,
        4 => Error::InvalidArgument,
        5 => Error::InvalidFrame,
        6 => Error::TxTimeout,
        7 => Error::TxNoAck,
        8 => Error::CmdUnsupported,
        9 => Error::ChannelAccessFailure,
        10 => Error::Fatal,
        401 => Error::Lpr(LprError::UnsupportedFrame),
        402 => Error::Lpr(LprError::BroadcastLastStrobe),
        403 => Error::Lpr(LprError::BroadcastNoAck),
        404 => Error::Lpr(LprError::InvalidAddr),
        405 => Error::Lpr(LprError::TxCollisionSameDest),
        406 => Error::Lpr(LprError::TxCollisionDiffDest),
        407 => Error::Lpr(LprError::InvalidAck),
        501 => Error::Rf(RfError::Send),
        _ => match Layer::of_code(code) {
            Some(layer) => Error::Layer(LayerCode { layer, code }),
            None => Error::Unrecognized(UnknownCode(code)),
        },
    };
    Err(err)
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.code())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
