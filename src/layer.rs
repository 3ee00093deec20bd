//! Stack layers and their numeric bands
//!
//! Every layer owns a band of 100 codes in both the error and the command
//! space. Band ownership is static: a layer adds codes inside its own band and
//! never renumbers.

use core::fmt;

/// Width of every per-layer code band
pub const BAND_SIZE: u16 = 100;

/// A slot of the network stack, listed top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layer {
    /// Logical link control
    Llc,
    /// Medium access control
    Mac,
    /// Physical layer abstraction
    Phy,
    /// Low-power radio (duty cycling)
    Lpr,
    /// Radio frequency transceiver
    Rf,
}

impl Layer {
    /// All layers in architectural order, application side first
    pub const ALL: [Layer; 5] = [Layer::Llc, Layer::Mac, Layer::Phy, Layer::Lpr, Layer::Rf];

    /// Position of the slot in the stack, 0 being the top
    pub const fn index(self) -> usize {
        match self {
            Layer::Llc => 0,
            Layer::Mac => 1,
            Layer::Phy => 2,
            Layer::Lpr => 3,
            Layer::Rf => 4,
        }
    }

    /// First code of the layer's band (the band placeholder itself)
    pub const fn base(self) -> u16 {
        (self.index() as u16 + 1) * BAND_SIZE
    }

    /// Find the layer whose band contains `code`
    pub const fn of_code(code: u16) -> Option<Layer> {
        match code / BAND_SIZE {
            1 => Some(Layer::Llc),
            2 => Some(Layer::Mac),
            3 => Some(Layer::Phy),
            4 => Some(Layer::Lpr),
            5 => Some(Layer::Rf),
            _ => None,
        }
    }

    /// Short lowercase name
    pub const fn as_str(self) -> &'static str {
        match self {
            Layer::Llc => "llc",
            Layer::Mac => "mac",
            Layer::Phy => "phy",
            Layer::Lpr => "lpr",
            Layer::Rf => "rf",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
