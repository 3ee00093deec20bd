use super::MAX_FRAME_LEN;

/// Sync word applied when none is configured (IEEE 802.15.4g SFD, uncoded)
pub const DEFAULT_SYNC_WORD: u32 = 0x0000_904E;

/// RF driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RfConfig {
    /// Longest frame the transceiver accepts, at most [`MAX_FRAME_LEN`]
    pub max_frame_len: usize,
    /// Transmit power in dBm
    pub tx_power: i8,
    /// Receiver sensitivity threshold in dBm
    pub sensitivity: i8,
    /// Sync word
    pub sync_word: u32,
    /// Antenna diversity enabled
    pub antenna_diversity: bool,
    /// Polls of an unfinished transmission before it is reported as timed out
    pub tx_timeout_polls: u32,
}

impl Default for RfConfig {
    fn default() -> Self {
        Self {
            max_frame_len: 127,
            tx_power: 14,
            sensitivity: -100,
            sync_word: DEFAULT_SYNC_WORD,
            antenna_diversity: false,
            tx_timeout_polls: 1000,
        }
    }
}

impl RfConfig {
    /// Largest frame accepted, clamped to what the driver can buffer
    pub fn frame_limit(&self) -> usize {
        self.max_frame_len.min(MAX_FRAME_LEN)
    }
}
