use crate::error::Error;

/// Generic transceiver interface
///
/// Chip drivers implement this trait and [`RfDriver`](super::RfDriver)
/// adapts them to the stack's driver contract. Nothing here blocks: a
/// transmission is started and then polled until the chip reports it done.
pub trait Radio {
    /// Error type for radio operations
    type Error: Into<Error>;

    /// Initialize the radio
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Set the radio's transmission power in dBm
    fn set_tx_power(&mut self, power: i8) -> Result<(), Self::Error>;

    /// Set the receiver sensitivity threshold in dBm
    fn set_sensitivity(&mut self, sensitivity: i8) -> Result<(), Self::Error>;

    /// Set the sync word
    fn set_sync_word(&mut self, sync_word: u32) -> Result<(), Self::Error>;

    /// Enable or disable antenna diversity
    fn set_antenna_diversity(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Load a frame and start transmitting it
    fn start_transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Check on the transmission started last
    ///
    /// Returns `WouldBlock` while the frame is still on air.
    fn poll_transmit(&mut self) -> nb::Result<(), Self::Error>;

    /// Fetch a received frame into `buffer`
    ///
    /// Returns the frame length, or `WouldBlock` when nothing arrived.
    fn poll_receive(&mut self, buffer: &mut [u8]) -> nb::Result<usize, Self::Error>;

    /// Get the current RSSI (Received Signal Strength Indicator) in dBm
    fn rssi(&mut self) -> Result<i16, Self::Error>;

    /// Run a clear channel assessment, `true` when the channel is free
    fn channel_clear(&mut self) -> Result<bool, Self::Error>;

    /// Check if the radio is currently receiving a packet
    fn is_receiving(&mut self) -> Result<bool, Self::Error>;

    /// Put the radio into receive mode
    fn listen(&mut self) -> Result<(), Self::Error>;

    /// Put the radio into standby mode, aborting any transmission
    fn standby(&mut self) -> Result<(), Self::Error>;

    /// Put the radio into sleep mode
    fn sleep(&mut self) -> Result<(), Self::Error>;
}
