use core::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;
use heapless::Deque;

use super::traits::Radio;
use crate::command::{Command, Value};
use crate::config::{RfConfig, MAX_FRAME_LEN, TX_QUEUE_LEN};
use crate::driver::{validate_frame, Driver, Link};
use crate::error::{Error, Outcome};
use crate::event::{CallbackArg, Event, Frame, RxCallback, TxCallback};
use crate::layer::Layer;

/// Placeholder for boards without an external RF switch
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSwitch;

impl OutputPin for NoSwitch {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    /// `init` has not succeeded yet
    NotReady,
    /// Initialized, radio asleep
    Off,
    /// Radio listening or transmitting
    On,
}

/// Frame waiting for the transmitter
struct Pending {
    frame: Frame,
    arg: CallbackArg,
}

/// Frame currently on air
struct InFlight {
    arg: CallbackArg,
    polls: u32,
}

fn radio_error<E: Into<Error>>(error: E) -> Error {
    error.into()
}

/// RF slot driver built on any [`Radio`]
///
/// `send` is asynchronous: the frame is queued, transmitted as soon as the
/// radio is free, and its completion is posted to the transmit callback from
/// `process`. Completions are reported in the order the frames were sent.
pub struct RfDriver<R, SW = NoSwitch>
where
    R: Radio,
    SW: OutputPin,
{
    radio: R,
    rf_switch: Option<SW>,
    config: RfConfig,
    state: State,
    tx_queue: Deque<Pending, TX_QUEUE_LEN>,
    in_flight: Option<InFlight>,
    reports: Deque<(CallbackArg, Outcome), TX_QUEUE_LEN>,
    tx_callback: Option<TxCallback>,
    tx_arg: CallbackArg,
    rx_callback: Option<RxCallback>,
}

impl<R: Radio> RfDriver<R, NoSwitch> {
    /// Create a driver for a board without an RF switch
    pub fn new(radio: R, config: RfConfig) -> Self {
        Self::build(radio, None, config)
    }
}

impl<R, SW> RfDriver<R, SW>
where
    R: Radio,
    SW: OutputPin,
{
    /// Create a driver that controls an external RF switch through `rf_switch`
    pub fn with_rf_switch(radio: R, rf_switch: SW, config: RfConfig) -> Self {
        Self::build(radio, Some(rf_switch), config)
    }

    fn build(radio: R, rf_switch: Option<SW>, config: RfConfig) -> Self {
        Self {
            radio,
            rf_switch,
            config,
            state: State::NotReady,
            tx_queue: Deque::new(),
            in_flight: None,
            reports: Deque::new(),
            tx_callback: None,
            tx_arg: 0,
            rx_callback: None,
        }
    }

    /// Get radio reference
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Get mutable radio reference
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Current configuration, including values changed through `ioctl`
    pub fn config(&self) -> &RfConfig {
        &self.config
    }

    /// True once `init` succeeded
    pub fn is_ready(&self) -> bool {
        self.state != State::NotReady
    }

    /// True while the radio is on
    pub fn is_on(&self) -> bool {
        self.state == State::On
    }

    /// Frames accepted by `send` whose completion has not been posted yet
    pub fn outstanding(&self) -> usize {
        self.tx_queue.len() + usize::from(self.in_flight.is_some()) + self.reports.len()
    }

    fn bring_up(&mut self) -> Result<(), R::Error> {
        self.radio.init()?;
        self.apply_config()?;
        self.radio.sleep()
    }

    fn apply_config(&mut self) -> Result<(), R::Error> {
        self.radio.set_tx_power(self.config.tx_power)?;
        self.radio.set_sensitivity(self.config.sensitivity)?;
        self.radio.set_sync_word(self.config.sync_word)?;
        self.radio.set_antenna_diversity(self.config.antenna_diversity)?;
        Ok(())
    }

    fn require_on(&self) -> Outcome {
        match self.state {
            State::On => Ok(()),
            _ => Err(Error::Init),
        }
    }

    /// Queue a completion for the transmit callback
    fn complete(&mut self, arg: CallbackArg, outcome: Outcome) {
        if self.reports.push_back((arg, outcome)).is_err() {
            // send() bounds the outstanding frames, so this cannot happen
            error!("rf: completion report dropped");
        }
    }

    /// Post queued completions until the sink refuses one
    fn flush_reports(&mut self, link: &mut Link<'_, '_>) {
        while let Some((arg, outcome)) = self.reports.pop_front() {
            let Some(callback) = self.tx_callback else {
                continue;
            };
            if link.post(Event::TxDone { callback, arg, outcome }).is_err() {
                // retried on the next turn, still at the head
                let _ = self.reports.push_front((arg, outcome));
                return;
            }
        }
    }

    fn poll_tx(&mut self) -> Outcome {
        let Some(mut tx) = self.in_flight.take() else {
            return Ok(());
        };
        match self.radio.poll_transmit() {
            Ok(()) => {
                trace!("rf: tx done");
                self.complete(tx.arg, Ok(()));
            }
            Err(nb::Error::WouldBlock) => {
                tx.polls += 1;
                if tx.polls >= self.config.tx_timeout_polls.max(1) {
                    warn!("rf: tx timed out after {} polls", tx.polls);
                    self.complete(tx.arg, Err(Error::TxTimeout));
                    self.radio.standby().map_err(radio_error)?;
                    self.radio.listen().map_err(radio_error)?;
                } else {
                    self.in_flight = Some(tx);
                }
            }
            Err(nb::Error::Other(e)) => {
                let e = radio_error(e);
                warn!("rf: tx failed: {}", e);
                self.complete(tx.arg, Err(e));
            }
        }
        Ok(())
    }

    fn start_next(&mut self) {
        let Some(next) = self.tx_queue.pop_front() else {
            return;
        };
        match self.radio.start_transmit(&next.frame) {
            Ok(()) => {
                self.in_flight = Some(InFlight {
                    arg: next.arg,
                    polls: 0,
                });
            }
            Err(e) => self.complete(next.arg, Err(radio_error(e))),
        }
    }

    fn poll_rx(&mut self, link: &mut Link<'_, '_>) -> Outcome {
        let mut buffer = [0u8; MAX_FRAME_LEN];
        match self.radio.poll_receive(&mut buffer) {
            Ok(len) => {
                let frame = buffer.get(..len).ok_or(Error::InvalidFrame)?;
                trace!("rf: received {} bytes", len);
                self.recv(frame, link)
            }
            Err(nb::Error::WouldBlock) => Ok(()),
            Err(nb::Error::Other(e)) => Err(radio_error(e)),
        }
    }

    fn ioctl_common(&mut self, cmd: Command, value: &Value) -> Outcome {
        cmd.check_value(value)?;
        match *value {
            Value::TxCallback(callback) => self.tx_callback = callback,
            Value::CallbackArg(arg) => self.tx_arg = arg,
            Value::RxCallback(callback) => self.rx_callback = callback,
            _ => return Err(Error::CmdUnsupported),
        }
        Ok(())
    }
}

impl<R, SW> Driver for RfDriver<R, SW>
where
    R: Radio,
    SW: OutputPin,
{
    fn name(&self) -> &'static str {
        "rf"
    }

    fn init(&mut self, _link: &mut Link<'_, '_>) -> Outcome {
        if self.state != State::NotReady {
            return Ok(());
        }
        if let Err(e) = self.bring_up() {
            let e = radio_error(e);
            error!("rf: init failed: {}", e);
            return Err(Error::Init);
        }
        self.state = State::Off;
        debug!("rf: ready, max frame {} bytes", self.config.frame_limit());
        Ok(())
    }

    fn on(&mut self) -> Outcome {
        match self.state {
            State::NotReady => Err(Error::Init),
            State::On => Ok(()),
            State::Off => {
                self.radio.listen().map_err(radio_error)?;
                self.state = State::On;
                Ok(())
            }
        }
    }

    fn off(&mut self) -> Outcome {
        if self.state != State::On {
            return Ok(());
        }
        // Unfinished frames still owe their callback an outcome
        if let Some(tx) = self.in_flight.take() {
            self.complete(tx.arg, Err(Error::TxTimeout));
        }
        while let Some(pending) = self.tx_queue.pop_front() {
            self.complete(pending.arg, Err(Error::TxTimeout));
        }
        self.state = State::Off;
        self.radio.sleep().map_err(radio_error)
    }

    fn send(&mut self, data: &[u8], link: &mut Link<'_, '_>) -> Outcome {
        self.require_on()?;
        validate_frame(data, self.config.frame_limit())?;
        if self.outstanding() >= TX_QUEUE_LEN {
            warn!("rf: tx queue full");
            return Err(Error::Busy);
        }
        let frame = Frame::from_slice(data).map_err(|_| Error::BufOverflow)?;
        if self.in_flight.is_none() && self.tx_queue.is_empty() {
            self.radio.start_transmit(&frame).map_err(radio_error)?;
            self.in_flight = Some(InFlight {
                arg: self.tx_arg,
                polls: 0,
            });
        } else {
            let pending = Pending {
                frame,
                arg: self.tx_arg,
            };
            self.tx_queue.push_back(pending).map_err(|_| Error::Busy)?;
        }
        self.flush_reports(link);
        Ok(())
    }

    fn recv(&mut self, data: &[u8], link: &mut Link<'_, '_>) -> Outcome {
        if self.state == State::NotReady {
            return Err(Error::Init);
        }
        validate_frame(data, self.config.frame_limit())?;
        if link.has_upper() {
            return link.deliver_up(data);
        }
        if let Some(callback) = self.rx_callback {
            let event = Event::rx(callback, data, Ok(()))?;
            link.post(event).map_err(|_| Error::Busy)?;
        }
        Ok(())
    }

    fn ioctl(&mut self, cmd: Command, value: &mut Value, _link: &mut Link<'_, '_>) -> Outcome {
        if cmd.is_common() {
            return self.ioctl_common(cmd, value);
        }
        if cmd.layer() != Some(Layer::Rf) {
            return Err(Error::CmdUnsupported);
        }
        cmd.check_value(value)?;
        if self.state == State::NotReady {
            return Err(Error::Init);
        }

        match cmd {
            Command::RF_SET_TX_POWER => {
                let Value::I8(power) = *value else {
                    return Err(Error::InvalidArgument);
                };
                self.radio.set_tx_power(power).map_err(radio_error)?;
                self.config.tx_power = power;
            }
            Command::RF_GET_TX_POWER => *value = Value::I8(self.config.tx_power),
            Command::RF_SET_SENSITIVITY => {
                let Value::I8(sensitivity) = *value else {
                    return Err(Error::InvalidArgument);
                };
                self.radio.set_sensitivity(sensitivity).map_err(radio_error)?;
                self.config.sensitivity = sensitivity;
            }
            Command::RF_GET_SENSITIVITY => *value = Value::I8(self.config.sensitivity),
            Command::RF_GET_RSSI => {
                self.require_on()?;
                *value = Value::I16(self.radio.rssi().map_err(radio_error)?);
            }
            Command::RF_GET_CCA => {
                self.require_on()?;
                *value = Value::Bool(self.radio.channel_clear().map_err(radio_error)?);
            }
            Command::RF_SET_ANT_DIV => {
                let Value::Bool(enabled) = *value else {
                    return Err(Error::InvalidArgument);
                };
                self.radio.set_antenna_diversity(enabled).map_err(radio_error)?;
                self.config.antenna_diversity = enabled;
            }
            Command::RF_SWITCH => {
                let Value::Bool(enabled) = *value else {
                    return Err(Error::InvalidArgument);
                };
                let pin = self.rf_switch.as_mut().ok_or(Error::CmdUnsupported)?;
                let result = if enabled { pin.set_high() } else { pin.set_low() };
                result.map_err(|_| Error::Fatal)?;
            }
            Command::RF_IS_RX_BUSY => {
                self.require_on()?;
                *value = Value::Bool(self.radio.is_receiving().map_err(radio_error)?);
            }
            Command::RF_IS_TX_BUSY => {
                *value = Value::Bool(self.in_flight.is_some() || !self.tx_queue.is_empty());
            }
            Command::RF_SET_SYNC => {
                let Value::U32(sync_word) = *value else {
                    return Err(Error::InvalidArgument);
                };
                self.radio.set_sync_word(sync_word).map_err(radio_error)?;
                self.config.sync_word = sync_word;
            }
            Command::RF_GET_SYNC => *value = Value::U32(self.config.sync_word),
            _ => return Err(Error::CmdUnsupported),
        }
        Ok(())
    }

    fn process(&mut self, link: &mut Link<'_, '_>) -> Outcome {
        if self.state == State::NotReady {
            return Ok(());
        }
        // Held completions go out before any newer one
        self.flush_reports(link);
        self.poll_tx()?;
        if self.state == State::On && self.in_flight.is_none() {
            self.start_next();
        }
        self.flush_reports(link);
        if self.state == State::On && self.in_flight.is_none() {
            self.poll_rx(link)?;
        }
        Ok(())
    }
}
