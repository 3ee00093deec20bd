//! Pass-through driver for unused stack slots
//!
//! A slot with no real implementation holds a [`NullDriver`], so callers
//! never check for a missing layer. Frames cross it unchanged in both
//! directions. When it sits at an end of the stack it completes the
//! operation itself through the registered callbacks.

use crate::command::{Command, Value};
use crate::config::NullConfig;
use crate::driver::{validate_frame, Driver, Link};
use crate::error::{Error, Outcome};
use crate::event::{CallbackArg, Event, RxCallback, TxCallback};
use crate::layer::Layer;

/// Identity driver
#[derive(Debug, Clone)]
pub struct NullDriver {
    layer: Layer,
    config: NullConfig,
    tx_callback: Option<TxCallback>,
    tx_arg: CallbackArg,
    rx_callback: Option<RxCallback>,
}

impl NullDriver {
    /// Null driver for `layer` with the default frame limit
    pub fn new(layer: Layer) -> Self {
        Self::with_config(layer, NullConfig::default())
    }

    /// Null driver for `layer`
    pub fn with_config(layer: Layer, config: NullConfig) -> Self {
        Self {
            layer,
            config,
            tx_callback: None,
            tx_arg: 0,
            rx_callback: None,
        }
    }

    /// Slot the driver was created for
    pub fn layer(&self) -> Layer {
        self.layer
    }
}

impl Driver for NullDriver {
    fn name(&self) -> &'static str {
        match self.layer {
            Layer::Llc => "llc-null",
            Layer::Mac => "mac-null",
            Layer::Phy => "phy-null",
            Layer::Lpr => "lpr-null",
            Layer::Rf => "rf-null",
        }
    }

    fn init(&mut self, _link: &mut Link<'_, '_>) -> Outcome {
        Ok(())
    }

    fn on(&mut self) -> Outcome {
        Ok(())
    }

    fn off(&mut self) -> Outcome {
        Ok(())
    }

    fn send(&mut self, data: &[u8], link: &mut Link<'_, '_>) -> Outcome {
        validate_frame(data, self.config.max_frame_len)?;
        if link.has_lower() {
            return link.send_down(data);
        }
        // Nothing below: the frame is consumed here
        if let Some(callback) = self.tx_callback {
            link.post(Event::TxDone {
                callback,
                arg: self.tx_arg,
                outcome: Ok(()),
            })
            .map_err(|_| Error::Busy)?;
        }
        Ok(())
    }

    fn recv(&mut self, data: &[u8], link: &mut Link<'_, '_>) -> Outcome {
        validate_frame(data, self.config.max_frame_len)?;
        if link.has_upper() {
            return link.deliver_up(data);
        }
        if let Some(callback) = self.rx_callback {
            let event = Event::rx(callback, data, Ok(()))?;
            link.post(event).map_err(|_| Error::Busy)?;
        }
        Ok(())
    }

    fn ioctl(&mut self, cmd: Command, value: &mut Value, link: &mut Link<'_, '_>) -> Outcome {
        if !cmd.is_common() {
            return Err(Error::CmdUnsupported);
        }
        cmd.check_value(value)?;
        match *value {
            Value::RxCallback(callback) => {
                self.rx_callback = callback;
                Ok(())
            }
            Value::TxCallback(_) | Value::CallbackArg(_) => {
                // Completion is reported by the first real driver below, so it
                // must accept the registration before this one takes effect
                if link.has_lower() {
                    link.ioctl_down(cmd, value)?;
                }
                match *value {
                    Value::TxCallback(callback) => self.tx_callback = callback,
                    Value::CallbackArg(arg) => self.tx_arg = arg,
                    _ => {}
                }
                Ok(())
            }
            _ => Err(Error::CmdUnsupported),
        }
    }

    fn is_null(&self) -> bool {
        true
    }
}
