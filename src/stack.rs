//! Stack composition
//!
//! A [`Netstack`] owns exactly one driver per slot, in the fixed order
//! LLC → MAC → PHY → LPR → RF. Slots left unset hold a [`NullDriver`].
//! The stack decides which driver sits in which slot and lends each call a
//! [`Link`] to the neighbouring slots. Chaining a frame from one layer to the
//! next is the drivers' job.

use crate::command::{Command, Value};
use crate::config::EVENT_QUEUE_LEN;
use crate::diag;
use crate::driver::{Driver, Link};
use crate::error::{Error, Outcome};
use crate::event::EventQueue;
use crate::layer::Layer;
use crate::null::NullDriver;

/// Operation routed to one slot
enum Op<'a> {
    Init,
    On,
    Off,
    Send(&'a [u8]),
    Recv(&'a [u8]),
    Ioctl(Command, &'a mut Value),
    Process,
}

/// Slot assignment in progress
pub struct StackBuilder<L, M, P, Lp, R> {
    llc: L,
    mac: M,
    phy: P,
    lpr: Lp,
    rf: R,
}

impl StackBuilder<NullDriver, NullDriver, NullDriver, NullDriver, NullDriver> {
    /// Start with a null driver in every slot
    pub fn new() -> Self {
        Self {
            llc: NullDriver::new(Layer::Llc),
            mac: NullDriver::new(Layer::Mac),
            phy: NullDriver::new(Layer::Phy),
            lpr: NullDriver::new(Layer::Lpr),
            rf: NullDriver::new(Layer::Rf),
        }
    }
}

impl Default for StackBuilder<NullDriver, NullDriver, NullDriver, NullDriver, NullDriver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, M, P, Lp, R> StackBuilder<L, M, P, Lp, R>
where
    L: Driver,
    M: Driver,
    P: Driver,
    Lp: Driver,
    R: Driver,
{
    /// Bind the logical link control slot
    pub fn llc<D: Driver>(self, llc: D) -> StackBuilder<D, M, P, Lp, R> {
        StackBuilder {
            llc,
            mac: self.mac,
            phy: self.phy,
            lpr: self.lpr,
            rf: self.rf,
        }
    }

    /// Bind the medium access control slot
    pub fn mac<D: Driver>(self, mac: D) -> StackBuilder<L, D, P, Lp, R> {
        StackBuilder {
            llc: self.llc,
            mac,
            phy: self.phy,
            lpr: self.lpr,
            rf: self.rf,
        }
    }

    /// Bind the physical layer slot
    pub fn phy<D: Driver>(self, phy: D) -> StackBuilder<L, M, D, Lp, R> {
        StackBuilder {
            llc: self.llc,
            mac: self.mac,
            phy,
            lpr: self.lpr,
            rf: self.rf,
        }
    }

    /// Bind the low-power radio slot
    pub fn lpr<D: Driver>(self, lpr: D) -> StackBuilder<L, M, P, D, R> {
        StackBuilder {
            llc: self.llc,
            mac: self.mac,
            phy: self.phy,
            lpr,
            rf: self.rf,
        }
    }

    /// Bind the radio frequency slot
    pub fn rf<D: Driver>(self, rf: D) -> StackBuilder<L, M, P, Lp, D> {
        StackBuilder {
            llc: self.llc,
            mac: self.mac,
            phy: self.phy,
            lpr: self.lpr,
            rf,
        }
    }

    /// Finish composition
    pub fn build(self) -> Netstack<L, M, P, Lp, R> {
        Netstack {
            llc: self.llc,
            mac: self.mac,
            phy: self.phy,
            lpr: self.lpr,
            rf: self.rf,
            events: EventQueue::new(),
        }
    }
}

/// A composed network stack
pub struct Netstack<
    L = NullDriver,
    M = NullDriver,
    P = NullDriver,
    Lp = NullDriver,
    R = NullDriver,
> {
    llc: L,
    mac: M,
    phy: P,
    lpr: Lp,
    rf: R,
    events: EventQueue<EVENT_QUEUE_LEN>,
}

impl Netstack {
    /// Start composing a stack
    pub fn builder() -> StackBuilder<NullDriver, NullDriver, NullDriver, NullDriver, NullDriver> {
        StackBuilder::new()
    }
}

impl<L, M, P, Lp, R> Netstack<L, M, P, Lp, R>
where
    L: Driver,
    M: Driver,
    P: Driver,
    Lp: Driver,
    R: Driver,
{
    /// Route `op` to the driver in `layer`
    fn run(&mut self, layer: Layer, op: Op<'_>) -> Outcome {
        let mut slots: [&mut dyn Driver; 5] = [
            &mut self.llc,
            &mut self.mac,
            &mut self.phy,
            &mut self.lpr,
            &mut self.rf,
        ];
        let (upper, rest) = slots.split_at_mut(layer.index());
        let (this, lower) = rest.split_first_mut().ok_or(Error::Fatal)?;
        match op {
            Op::On => this.on(),
            Op::Off => this.off(),
            Op::Init => this.init(&mut Link::new(upper, lower, &mut self.events)),
            Op::Send(data) => {
                this.send(data, &mut Link::new(&mut [], lower, &mut self.events))
            }
            Op::Recv(data) => {
                this.recv(data, &mut Link::new(upper, &mut [], &mut self.events))
            }
            Op::Ioctl(cmd, value) => {
                this.ioctl(cmd, value, &mut Link::new(upper, lower, &mut self.events))
            }
            Op::Process => this.process(&mut Link::new(upper, lower, &mut self.events)),
        }
    }

    /// Diagnostic name of the driver in `layer`
    pub fn name(&self, layer: Layer) -> &'static str {
        match layer {
            Layer::Llc => self.llc.name(),
            Layer::Mac => self.mac.name(),
            Layer::Phy => self.phy.name(),
            Layer::Lpr => self.lpr.name(),
            Layer::Rf => self.rf.name(),
        }
    }

    fn is_null(&self, layer: Layer) -> bool {
        match layer {
            Layer::Llc => self.llc.is_null(),
            Layer::Mac => self.mac.is_null(),
            Layer::Phy => self.phy.is_null(),
            Layer::Lpr => self.lpr.is_null(),
            Layer::Rf => self.rf.is_null(),
        }
    }

    /// Initialize every real driver, bottom layer first
    ///
    /// Stops at the first failure and returns it. Layers initialized before
    /// the failure are switched off again.
    pub fn init(&mut self) -> Outcome {
        diag::reset();
        for (done, layer) in Layer::ALL.iter().rev().enumerate() {
            if self.is_null(*layer) {
                continue;
            }
            debug!("netstk: init {} ({})", layer, self.name(*layer));
            if let Err(e) = self.run(*layer, Op::Init) {
                error!("netstk: {} init failed: {}", layer, e);
                for below in Layer::ALL.iter().rev().take(done) {
                    if let Err(off_err) = self.run(*below, Op::Off) {
                        warn!("netstk: {} did not switch off: {}", below, off_err);
                    }
                }
                diag::record(Err(e));
                return Err(e);
            }
        }
        info!("netstk: stack ready");
        Ok(())
    }

    /// Switch the driver in `layer` on
    pub fn on(&mut self, layer: Layer) -> Outcome {
        let outcome = self.run(layer, Op::On);
        diag::record(outcome);
        outcome
    }

    /// Switch the driver in `layer` off
    pub fn off(&mut self, layer: Layer) -> Outcome {
        let outcome = self.run(layer, Op::Off);
        diag::record(outcome);
        outcome
    }

    /// Switch every layer on, bottom first
    pub fn on_all(&mut self) -> Outcome {
        for layer in Layer::ALL.iter().rev() {
            self.on(*layer)?;
        }
        Ok(())
    }

    /// Switch every layer off, top first
    ///
    /// Every layer is attempted; the first failure is returned.
    pub fn off_all(&mut self) -> Outcome {
        let mut result = Ok(());
        for layer in Layer::ALL {
            if let Err(e) = self.run(layer, Op::Off) {
                result = result.and(Err(e));
            }
        }
        diag::record(result);
        result
    }

    /// Hand a frame to the top of the stack
    pub fn send(&mut self, data: &[u8]) -> Outcome {
        let outcome = self.run(Layer::Llc, Op::Send(data));
        diag::record(outcome);
        outcome
    }

    /// Hand a frame received from the medium to the bottom of the stack
    pub fn deliver(&mut self, data: &[u8]) -> Outcome {
        let outcome = self.run(Layer::Rf, Op::Recv(data));
        diag::record(outcome);
        outcome
    }

    /// Send a command to the driver in `layer` only
    pub fn ioctl(&mut self, layer: Layer, cmd: Command, value: &mut Value) -> Outcome {
        let outcome = self.run(layer, Op::Ioctl(cmd, value));
        if outcome == Err(Error::CmdUnsupported) {
            debug!("netstk: {} does not support {}", layer, cmd);
        }
        diag::record(outcome);
        outcome
    }

    /// Give every driver a turn at its deferred work, bottom first
    ///
    /// Every driver runs; the first failure is returned.
    pub fn process(&mut self) -> Outcome {
        let mut result = Ok(());
        for layer in Layer::ALL.iter().rev() {
            if let Err(e) = self.run(*layer, Op::Process) {
                warn!("netstk: {} process failed: {}", layer, e);
                result = result.and(Err(e));
            }
        }
        diag::record(result);
        result
    }

    /// Run every queued callback in posting order
    pub fn dispatch(&mut self) -> usize {
        self.events.dispatch()
    }

    /// Pending events
    pub fn events(&self) -> &EventQueue<EVENT_QUEUE_LEN> {
        &self.events
    }

    /// Pending events, for an external event loop
    pub fn events_mut(&mut self) -> &mut EventQueue<EVENT_QUEUE_LEN> {
        &mut self.events
    }

    /// Logical link control driver
    pub fn llc(&self) -> &L {
        &self.llc
    }

    /// Mutable logical link control driver
    pub fn llc_mut(&mut self) -> &mut L {
        &mut self.llc
    }

    /// Medium access control driver
    pub fn mac(&self) -> &M {
        &self.mac
    }

    /// Mutable medium access control driver
    pub fn mac_mut(&mut self) -> &mut M {
        &mut self.mac
    }

    /// Physical layer driver
    pub fn phy(&self) -> &P {
        &self.phy
    }

    /// Mutable physical layer driver
    pub fn phy_mut(&mut self) -> &mut P {
        &mut self.phy
    }

    /// Low-power radio driver
    pub fn lpr(&self) -> &Lp {
        &self.lpr
    }

    /// Mutable low-power radio driver
    pub fn lpr_mut(&mut self) -> &mut Lp {
        &mut self.lpr
    }

    /// Radio frequency driver
    pub fn rf(&self) -> &R {
        &self.rf
    }

    /// Mutable radio frequency driver
    pub fn rf_mut(&mut self) -> &mut R {
        &mut self.rf
    }
}
