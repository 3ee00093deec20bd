//! Module driver contract
//!
//! Every layer of the stack (LLC, MAC, PHY, LPR, RF) implements [`Driver`].
//! The contract has the same shape on every layer: lifecycle (`init`, `on`,
//! `off`), data path (`send`, `recv`) and control (`ioctl`). That is why any
//! slot can hold any implementation, including the pass-through
//! [`NullDriver`](crate::null::NullDriver).
//!
//! Drivers never own their neighbours. The stack lends each call a [`Link`]
//! that reaches the neighbouring slots and the event sink. Going down a
//! `send`, only the lower slots are reachable. Going up a `recv`, only the
//! upper ones are.

use crate::command::{Command, Value};
use crate::error::{Error, Outcome};
use crate::event::{Event, EventSink};

/// A link-layer module
///
/// Calls are serialized by the event loop, so implementations need no
/// internal locking.
pub trait Driver {
    /// Diagnostic name, never used for dispatch
    fn name(&self) -> &'static str;

    /// One-time setup
    ///
    /// Calling it again on a ready driver must succeed without effect. After a
    /// failure the driver stays not ready and `send`/`recv` return
    /// [`Error::Init`].
    fn init(&mut self, link: &mut Link<'_, '_>) -> Outcome;

    /// Enter the active state; a no-op returning `Ok` when already on
    fn on(&mut self) -> Outcome;

    /// Leave the active state; a no-op returning `Ok` when already off
    fn off(&mut self) -> Outcome;

    /// Hand a frame downward, or put it on air for the bottom layer
    ///
    /// A frame longer than the layer maximum yields [`Error::BufOverflow`]
    /// and is not forwarded. An empty frame yields [`Error::InvalidArgument`].
    /// A driver either forwards synchronously through `link` or queues the
    /// frame and reports completion later through its transmit callback.
    fn send(&mut self, data: &[u8], link: &mut Link<'_, '_>) -> Outcome;

    /// Hand a frame received from below upward
    ///
    /// Only the upper slots are reachable here. Work that has to go back down,
    /// such as an acknowledgement, is queued and sent from `process`;
    /// [`Link::send_down`] answers [`Error::Busy`] during `recv`.
    fn recv(&mut self, data: &[u8], link: &mut Link<'_, '_>) -> Outcome;

    /// Configure or query the driver
    ///
    /// Unknown commands yield [`Error::CmdUnsupported`] and change nothing.
    fn ioctl(&mut self, cmd: Command, value: &mut Value, link: &mut Link<'_, '_>) -> Outcome;

    /// Advance deferred work when the event loop gives the driver a turn
    fn process(&mut self, _link: &mut Link<'_, '_>) -> Outcome {
        Ok(())
    }

    /// True for pass-through placeholders
    fn is_null(&self) -> bool {
        false
    }
}

/// Check a frame against a layer's size limit
pub fn validate_frame(data: &[u8], max_len: usize) -> Outcome {
    if data.is_empty() {
        return Err(Error::InvalidArgument);
    }
    if data.len() > max_len {
        return Err(Error::BufOverflow);
    }
    Ok(())
}

/// Neighbour access lent to a driver for the duration of one call
///
/// `upper` lists the slots above the driver, top first; `lower` lists the
/// slots below it, nearest first.
pub struct Link<'l, 'd> {
    upper: &'l mut [&'d mut (dyn Driver + 'd)],
    lower: &'l mut [&'d mut (dyn Driver + 'd)],
    events: &'l mut (dyn EventSink + 'd),
}

impl<'l, 'd> Link<'l, 'd> {
    /// Build a link around one slot
    pub fn new(
        upper: &'l mut [&'d mut (dyn Driver + 'd)],
        lower: &'l mut [&'d mut (dyn Driver + 'd)],
        events: &'l mut (dyn EventSink + 'd),
    ) -> Self {
        Self { upper, lower, events }
    }

    /// A link with no neighbours, for drivers used on their own
    pub fn detached(events: &'l mut (dyn EventSink + 'd)) -> Self {
        Self {
            upper: &mut [],
            lower: &mut [],
            events,
        }
    }

    /// True when a lower neighbour is reachable
    pub fn has_lower(&self) -> bool {
        !self.lower.is_empty()
    }

    /// True when an upper neighbour is reachable
    pub fn has_upper(&self) -> bool {
        !self.upper.is_empty()
    }

    /// Call `send` on the nearest lower driver
    ///
    /// Fails with `Busy` when no lower slot is reachable in this call.
    pub fn send_down(&mut self, data: &[u8]) -> Outcome {
        let (next, rest) = self.lower.split_first_mut().ok_or(Error::Busy)?;
        let mut link = Link {
            upper: &mut [],
            lower: rest,
            events: &mut *self.events,
        };
        next.send(data, &mut link)
    }

    /// Call `recv` on the nearest upper driver
    ///
    /// Fails with `Busy` when no upper slot is reachable in this call.
    pub fn deliver_up(&mut self, data: &[u8]) -> Outcome {
        let (next, rest) = self.upper.split_last_mut().ok_or(Error::Busy)?;
        let mut link = Link {
            upper: rest,
            lower: &mut [],
            events: &mut *self.events,
        };
        next.recv(data, &mut link)
    }

    /// Call `ioctl` on the nearest lower driver
    pub fn ioctl_down(&mut self, cmd: Command, value: &mut Value) -> Outcome {
        let (next, rest) = self.lower.split_first_mut().ok_or(Error::Busy)?;
        let mut link = Link {
            upper: &mut [],
            lower: rest,
            events: &mut *self.events,
        };
        next.ioctl(cmd, value, &mut link)
    }

    /// Post an event for the event loop
    ///
    /// A full sink hands the event back so the caller can retry later.
    pub fn post(&mut self, event: Event) -> Result<(), Event> {
        self.events.post(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventQueue;

    #[test]
    fn test_validate_frame() {
        assert_eq!(validate_frame(&[1, 2, 3], 3), Ok(()));
        assert_eq!(validate_frame(&[1, 2, 3, 4], 3), Err(Error::BufOverflow));
        assert_eq!(validate_frame(&[], 3), Err(Error::InvalidArgument));
    }

    #[test]
    fn test_unreachable_neighbour_is_busy() {
        let mut events: EventQueue<1> = EventQueue::new();
        let mut link = Link::detached(&mut events);
        assert!(!link.has_lower());
        assert!(!link.has_upper());
        assert_eq!(link.send_down(&[1, 2]), Err(Error::Busy));
        assert_eq!(link.deliver_up(&[1, 2]), Err(Error::Busy));
        assert_eq!(link.ioctl_down(Command::NONE, &mut Value::None), Err(Error::Busy));
    }
}
