//! Asynchronous completion and reception events
//!
//! Radio I/O never blocks the caller. A driver that finishes an operation
//! later posts an [`Event`] carrying the registered callback and its context.
//! An event loop then drains the sink and runs the callbacks. [`EventQueue`]
//! is a FIFO sink, so the callbacks of one driver run in the order that driver
//! posted them.

use heapless::{Deque, Vec};

use crate::config::MAX_FRAME_LEN;
use crate::error::{Error, Outcome};

/// Opaque context handed back to a transmit callback
pub type CallbackArg = usize;

/// Transmission completion handler
pub type TxCallback = fn(arg: CallbackArg, outcome: Outcome);

/// Frame reception handler
pub type RxCallback = fn(frame: &[u8], outcome: Outcome);

/// Owned copy of a received frame
pub type Frame = Vec<u8, MAX_FRAME_LEN>;

/// A deferred callback invocation
#[derive(Debug, Clone)]
pub enum Event {
    /// A transmission finished
    TxDone {
        /// Registered completion handler
        callback: TxCallback,
        /// Context registered with the handler when the frame was sent
        arg: CallbackArg,
        /// How the transmission ended
        outcome: Outcome,
    },
    /// A frame arrived at the top of the stack
    Rx {
        /// Registered reception handler
        callback: RxCallback,
        /// Received frame
        frame: Frame,
        /// Reception status
        outcome: Outcome,
    },
}

impl Event {
    /// Build a reception event, copying the frame
    pub fn rx(callback: RxCallback, data: &[u8], outcome: Outcome) -> Result<Self, Error> {
        let frame = Frame::from_slice(data).map_err(|_| Error::BufOverflow)?;
        Ok(Event::Rx { callback, frame, outcome })
    }

    /// Outcome carried by the event
    pub fn outcome(&self) -> Outcome {
        match self {
            Event::TxDone { outcome, .. } | Event::Rx { outcome, .. } => *outcome,
        }
    }

    /// Run the callback
    pub fn deliver(self) {
        match self {
            Event::TxDone { callback, arg, outcome } => callback(arg, outcome),
            Event::Rx { callback, frame, outcome } => callback(&frame, outcome),
        }
    }
}

/// Destination of posted events
///
/// The stack ships [`EventQueue`]; an application with its own event
/// processing can forward events into it instead.
pub trait EventSink {
    /// Queue an event for later delivery
    ///
    /// The event is handed back when it cannot be accepted.
    fn post(&mut self, event: Event) -> Result<(), Event>;
}

/// Bounded FIFO of pending events
pub struct EventQueue<const N: usize> {
    queue: Deque<Event, N>,
}

impl<const N: usize> EventQueue<N> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self { queue: Deque::new() }
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Take the oldest pending event without running it
    pub fn pop(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Run every pending callback in posting order
    ///
    /// Returns how many callbacks ran.
    pub fn dispatch(&mut self) -> usize {
        let mut count = 0;
        while let Some(event) = self.queue.pop_front() {
            event.deliver();
            count += 1;
        }
        count
    }

    /// Drop every pending event
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventSink for EventQueue<N> {
    fn post(&mut self, event: Event) -> Result<(), Event> {
        self.queue.push_back(event).map_err(|event| {
            warn!("event queue full ({} pending)", N);
            event
        })
    }
}
