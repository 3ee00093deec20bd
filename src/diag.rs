//! Process-wide last-error mirror
//!
//! Holds the most recent outcome seen anywhere in the stack, for management
//! and logging code that wants a cheap inspection point. It has no history and
//! no notion of which layer wrote it; per-call results come from the return
//! value of the call.

use core::sync::atomic::{AtomicU16, Ordering};

use crate::error::{self, Outcome};

static LAST_ERROR: AtomicU16 = AtomicU16::new(error::NONE);

/// Overwrite the slot with `outcome`
pub fn record(outcome: Outcome) {
    LAST_ERROR.store(error::to_code(outcome), Ordering::Relaxed);
}

/// Most recent outcome recorded across the whole stack
pub fn last_error() -> Outcome {
    error::from_code(LAST_ERROR.load(Ordering::Relaxed))
}

/// Numeric form of [`last_error`]
pub fn last_error_code() -> u16 {
    LAST_ERROR.load(Ordering::Relaxed)
}

/// Clear the slot back to "none"
pub fn reset() {
    LAST_ERROR.store(error::NONE, Ordering::Relaxed);
}
