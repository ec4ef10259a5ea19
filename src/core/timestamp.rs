//! Modification timestamps
//!
//! Every mutable object in the scene graph carries an [`MTime`]. All of them
//! draw their values from one shared [`Clock`], so "is newer than" comparisons
//! stay well-ordered across independently constructed objects.
//!
//! # Example
//!
//! ```ignore
//! let clock = Clock::new();
//! let mut a = MTime::new(&clock);
//! let mut b = MTime::new(&clock);
//!
//! a.modified();
//! b.modified();
//! assert!(b.is_newer_than(a.get()));
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

// ============================================================================
// TimeStamp
// ============================================================================

/// An opaque point on a [`Clock`].
///
/// Ordering is the only meaningful operation: a larger stamp was taken later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TimeStamp(u64);

impl TimeStamp {
    /// The stamp of an object that has never been modified.
    pub const ZERO: Self = Self(0);

    /// Get the raw counter value.
    #[must_use]
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Shared monotonic counter that hands out [`TimeStamp`]s.
///
/// Cloning a clock yields another handle to the same counter. Objects that
/// need to be compared against each other must be built from the same clock.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    counter: Rc<Cell<u64>>,
}

impl Clock {
    /// Create a new clock starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock and return the new stamp.
    pub fn tick(&self) -> TimeStamp {
        let next = self.counter.get() + 1;
        self.counter.set(next);
        TimeStamp(next)
    }

    /// The most recently issued stamp, without advancing.
    #[must_use]
    pub fn now(&self) -> TimeStamp {
        TimeStamp(self.counter.get())
    }

    /// Check whether two handles share the same counter.
    #[must_use]
    pub fn same_clock(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.counter, &other.counter)
    }
}

// ============================================================================
// MTime
// ============================================================================

/// Per-object modification tracker.
///
/// Starts at [`TimeStamp::ZERO`]; each call to [`MTime::modified`] takes a fresh
/// stamp from the clock.
#[derive(Debug, Clone)]
pub struct MTime {
    clock: Clock,
    stamp: TimeStamp,
}

impl MTime {
    /// Create a tracker that has never been modified.
    #[must_use]
    pub fn new(clock: &Clock) -> Self {
        Self {
            clock: clock.clone(),
            stamp: TimeStamp::ZERO,
        }
    }

    /// Create a tracker already marked as modified.
    #[must_use]
    pub fn modified_now(clock: &Clock) -> Self {
        Self {
            clock: clock.clone(),
            stamp: clock.tick(),
        }
    }

    /// Mark the owner as modified now.
    #[inline]
    pub fn modified(&mut self) {
        self.stamp = self.clock.tick();
    }

    /// Get the last modification stamp.
    #[must_use]
    #[inline]
    pub fn get(&self) -> TimeStamp {
        self.stamp
    }

    /// Check whether this tracker was modified after `other`.
    #[must_use]
    #[inline]
    pub fn is_newer_than(&self, other: TimeStamp) -> bool {
        self.stamp > other
    }

    /// The clock this tracker draws from.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Store `value` into `slot` and mark modified, but only if it changed.
    ///
    /// Returns `true` when the slot was updated.
    pub fn update<T: PartialEq>(&mut self, slot: &mut T, value: T) -> bool {
        if *slot == value {
            return false;
        }
        *slot = value;
        self.modified();
        true
    }
}
