//! Timestamp helpers.
//!
//! Frames store the UTC mid-exposure time as two 32-bit halves. The halves
//! stay separate in [`crate::frame::FrameInfo`]; [`combine`] is the single
//! place that joins them, so the interpretation can be checked (and changed)
//! in isolation.

use std::time::Duration;

use crate::consts::ADV_EPOCH_UNIX_SECONDS;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Join a split timestamp as `hi << 32 | lo`.
pub fn combine(lo: u32, hi: u32) -> u64 {
    ((hi as u64) << 32) | lo as u64
}

/// Inverse of [`combine`].
pub fn split(value: u64) -> SplitTimestamp {
    SplitTimestamp {
        lo: value as u32,
        hi: (value >> 32) as u32,
    }
}

/// The two raw halves of a 64-bit timestamp as stored on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SplitTimestamp {
    pub lo: u32,
    pub hi: u32,
}

impl SplitTimestamp {
    pub fn combined(&self) -> u64 {
        combine(self.lo, self.hi)
    }

    /// Interpret the combined value as nanoseconds since the ADV epoch.
    pub fn to_adv_timestamp(&self) -> AdvTimestamp {
        AdvTimestamp::from_nanos(self.combined())
    }
}

/// UTC instant counted in nanoseconds since 2010-01-01T00:00:00Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AdvTimestamp {
    nanos: u64,
}

impl AdvTimestamp {
    pub fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    pub fn nanos_since_adv_epoch(&self) -> u64 {
        self.nanos
    }

    pub fn as_duration_since_adv_epoch(&self) -> Duration {
        Duration::from_nanos(self.nanos)
    }

    pub fn unix_nanos(&self) -> u128 {
        ADV_EPOCH_UNIX_SECONDS as u128 * NANOS_PER_SECOND as u128 + self.nanos as u128
    }

    pub fn unix_seconds(&self) -> f64 {
        ADV_EPOCH_UNIX_SECONDS as f64 + self.nanos as f64 / NANOS_PER_SECOND as f64
    }
}

/// Convert stream clock ticks to seconds. A non-positive frequency yields 0.
pub fn ticks_to_seconds(ticks: u64, clock_frequency: i64) -> f64 {
    if clock_frequency <= 0 {
        return 0.0;
    }
    ticks as f64 / clock_frequency as f64
}
