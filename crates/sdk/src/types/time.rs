//! Duration quantities exchanged with the simulator.
//!
//! Each unit is a thin newtype over a signed 64-bit tick count. The simulator
//! reports server time as [`Microseconds`]; strategies mostly pass these
//! values around unchanged or compare them. [`Nanoseconds::now`] reads the
//! monotonic clock for local latency measurements (chart annotations,
//! self-profiling), independent of NTP adjustments.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

macro_rules! duration_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Construct from a raw tick count.
            #[inline]
            pub const fn new(count: i64) -> Self {
                Self(count)
            }

            /// The zero duration.
            #[inline]
            pub const fn zero() -> Self {
                Self(0)
            }

            /// Returns the raw tick count.
            #[inline]
            pub const fn count(&self) -> i64 {
                self.0
            }
        }

        impl Add for $name {
            type Output = $name;

            #[inline]
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;

            #[inline]
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }
    };
}

duration_type!(
    /// A count of whole seconds.
    Seconds
);
duration_type!(
    /// A count of milliseconds.
    Milliseconds
);
duration_type!(
    /// A count of microseconds. Server time is reported in this unit.
    Microseconds
);
duration_type!(
    /// A count of nanoseconds.
    Nanoseconds
);

impl Seconds {
    /// Widen to milliseconds.
    #[inline]
    pub const fn to_millis(self) -> Milliseconds {
        Milliseconds(self.0 * 1_000)
    }

    /// Widen to microseconds.
    #[inline]
    pub const fn to_micros(self) -> Microseconds {
        Microseconds(self.0 * 1_000_000)
    }
}

impl Milliseconds {
    /// Widen to microseconds.
    #[inline]
    pub const fn to_micros(self) -> Microseconds {
        Microseconds(self.0 * 1_000)
    }
}

impl Microseconds {
    /// Widen to nanoseconds.
    #[inline]
    pub const fn to_nanos(self) -> Nanoseconds {
        Nanoseconds(self.0 * 1_000)
    }
}

impl Nanoseconds {
    /// Capture the current monotonic time.
    ///
    /// Uses `clock_gettime(CLOCK_MONOTONIC)` where available for
    /// sub-microsecond overhead; falls back to `std::time::Instant`-free
    /// system time elsewhere.
    #[inline]
    pub fn now() -> Self {
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            let mut ts = libc::timespec {
                tv_sec: 0,
                tv_nsec: 0,
            };
            // SAFETY: passing a valid pointer to a stack-allocated timespec.
            unsafe {
                libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts);
            }
            Self(ts.tv_sec as i64 * 1_000_000_000 + ts.tv_nsec as i64)
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            use std::time::{SystemTime, UNIX_EPOCH};
            let dur = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("system clock before UNIX epoch");
            Self(dur.as_nanos() as i64)
        }
    }

    /// Truncate to whole microseconds.
    #[inline]
    pub const fn to_micros(self) -> Microseconds {
        Microseconds(self.0 / 1_000)
    }
}
