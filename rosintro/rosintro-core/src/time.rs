//! `time` and `duration` builtins.

use std::fmt::{self, Display, Formatter};

const NSEC_PER_SEC: u32 = 1_000_000_000;

/// Wall-clock instant: unsigned seconds and nanoseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RosTime {
    pub sec: u32,
    pub nsec: u32,
}

impl RosTime {
    pub fn new(sec: u32, nsec: u32) -> Self {
        Self { sec, nsec }
    }

    /// Split a floating-point seconds value into integral seconds and
    /// nanoseconds. Negative and out-of-range inputs saturate.
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_nan() || secs <= 0.0 {
            return Self::default();
        }
        match split_secs(secs) {
            (sec, nsec) if sec <= i64::from(u32::MAX) => Self::new(sec as u32, nsec),
            _ => Self::new(u32::MAX, NSEC_PER_SEC - 1),
        }
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.sec as f64 + self.nsec as f64 * 1e-9
    }
}

impl Display for RosTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.sec, self.nsec)
    }
}

/// Signed span of time.
///
/// Normalized values keep `nsec` in `0..1_000_000_000`, with the sign carried
/// by `sec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RosDuration {
    pub sec: i32,
    pub nsec: i32,
}

impl RosDuration {
    pub fn new(sec: i32, nsec: i32) -> Self {
        Self { sec, nsec }
    }

    /// Like [`RosTime::from_secs_f64`]; out-of-range inputs saturate at the
    /// `i32` second bounds.
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_nan() {
            return Self::default();
        }
        let (sec, nsec) = split_secs(secs);
        if sec > i64::from(i32::MAX) {
            Self::new(i32::MAX, NSEC_PER_SEC as i32 - 1)
        } else if sec < i64::from(i32::MIN) {
            Self::new(i32::MIN, 0)
        } else {
            Self::new(sec as i32, nsec as i32)
        }
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.sec as f64 + self.nsec as f64 * 1e-9
    }
}

impl Display for RosDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.sec < 0 && self.nsec > 0 {
            // -1.25s is stored as sec = -2, nsec = 750_000_000
            let total = self.sec as i64 * NSEC_PER_SEC as i64 + self.nsec as i64;
            let abs = total.unsigned_abs();
            write!(
                f,
                "-{}.{:09}",
                abs / NSEC_PER_SEC as u64,
                abs % NSEC_PER_SEC as u64
            )
        } else {
            write!(f, "{}.{:09}", self.sec, self.nsec)
        }
    }
}

/// Floor-split into whole seconds and rounded nanoseconds, carrying a
/// rounding overflow into the seconds.
fn split_secs(secs: f64) -> (i64, u32) {
    let whole = secs.floor();
    let mut sec = whole as i64;
    let mut nsec = ((secs - whole) * NSEC_PER_SEC as f64).round() as u32;
    if nsec >= NSEC_PER_SEC {
        sec += 1;
        nsec -= NSEC_PER_SEC;
    }
    (sec, nsec)
}
