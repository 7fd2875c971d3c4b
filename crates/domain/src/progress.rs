use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Completion percentage reported while a maintenance task runs.
///
/// Values are always within `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ProgressPercent(f64);

impl ProgressPercent {
    /// Progress before any work has been done.
    pub const START: Self = Self(0.0);

    /// Progress of a finished run.
    pub const COMPLETE: Self = Self(100.0);

    /// Creates a percentage from a raw value, clamping into range.
    ///
    /// NaN is treated as zero.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::START;
        }

        Self(value.clamp(0.0, 100.0))
    }

    /// Returns `100 × processed / total`; an empty workload is complete.
    #[must_use]
    pub fn from_ratio(processed: usize, total: usize) -> Self {
        if total == 0 {
            return Self::COMPLETE;
        }

        // Precision loss only matters above 2^53 items.
        #[allow(clippy::cast_precision_loss)]
        let value = 100.0 * (processed as f64) / (total as f64);
        Self::new(value)
    }

    /// Returns the raw percentage value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns whether this value marks a finished run.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0 >= 100.0
    }
}

impl Display for ProgressPercent {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{:.1}%", self.0)
    }
}
