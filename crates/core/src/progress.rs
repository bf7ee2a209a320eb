//! Simulated progress for a tool that reports none.
//!
//! The tool gives no feedback while it runs, so progress is estimated from
//! the image size: a step is chosen so the indicator reaches the end about
//! when the tool is expected to finish, then it starts over. Decimal
//! arithmetic keeps the many small additions from drifting.

use log::{debug, info};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const PIXELS_PER_MEGAPIXEL: u64 = 1_000_000;

/// Size of one progress step, one step per poll tick.
///
/// The tool is expected to need `seconds_per_megapixel` seconds for every
/// million pixels, and a tick lasts one second, so the step is the inverse of
/// the expected runtime. Returns `None` when that runtime is zero; callers
/// then skip progress reporting.
///
/// ```
/// use guetzli_export_core::progress::compute_step;
/// use rust_decimal::Decimal;
///
/// assert_eq!(compute_step(2_000_000, 10), Some(Decimal::new(5, 2)));
/// assert_eq!(compute_step(0, 60), None);
/// ```
pub fn compute_step(pixel_count: u64, seconds_per_megapixel: u32) -> Option<Decimal> {
    let megapixels = Decimal::from(pixel_count) / Decimal::from(PIXELS_PER_MEGAPIXEL);
    let estimated_seconds = megapixels.checked_mul(Decimal::from(seconds_per_megapixel))?;

    if estimated_seconds.is_zero() {
        return None;
    }

    debug!("Estimated tool runtime: {estimated_seconds}s");
    Decimal::ONE.checked_div(estimated_seconds)
}

/// A cyclic indicator in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    current: Decimal,
    step: Decimal,
}

impl ProgressState {
    #[must_use]
    pub fn new(step: Decimal) -> Self {
        Self {
            current: Decimal::ZERO,
            step,
        }
    }

    #[must_use]
    pub fn current(&self) -> Decimal {
        self.current
    }

    #[must_use]
    pub fn step(&self) -> Decimal {
        self.step
    }

    /// Moves forward by one step, wrapping to zero on reaching one.
    pub fn advance(&mut self) -> Decimal {
        self.current += self.step;
        if self.current >= Decimal::ONE {
            self.current = Decimal::ZERO;
        }
        self.current
    }

    /// The current value as a float, for display.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.current.to_f64().unwrap_or(0.0)
    }
}

/// Receives progress for display. Mirrors a host progress bar: one `begin`,
/// any number of `update`s, one `finish`.
pub trait ProgressSink {
    fn begin(&mut self, label: &str);

    fn update(&mut self, state: &ProgressState);

    fn finish(&mut self);
}

/// Reports progress through the `log` crate.
#[derive(Debug, Default)]
pub struct LogProgress {
    label: String,
}

impl ProgressSink for LogProgress {
    fn begin(&mut self, label: &str) {
        self.label = label.to_string();
        info!("{label}");
    }

    fn update(&mut self, state: &ProgressState) {
        debug!("{}: {:.0}%", self.label, state.fraction() * 100.0);
    }

    fn finish(&mut self) {
        info!("{}: done", self.label);
    }
}
