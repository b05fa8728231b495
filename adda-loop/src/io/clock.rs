//! Timer period calculations.
//!
//! [`SampleClock`] is the trigger shared by all four engines. Its period is
//! the reference clock divided by the sample rate, rounded to the nearest
//! integer; the resulting rate error is not corrected.
//!
//! [`FilterClock`] drives the switched-capacitor anti-aliasing filter, which
//! needs a square wave at 100× its cut-off frequency.

use crate::error::ConfigError;

/// Fixed-period conversion trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleClock {
    reference_hz: u32,
    period: u32,
}

impl SampleClock {
    /// Nearest-integer period for `rate_hz` from `reference_hz`.
    pub fn new(reference_hz: u32, rate_hz: u32) -> Result<Self, ConfigError> {
        if rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        let rate = u64::from(rate_hz);
        let period = (u64::from(reference_hz) + rate / 2) / rate;
        if period == 0 {
            return Err(ConfigError::RateAboveReference);
        }
        let period = u32::try_from(period).map_err(|_| ConfigError::PeriodOverflow)?;
        Ok(SampleClock {
            reference_hz,
            period,
        })
    }

    /// Reference ticks per sample (auto-reload value).
    pub fn period_ticks(&self) -> u32 {
        self.period
    }

    /// Rate actually produced, truncated to whole hertz.
    pub fn actual_rate_hz(&self) -> u32 {
        self.reference_hz / self.period
    }

    pub fn reference_hz(&self) -> u32 {
        self.reference_hz
    }
}

/// PWM settings for the anti-aliasing filter clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterClock {
    pub prescaler: u32,
    pub period: u32,
    /// Compare value for a 50 % duty cycle.
    pub pulse: u32,
}

impl FilterClock {
    /// Lowest supported cut-off.
    pub const MIN_CUTOFF_HZ: u32 = 1;
    /// Highest supported cut-off.
    pub const MAX_CUTOFF_HZ: u32 = 45_000;
    /// Largest divider the 16-bit counter handles without the prescaler.
    const PRESCALE_THRESHOLD: u32 = 32_768;

    /// Settings for a filter clock of 100 × `cutoff_hz` (clamped to
    /// `1..=45000`) from `reference_hz`.
    pub fn anti_alias(reference_hz: u32, cutoff_hz: u32) -> Self {
        let fc = cutoff_hz.clamp(Self::MIN_CUTOFF_HZ, Self::MAX_CUTOFF_HZ);
        let clock = 100 * u64::from(fc);
        let divider = ((u64::from(reference_hz) + clock / 2) / clock) as u32;

        let (prescaler, period) = if divider > Self::PRESCALE_THRESHOLD {
            let prescaler = divider / Self::PRESCALE_THRESHOLD;
            (prescaler, (divider / (prescaler + 1)).saturating_sub(1))
        } else {
            (0, divider.saturating_sub(1))
        };

        FilterClock {
            prescaler,
            period,
            pulse: period / 2,
        }
    }
}
