//! Loop configuration.
//!
//! The block length is a const generic of [`BlockLoop`](crate::system::BlockLoop);
//! everything else the core consumes lives in [`LoopConfig`].

use crate::constants::{
    DEFAULT_ANTI_ALIAS_CUTOFF_HZ, DEFAULT_CHANNELS, DEFAULT_REFERENCE_CLOCK_HZ,
    DEFAULT_SAMPLE_RATE_HZ,
};
use crate::error::ConfigError;
use crate::io::clock::SampleClock;

/// Number of active lanes per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelCount {
    /// ADC1 → DAC1 only.
    One,
    /// ADC1/ADC2 → DAC1/DAC2.
    Two,
}

impl ChannelCount {
    /// `1` or `2` lanes; anything else is `None`.
    pub const fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ChannelCount::One),
            2 => Some(ChannelCount::Two),
            _ => None,
        }
    }

    pub const fn get(self) -> usize {
        match self {
            ChannelCount::One => 1,
            ChannelCount::Two => 2,
        }
    }

    /// Whether lane `index` (0 or 1) is in use.
    pub const fn is_active(self, index: usize) -> bool {
        index < self.get()
    }
}

/// Constants supplied to the core by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopConfig {
    pub channels: ChannelCount,
    pub sample_rate_hz: u32,
    pub reference_clock_hz: u32,
    /// Cut-off for the anti-aliasing filter clock, `None` if the board has none.
    pub anti_alias_cutoff_hz: Option<u32>,
}

impl LoopConfig {
    /// Board defaults from [`constants`](crate::constants): two channels at
    /// 8 kHz from an 84 MHz timer clock.
    pub const fn new() -> Self {
        let channels = match ChannelCount::from_count(DEFAULT_CHANNELS) {
            Some(channels) => channels,
            None => ChannelCount::Two,
        };
        LoopConfig {
            channels,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            reference_clock_hz: DEFAULT_REFERENCE_CLOCK_HZ,
            anti_alias_cutoff_hz: Some(DEFAULT_ANTI_ALIAS_CUTOFF_HZ),
        }
    }

    pub const fn with_channels(mut self, channels: ChannelCount) -> Self {
        self.channels = channels;
        self
    }

    pub const fn with_sample_rate(mut self, hz: u32) -> Self {
        self.sample_rate_hz = hz;
        self
    }

    pub const fn with_reference_clock(mut self, hz: u32) -> Self {
        self.reference_clock_hz = hz;
        self
    }

    pub const fn with_anti_alias_cutoff(mut self, hz: Option<u32>) -> Self {
        self.anti_alias_cutoff_hz = hz;
        self
    }

    /// Check the configuration for a block of `block_len` samples.
    pub fn validate(&self, block_len: usize) -> Result<(), ConfigError> {
        if block_len == 0 {
            return Err(ConfigError::EmptyBlock);
        }
        SampleClock::new(self.reference_clock_hz, self.sample_rate_hz)?;
        Ok(())
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_board_constants() {
        let cfg = LoopConfig::default();
        assert_eq!(cfg.channels, ChannelCount::Two);
        assert_eq!(cfg.sample_rate_hz, 8_000);
        assert_eq!(cfg.reference_clock_hz, 84_000_000);
        assert_eq!(cfg.anti_alias_cutoff_hz, Some(4_000));
        assert!(cfg.validate(1).is_ok());
    }

    #[test]
    fn rejects_empty_block() {
        assert_eq!(LoopConfig::new().validate(0), Err(ConfigError::EmptyBlock));
    }

    #[test]
    fn rejects_zero_rate() {
        let cfg = LoopConfig::new().with_sample_rate(0);
        assert_eq!(cfg.validate(4), Err(ConfigError::ZeroSampleRate));
    }

    #[test]
    fn channel_count_from_count() {
        assert_eq!(ChannelCount::from_count(1), Some(ChannelCount::One));
        assert_eq!(ChannelCount::from_count(2), Some(ChannelCount::Two));
        assert_eq!(ChannelCount::from_count(0), None);
        assert_eq!(ChannelCount::from_count(3), None);
        assert_eq!(
            ChannelCount::from_count(DEFAULT_CHANNELS),
            Some(LoopConfig::new().channels)
        );
    }

    #[test]
    fn channel_count_activity() {
        assert!(ChannelCount::One.is_active(0));
        assert!(!ChannelCount::One.is_active(1));
        assert!(ChannelCount::Two.is_active(1));
        assert_eq!(ChannelCount::Two.get(), 2);
    }
}
