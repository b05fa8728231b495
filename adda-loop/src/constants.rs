/// Maximum number of analog lanes per direction (ADC1/ADC2, DAC1/DAC2).
pub const MAX_CHANNELS: usize = 2;

/// Number of transfer engines: one per lane per direction.
pub const ENGINE_COUNT: usize = MAX_CHANNELS * 2;

/// Default number of active channels per direction.
pub const DEFAULT_CHANNELS: usize = 2;

/// Default sample rate in Hz. The nearest achievable rate is used.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 8_000;

/// Default timer reference clock in Hz (STM32F4 APB1 timer clock).
pub const DEFAULT_REFERENCE_CLOCK_HZ: u32 = 84_000_000;

/// Default cut-off of the switched-capacitor anti-aliasing filter in Hz.
pub const DEFAULT_ANTI_ALIAS_CUTOFF_HZ: u32 = 4_000;

/// Converter code for 0 V in the signed working representation.
pub const MID_SCALE: u16 = 32_768;
