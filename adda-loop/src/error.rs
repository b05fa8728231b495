//! Error and fault types.
//!
//! The loop has a binary propagation policy: engine-level conditions are
//! acknowledged and counted ([`EngineErrors`]), everything else becomes a
//! [`FaultCause`] that ends in the fault reporter.

use core::fmt;

use crate::gate::HalfSelectors;

/// Rejected [`LoopConfig`](crate::config::LoopConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Sample rate of 0 Hz.
    ZeroSampleRate,
    /// Sample rate rounds to a timer period of zero reference ticks.
    RateAboveReference,
    /// Block length of zero samples.
    EmptyBlock,
    /// Timer period does not fit the 32-bit auto-reload register.
    PeriodOverflow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroSampleRate => f.write_str("sample rate must be non-zero"),
            ConfigError::RateAboveReference => {
                f.write_str("sample rate exceeds twice the reference clock")
            }
            ConfigError::EmptyBlock => f.write_str("block length must be at least one sample"),
            ConfigError::PeriodOverflow => f.write_str("sample clock period exceeds 32 bits"),
        }
    }
}

/// Failure of a processor's one-time initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Transform length is not a power of two in `16..=4096`.
    UnsupportedTransformSize { size: usize },
    /// Overlap-add needs a transform exactly four blocks long.
    OverlapMismatch { block: usize, transform: usize },
    /// The transform history is not longer than one block.
    BlockExceedsTransform { block: usize, transform: usize },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::UnsupportedTransformSize { size } => {
                write!(f, "unsupported transform size {size}")
            }
            InitError::OverlapMismatch { block, transform } => write!(
                f,
                "transform size {transform} is not four times the block length {block}"
            ),
            InitError::BlockExceedsTransform { block, transform } => write!(
                f,
                "transform size {transform} must exceed block length {block}"
            ),
        }
    }
}

/// Reason the loop entered its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultCause {
    /// Engines disagreed on the active half when the gate became ready.
    Desync(HalfSelectors),
    /// The processor could not be initialized.
    Init(InitError),
    /// The loop is already faulted; nothing is processed any more.
    Halted,
}

impl From<InitError> for FaultCause {
    fn from(err: InitError) -> Self {
        FaultCause::Init(err)
    }
}

impl fmt::Display for FaultCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultCause::Desync(sel) => write!(f, "double buffers out of sync: {sel:?}"),
            FaultCause::Init(err) => write!(f, "processing init failed: {err}"),
            FaultCause::Halted => f.write_str("loop halted"),
        }
    }
}

/// Pending engine-level error conditions (DMA stream interrupt flags).
///
/// These are cleared when acknowledged and never halt the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineErrors(u8);

impl EngineErrors {
    /// No condition pending.
    pub const NONE: Self = EngineErrors(0);
    /// Bus error during a transfer.
    pub const TRANSFER: Self = EngineErrors(1 << 0);
    /// FIFO under/overrun.
    pub const FIFO: Self = EngineErrors(1 << 1);
    /// Direct-mode error.
    pub const DIRECT_MODE: Self = EngineErrors(1 << 2);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Number of distinct conditions set.
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl core::ops::BitOr for EngineErrors {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        EngineErrors(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for EngineErrors {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_combine() {
        let mut e = EngineErrors::NONE;
        assert!(e.is_empty());
        e |= EngineErrors::FIFO;
        e |= EngineErrors::TRANSFER;
        assert!(e.contains(EngineErrors::FIFO));
        assert!(e.contains(EngineErrors::TRANSFER));
        assert!(!e.contains(EngineErrors::DIRECT_MODE));
        assert_eq!(e.count(), 2);
    }

    #[test]
    fn init_error_converts_to_fault() {
        let cause: FaultCause = InitError::UnsupportedTransformSize { size: 24 }.into();
        assert_eq!(
            cause,
            FaultCause::Init(InitError::UnsupportedTransformSize { size: 24 })
        );
    }

    #[test]
    fn display_mentions_values() {
        let text = std::format!(
            "{}",
            InitError::OverlapMismatch {
                block: 16,
                transform: 32
            }
        );
        assert!(text.contains("32"));
        assert!(text.contains("16"));
    }
}
