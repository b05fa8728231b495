//! # adda-loop
//!
//! A `no_std`, zero-allocation block-processing loop for microcontrollers
//! that sample with DMA-driven ADCs and play back through DMA-driven DACs.
//! Up to two input lanes and two output lanes are double-buffered by four
//! transfer engines paced by one sample clock. A synchronization gate waits
//! for every engine to finish its half, checks that they all agree on the
//! active half, and runs a [`BlockProcessor`] on the halves they just left.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Memory | [`buffer`] | Two-slot double buffers with an active-half index |
//! | I/O | [`io`] | Transfer engines, sample clock, anti-alias filter clock |
//! | Sync | [`gate`] | Completion flags, half verification, release |
//! | Trait | [`processor`] | `BlockProcessor` contract and `Blocks` bundle |
//! | Payloads | [`payloads`] | Pass-through, spectrum, overlap-add, FIR, echo residual |
//! | DSP | [`dsp`] | FFT, delay lines, windows, saturation (feature-gated) |
//! | Board | [`indicator`] / [`fault`] / [`idle`] | LEDs and probes, terminal blink, main loop |
//! | Loop | [`system`] | [`BlockLoop`] wiring all of the above |
//!
//! ## Quick start
//!
//! ```ignore
//! use adda_loop::{BlockLoop, ChannelCount, EngineId, FaultReporter, LoopConfig};
//! use adda_loop::payloads::FirFilter;
//!
//! let config = LoopConfig::new().with_channels(ChannelCount::One);
//! let mut lp = BlockLoop::<16, _, _>::new(config, FirFilter::band_pass(), leds)?;
//! let mut reporter = FaultReporter::new(delay);
//!
//! lp.start_or_halt(|ind, cause| reporter.halt(ind, cause));
//!
//! // In each DMA stream interrupt:
//! lp.service(EngineId::InputA, |ind, cause| reporter.halt(ind, cause));
//!
//! // Main context:
//! adda_loop::idle::run(|| {});
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `dsp` | yes | DSP math and every payload except pass-through |
//! | `defmt` | no | `defmt::Format` on public types, log lines on faults and absorbed errors |
//!
//! ## Loop parameters
//!
//! - **Block size:** const generic `N`, at least one sample
//! - **Sample rate:** 8 kHz default ([`constants::DEFAULT_SAMPLE_RATE_HZ`]),
//!   rounded to the nearest whole timer period
//! - **Sample format:** `u16` converter codes, 0 V at [`constants::MID_SCALE`]
//! - **Latency:** two blocks from capture to emission

#![cfg_attr(not(test), no_std)]

pub mod constants;
pub mod config;
pub mod error;
pub mod buffer;
pub mod io;
pub mod gate;
pub mod processor;
pub mod payloads;
pub mod indicator;
pub mod fault;
pub mod idle;
pub mod system;

#[cfg(feature = "dsp")]
pub mod dsp;

pub use buffer::{Block, BufferPair, Half};
pub use config::{ChannelCount, LoopConfig};
pub use error::{ConfigError, EngineErrors, FaultCause, InitError};
pub use fault::FaultReporter;
pub use gate::{GateState, HalfSelectors, SyncGate};
pub use idle::IdleHook;
pub use indicator::{Indicator, Line, NoIndicator, PinIndicator};
pub use io::{EngineId, SampleClock, TransferEngine};
pub use processor::{BlockProcessor, Blocks};
pub use system::BlockLoop;
