//! Converter-side I/O: transfer engines and timer clocks.
//!
//! This module models the DMA streams that move samples between the ADC/DAC
//! data registers and the double buffers, and the timer that paces them.
//!
//! ## Components
//!
//! | Type | Direction | Description |
//! |------|-----------|-------------|
//! | [`TransferEngine`] | in or out | One double-buffered DMA stream |
//! | [`SampleClock`] | n/a | Shared conversion trigger |
//! | [`FilterClock`] | n/a | Anti-aliasing filter clock (PWM) |
//!
//! ## Engine layout
//!
//! | [`EngineId`] | Register | Gate bit |
//! |--------------|----------|----------|
//! | `InputA` | ADC1 DR | `0b0001` |
//! | `InputB` | ADC2 DR | `0b0010` |
//! | `OutputA` | DAC1 DHR | `0b0100` |
//! | `OutputB` | DAC2 DHR | `0b1000` |
//!
//! ## Double-buffer behaviour
//!
//! - Each engine owns a [`BufferPair`](crate::buffer::BufferPair) of two `N`-sample halves
//! - One sample moves per clock tick to/from the active half
//! - When the active half is done the engine switches halves on its own and
//!   reports which half it finished
//! - Software works on the half the engine is not using

pub mod clock;
pub mod engine;

pub use clock::{FilterClock, SampleClock};
pub use engine::{Completion, Direction, EngineId, HalfSelector, TransferEngine};
