//! Double-buffered transfer engine (one DMA stream per lane and direction).
//!
//! [`TransferEngine`] is the software model of a DMA stream in double-buffer
//! mode: every sample-clock tick moves one sample between the converter
//! register and the active half of its [`BufferPair`]. When the active half
//! is exhausted the engine switches to the other half by itself and reports
//! a [`Completion`] naming the half it just finished.
//!
//! ## Direction
//!
//! ```text
//! Input:   ADC DR ──tick──► active half [pos]          (capture)
//! Output:  active half [pos] ──► holding ──tick──► DAC (emit, one ahead)
//! ```
//!
//! Output engines prefetch: arming loads the first sample into the DAC
//! holding register, and each tick emits the held sample before loading the
//! next. An output engine therefore finishes a half one tick before the
//! matching input engine, which is why its active-half selector leads the
//! inputs' when blocks are a single sample long.
//!
//! ## Usage
//!
//! ```ignore
//! let mut adc1 = TransferEngine::<16>::new(EngineId::InputA);
//! adc1.arm();
//! // In the timer/DMA request path:
//! let mut dr = adc_result;
//! if let Some(done) = adc1.step(&mut dr) {
//!     // done.half has been filled, the engine already targets the other one
//! }
//! ```

use crate::buffer::{Block, BufferPair, Half};
use crate::constants::{ENGINE_COUNT, MID_SCALE};
use crate::error::EngineErrors;

/// Transfer direction relative to memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Converter register → buffer (ADC).
    Input,
    /// Buffer → converter register (DAC).
    Output,
}

/// Identity of one of the four transfer engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineId {
    InputA,
    InputB,
    OutputA,
    OutputB,
}

impl EngineId {
    pub const ALL: [EngineId; ENGINE_COUNT] = [
        EngineId::InputA,
        EngineId::InputB,
        EngineId::OutputA,
        EngineId::OutputB,
    ];

    pub const fn index(self) -> usize {
        match self {
            EngineId::InputA => 0,
            EngineId::InputB => 1,
            EngineId::OutputA => 2,
            EngineId::OutputB => 3,
        }
    }

    /// Lane number within its direction (0 = A, 1 = B).
    pub const fn lane(self) -> usize {
        match self {
            EngineId::InputA | EngineId::OutputA => 0,
            EngineId::InputB | EngineId::OutputB => 1,
        }
    }

    pub const fn direction(self) -> Direction {
        match self {
            EngineId::InputA | EngineId::InputB => Direction::Input,
            EngineId::OutputA | EngineId::OutputB => Direction::Output,
        }
    }

    pub const fn input(lane: usize) -> EngineId {
        if lane == 0 {
            EngineId::InputA
        } else {
            EngineId::InputB
        }
    }

    pub const fn output(lane: usize) -> EngineId {
        if lane == 0 {
            EngineId::OutputA
        } else {
            EngineId::OutputB
        }
    }

    /// Flag bit used by the synchronization gate.
    pub const fn bit(self) -> u8 {
        1 << self.index()
    }
}

/// Transfer-complete notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Completion {
    pub engine: EngineId,
    /// Half that was just finished. The engine now targets `half.other()`.
    pub half: Half,
}

/// Read access to an engine's current memory target.
///
/// Implemented by [`TransferEngine`]; a hardware port implements it over the
/// DMA stream's `CT` bit.
pub trait HalfSelector {
    fn active_half(&self) -> Half;
}

/// One double-buffered DMA stream.
pub struct TransferEngine<const N: usize> {
    id: EngineId,
    pair: BufferPair<N>,
    /// Next sample index within the active half.
    position: usize,
    /// DAC holding register (outputs only).
    holding: u16,
    pending: EngineErrors,
    armed: bool,
}

impl<const N: usize> TransferEngine<N> {
    /// Create an idle engine. Output buffers start at mid-scale (0 V).
    pub const fn new(id: EngineId) -> Self {
        let pair = match id.direction() {
            Direction::Input => BufferPair::new(),
            Direction::Output => BufferPair::filled(MID_SCALE),
        };
        TransferEngine {
            id,
            pair,
            position: 0,
            holding: MID_SCALE,
            pending: EngineErrors::NONE,
            armed: false,
        }
    }

    pub fn id(&self) -> EngineId {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.id.direction()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Enable the stream on half A.
    ///
    /// Output engines load the first sample into the holding register right
    /// away; if that exhausts the half (`N == 1`) the engine moves to half B
    /// without reporting a completion.
    pub fn arm(&mut self) {
        self.pair.set_active(Half::A);
        self.position = 0;
        self.pending = EngineErrors::NONE;
        self.armed = true;

        if self.direction() == Direction::Output {
            self.holding = self.pair.half(Half::A)[0];
            self.position = 1;
            if self.position == N {
                self.pair.flip();
                self.position = 0;
            }
        }
    }

    /// Stop the stream; subsequent ticks are ignored.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Perform one clock-triggered transfer.
    ///
    /// For inputs `register` is the conversion result to capture; for outputs
    /// the emitted code is written into it.
    pub fn step(&mut self, register: &mut u16) -> Option<Completion> {
        if !self.armed {
            return None;
        }

        let active = self.pair.active();
        match self.direction() {
            Direction::Input => {
                self.pair.half_mut(active)[self.position] = *register;
            }
            Direction::Output => {
                *register = self.holding;
                self.holding = self.pair.half(active)[self.position];
            }
        }

        self.position += 1;
        if self.position < N {
            return None;
        }

        self.position = 0;
        let finished = self.pair.flip();
        Some(Completion {
            engine: self.id,
            half: finished,
        })
    }

    /// Latch an error condition (hardware model / fault injection).
    pub fn raise(&mut self, errors: EngineErrors) {
        self.pending |= errors;
    }

    /// Pending error conditions, not cleared.
    pub fn pending_errors(&self) -> EngineErrors {
        self.pending
    }

    /// Clear and return the pending error conditions.
    pub fn acknowledge(&mut self) -> EngineErrors {
        core::mem::take(&mut self.pending)
    }

    /// Position within the active half.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn buffers(&self) -> &BufferPair<N> {
        &self.pair
    }

    pub fn buffers_mut(&mut self) -> &mut BufferPair<N> {
        &mut self.pair
    }

    pub fn half(&self, half: Half) -> &Block<N> {
        self.pair.half(half)
    }

    pub fn half_mut(&mut self, half: Half) -> &mut Block<N> {
        self.pair.half_mut(half)
    }
}

impl<const N: usize> HalfSelector for TransferEngine<N> {
    fn active_half(&self) -> Half {
        self.pair.active()
    }
}
