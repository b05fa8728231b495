//! Buffer synchronization gate.
//!
//! Collects one transfer-complete notification per configured engine and
//! releases the block processor exactly once per block period, after checking
//! that every engine targets the expected half.
//!
//! ## States
//!
//! ```text
//!            notify (flag missing)          notify (last flag)
//! Awaiting ─────────────────────► Awaiting ──────────────────► verify
//!    ▲                                                         │   │
//!    └──────────── release: clear all flags ◄──── halves agree ┘   │
//!                                                                  ▼
//!                                                 halves disagree: Faulted
//! ```
//!
//! Flags live in one atomic bitmap (bit `i` = engine `i`, see
//! [`EngineId::bit`]) so that setting and clearing them is safe from the
//! completion handlers. The clear is a single store of zero.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::buffer::Half;
use crate::config::ChannelCount;
use crate::error::FaultCause;
use crate::io::engine::EngineId;

/// Active-half selectors of all four engines, sampled when the gate is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HalfSelectors {
    /// Input lanes A and B.
    pub input: [Half; 2],
    /// Output lanes A and B.
    pub output: [Half; 2],
}

impl HalfSelectors {
    /// Every engine on the same half.
    pub const fn uniform(half: Half) -> Self {
        HalfSelectors {
            input: [half, half],
            output: [half, half],
        }
    }

    pub fn get(&self, id: EngineId) -> Half {
        match id {
            EngineId::InputA => self.input[0],
            EngineId::InputB => self.input[1],
            EngineId::OutputA => self.output[0],
            EngineId::OutputB => self.output[1],
        }
    }

    pub fn set(&mut self, id: EngineId, half: Half) {
        match id {
            EngineId::InputA => self.input[0] = half,
            EngineId::InputB => self.input[1] = half,
            EngineId::OutputA => self.output[0] = half,
            EngineId::OutputB => self.output[1] = half,
        }
    }
}

/// Observable gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateState {
    /// Some configured flags are still missing.
    Awaiting,
    /// All configured flags are set and not yet released.
    Ready,
    /// Synchronization was lost. Terminal.
    Faulted,
}

/// Synchronization gate for up to four engines.
pub struct SyncGate {
    flags: AtomicU8,
    required: u8,
    channels: ChannelCount,
    block_len: usize,
    faulted: AtomicBool,
    releases: AtomicU32,
    overruns: AtomicU32,
}

impl SyncGate {
    /// Gate for `channels` lanes per direction and blocks of `block_len`.
    pub const fn new(channels: ChannelCount, block_len: usize) -> Self {
        let required = match channels {
            ChannelCount::One => EngineId::InputA.bit() | EngineId::OutputA.bit(),
            ChannelCount::Two => {
                EngineId::InputA.bit()
                    | EngineId::InputB.bit()
                    | EngineId::OutputA.bit()
                    | EngineId::OutputB.bit()
            }
        };
        SyncGate {
            flags: AtomicU8::new(0),
            required,
            channels,
            block_len,
            faulted: AtomicBool::new(false),
            releases: AtomicU32::new(0),
            overruns: AtomicU32::new(0),
        }
    }

    /// Bit mask of the engines that must report before a release.
    pub fn required_mask(&self) -> u8 {
        self.required
    }

    /// Whether `id` takes part in synchronization.
    pub fn is_required(&self, id: EngineId) -> bool {
        self.required & id.bit() != 0
    }

    /// Record a completion of `id`.
    ///
    /// Returns `true` when this notification set the last missing flag.
    /// A flag that is already set counts as an overrun. Notifications from
    /// engines outside the configured set are ignored.
    pub fn notify(&self, id: EngineId) -> bool {
        let bit = id.bit();
        if self.required & bit == 0 {
            return false;
        }

        let prev = self.flags.fetch_or(bit, Ordering::AcqRel);
        if prev & bit != 0 {
            self.overruns.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "defmt")]
            defmt::warn!("gate overrun: {} completed twice", id);
            return false;
        }
        (prev | bit) & self.required == self.required
    }

    /// Check the half selectors observed at ready time and pick the half to
    /// hand to the processor.
    ///
    /// For blocks longer than one sample every configured engine must be on
    /// the same half. For single-sample blocks the output engines are already
    /// one transfer ahead, so they must be on the *opposite* half of the
    /// inputs.
    pub fn verify(&self, sel: &HalfSelectors) -> Result<Half, FaultCause> {
        let lead = sel.input[0];
        let in_sync = match (self.channels, self.block_len == 1) {
            (ChannelCount::Two, false) => {
                sel.input[1] == lead && sel.output[0] == lead && sel.output[1] == lead
            }
            (ChannelCount::Two, true) => {
                sel.input[1] == lead && sel.output[0] != lead && sel.output[1] != lead
            }
            (ChannelCount::One, false) => sel.output[0] == lead,
            (ChannelCount::One, true) => sel.output[0] != lead,
        };

        if in_sync {
            // Engines have moved on to `lead`; the other half is complete.
            Ok(lead.other())
        } else {
            Err(FaultCause::Desync(*sel))
        }
    }

    /// Clear every flag at once and count the release.
    pub fn release(&self) {
        self.flags.store(0, Ordering::Release);
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    /// Full notification path: record, and on the last flag verify and
    /// release.
    ///
    /// `selectors` is only sampled when the gate becomes ready. Returns the
    /// half to process, `None` while flags are missing, or the fault. Once
    /// faulted every call returns [`FaultCause::Halted`].
    pub fn on_complete<F>(&self, id: EngineId, selectors: F) -> Result<Option<Half>, FaultCause>
    where
        F: FnOnce() -> HalfSelectors,
    {
        if self.is_faulted() {
            return Err(FaultCause::Halted);
        }
        if !self.notify(id) {
            return Ok(None);
        }

        match self.verify(&selectors()) {
            Ok(half) => {
                self.release();
                Ok(Some(half))
            }
            Err(cause) => {
                self.faulted.store(true, Ordering::Release);
                #[cfg(feature = "defmt")]
                defmt::error!("gate faulted: {}", cause);
                Err(cause)
            }
        }
    }

    pub fn state(&self) -> GateState {
        if self.is_faulted() {
            GateState::Faulted
        } else if self.pending() & self.required == self.required {
            GateState::Ready
        } else {
            GateState::Awaiting
        }
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted.load(Ordering::Acquire)
    }

    /// Currently set flags.
    pub fn pending(&self) -> u8 {
        self.flags.load(Ordering::Acquire)
    }

    /// Number of successful releases so far.
    pub fn releases(&self) -> u32 {
        self.releases.load(Ordering::Relaxed)
    }

    /// Number of completions that arrived while the engine's flag was
    /// still set.
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }
}
