//! The block-processing loop.
//!
//! [`BlockLoop`] owns the four transfer engines, the synchronization gate,
//! the block processor and the indicator lines, and wires them together:
//!
//! ```text
//! SampleClock tick ──► TransferEngine × 4 ──completion──► on_transfer_complete
//!                                                              │
//!                       acknowledge engine errors, toggle line │
//!                                                              ▼
//!                                    SyncGate ──ready + verified──► BlockProcessor
//!                                        │
//!                                        └──desync──► FaultCause ──► FaultReporter
//! ```
//!
//! On hardware the engines are DMA streams and each completion interrupt
//! calls [`BlockLoop::service`]. In software, [`BlockLoop::tick`] plays the
//! role of the timer and the streams together, which is what the integration
//! tests drive.
//!
//! ## Usage
//!
//! ```ignore
//! let config = LoopConfig::new().with_channels(ChannelCount::Two);
//! let mut lp = BlockLoop::<16, _, _>::new(config, PassThrough, indicator)?;
//! lp.start_or_halt(|ind, cause| reporter.halt(ind, cause));
//!
//! // DMA stream interrupt for ADC1:
//! lp.service(EngineId::InputA, |ind, cause| reporter.halt(ind, cause));
//! ```


use core::convert::Infallible;

use crate::buffer::Half;
use crate::config::LoopConfig;
use crate::constants::{ENGINE_COUNT, MAX_CHANNELS, MID_SCALE};
use crate::error::{ConfigError, FaultCause};
use crate::gate::{HalfSelectors, SyncGate};
use crate::indicator::{Indicator, Line};
use crate::io::clock::{FilterClock, SampleClock};
use crate::io::engine::{Direction, EngineId, HalfSelector, TransferEngine};
use crate::processor::{BlockProcessor, Blocks};

/// Double-buffered ADC → processor → DAC loop with blocks of `N` samples.
pub struct BlockLoop<const N: usize, P, I> {
    config: LoopConfig,
    clock: SampleClock,
    inputs: [TransferEngine<N>; MAX_CHANNELS],
    outputs: [TransferEngine<N>; MAX_CHANNELS],
    gate: SyncGate,
    processor: P,
    indicator: I,
    ticks: u64,
    engine_errors: [u32; ENGINE_COUNT],
}

impl<const N: usize, P, I> BlockLoop<N, P, I>
where
    P: BlockProcessor<N>,
    I: Indicator,
{
    /// Validate `config` for blocks of `N` and build an idle loop.
    pub fn new(config: LoopConfig, processor: P, indicator: I) -> Result<Self, ConfigError> {
        config.validate(N)?;
        let clock = SampleClock::new(config.reference_clock_hz, config.sample_rate_hz)?;

        Ok(BlockLoop {
            config,
            clock,
            inputs: [
                TransferEngine::new(EngineId::InputA),
                TransferEngine::new(EngineId::InputB),
            ],
            outputs: [
                TransferEngine::new(EngineId::OutputA),
                TransferEngine::new(EngineId::OutputB),
            ],
            gate: SyncGate::new(config.channels, N),
            processor,
            indicator,
            ticks: 0,
            engine_errors: [0; ENGINE_COUNT],
        })
    }

    /// Settings for the anti-aliasing filter clock, if the board has one.
    pub fn filter_clock(&self) -> Option<FilterClock> {
        self.config
            .anti_alias_cutoff_hz
            .map(|fc| FilterClock::anti_alias(self.config.reference_clock_hz, fc))
    }

    /// Initialize the processor and arm the engines of every configured lane.
    pub fn start(&mut self) -> Result<(), FaultCause> {
        if let Err(err) = self.processor.init() {
            #[cfg(feature = "defmt")]
            defmt::error!("processor init failed: {}", err);
            return Err(FaultCause::Init(err));
        }

        for lane in 0..MAX_CHANNELS {
            if self.config.channels.is_active(lane) {
                self.inputs[lane].arm();
                self.outputs[lane].arm();
            }
        }
        self.indicator.set_high(Line::Idle);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "block loop started: {} lane(s), N = {}, {} Hz",
            self.config.channels.get(),
            N,
            self.clock.actual_rate_hz()
        );
        Ok(())
    }

    /// [`start`](Self::start), handing an init failure to `halt`.
    ///
    /// `halt` must not return; its [`Infallible`] result cannot be built.
    pub fn start_or_halt<F>(&mut self, halt: F)
    where
        F: FnOnce(&mut dyn Indicator, FaultCause) -> Infallible,
    {
        if let Err(cause) = self.start() {
            match halt(&mut self.indicator, cause) {}
        }
    }

    /// One sample clock period.
    ///
    /// Every armed engine transfers one sample: inputs capture `adc[lane]`,
    /// outputs emit into the returned array (mid-scale on idle lanes). The
    /// completions raised by this tick are then dispatched in engine order.
    pub fn tick(&mut self, adc: [u16; MAX_CHANNELS]) -> Result<[u16; MAX_CHANNELS], FaultCause> {
        if self.gate.is_faulted() {
            return Err(FaultCause::Halted);
        }
        self.ticks += 1;
        self.indicator.toggle(Line::ClockTick);

        let mut completed = [None; ENGINE_COUNT];
        let mut dac = [MID_SCALE; MAX_CHANNELS];
        for lane in 0..MAX_CHANNELS {
            let mut dr = adc[lane];
            if let Some(done) = self.inputs[lane].step(&mut dr) {
                completed[done.engine.index()] = Some(done.engine);
            }
            if let Some(done) = self.outputs[lane].step(&mut dac[lane]) {
                completed[done.engine.index()] = Some(done.engine);
            }
        }

        for id in completed.into_iter().flatten() {
            self.on_transfer_complete(id)?;
        }
        Ok(dac)
    }

    /// Transfer-complete handler for engine `id`.
    ///
    /// Acknowledges and counts any pending engine errors, then notifies the
    /// gate. When this completion makes the gate ready and the halves check
    /// out, the processor runs on the returned half before this returns.
    pub fn on_transfer_complete(&mut self, id: EngineId) -> Result<Option<Half>, FaultCause> {
        let errors = self.engine_mut(id).acknowledge();
        if !errors.is_empty() {
            self.engine_errors[id.index()] =
                self.engine_errors[id.index()].saturating_add(errors.count());
            #[cfg(feature = "defmt")]
            defmt::warn!("{} reported {}", id, errors);
        }
        self.indicator.toggle(Line::Engine(id));

        let (inputs, outputs) = (&self.inputs, &self.outputs);
        let ready = self.gate.on_complete(id, || HalfSelectors {
            input: [inputs[0].active_half(), inputs[1].active_half()],
            output: [outputs[0].active_half(), outputs[1].active_half()],
        });

        match ready {
            Ok(Some(half)) => {
                self.process(half);
                Ok(Some(half))
            }
            Ok(None) => Ok(None),
            Err(cause) => {
                self.stop();
                Err(cause)
            }
        }
    }

    /// [`on_transfer_complete`](Self::on_transfer_complete) for interrupt
    /// context: a fault is handed to `halt` and never comes back.
    pub fn service<F>(&mut self, id: EngineId, halt: F) -> Option<Half>
    where
        F: FnOnce(&mut dyn Indicator, FaultCause) -> Infallible,
    {
        match self.on_transfer_complete(id) {
            Ok(half) => half,
            Err(cause) => match halt(&mut self.indicator, cause) {},
        }
    }

    fn process(&mut self, half: Half) {
        let (this, other) = match half {
            Half::A => (Line::HalfA, Line::HalfB),
            Half::B => (Line::HalfB, Line::HalfA),
        };
        self.indicator.set_high(this);
        self.indicator.set_low(other);
        self.indicator.set_low(Line::Idle);

        let second = self.config.channels.is_active(1);
        let [in_a, in_b] = &self.inputs;
        let [out_a, out_b] = &mut self.outputs;
        let blocks = Blocks {
            inputs: [Some(in_a.half(half)), second.then(|| in_b.half(half))],
            outputs: [
                Some(out_a.half_mut(half)),
                if second { Some(out_b.half_mut(half)) } else { None },
            ],
        };
        self.processor.process(blocks, &mut self.indicator);

        self.indicator.set_high(Line::Idle);
    }

    fn stop(&mut self) {
        for engine in self.inputs.iter_mut().chain(self.outputs.iter_mut()) {
            engine.disarm();
        }
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn clock(&self) -> &SampleClock {
        &self.clock
    }

    pub fn engine(&self, id: EngineId) -> &TransferEngine<N> {
        match id.direction() {
            Direction::Input => &self.inputs[id.lane()],
            Direction::Output => &self.outputs[id.lane()],
        }
    }

    pub fn engine_mut(&mut self, id: EngineId) -> &mut TransferEngine<N> {
        match id.direction() {
            Direction::Input => &mut self.inputs[id.lane()],
            Direction::Output => &mut self.outputs[id.lane()],
        }
    }

    pub fn gate(&self) -> &SyncGate {
        &self.gate
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    /// Sample clock ticks seen by [`tick`](Self::tick).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Engine error conditions acknowledged for `id` so far.
    pub fn error_count(&self, id: EngineId) -> u32 {
        self.engine_errors[id.index()]
    }
}
