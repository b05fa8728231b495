//! FFT spectrum display.
//!
//! Keeps the newest `M` samples of lane A, transforms them every period and
//! tracks an exponential mean of the power spectrum. Lane A's output plays
//! that mean back one bin at a time as a level an oscilloscope can show,
//! followed by a trigger pulse:
//!
//! ```text
//! position   0 .. M-1    M..M+3   M+4..M+7   M+8..M+11   M+12..M+15   M+16..M+19
//! output     log level   0        60000      40000       60000        0
//! ```
//!
//! Each position is held for [`HOLD_TIME`] output samples. Lane B passes
//! through.

use crate::dsp::fft::{magnitude_squared, Radix2Fft};
use crate::dsp::helpers::block_to_float;
use crate::error::InitError;
use crate::indicator::{Indicator, Line};
use crate::processor::{BlockProcessor, Blocks};

/// Output samples per displayed position.
pub const HOLD_TIME: u32 = 4;

/// Positions after the last bin used for the trigger pulse.
pub const SYNC_POSITIONS: usize = 20;

/// Pulse levels for positions `M..M+20`, one entry per four positions.
const SYNC_PATTERN: [u16; 5] = [0, 60_000, 40_000, 60_000, 0];

const LOG_OFFSET: f32 = 17.5;
const LOG_GAIN: f32 = 4000.0;
const LEVEL_MAX: f32 = 50_000.0;

/// Spectrum analyser over the newest `M` samples, fed `N` at a time.
pub struct SpectrumDisplay<const N: usize, const M: usize> {
    fft: Radix2Fft<M>,
    history: [f32; M],
    re: [f32; M],
    im: [f32; M],
    power: [f32; M],
    mean: [f32; M],
    position: usize,
    hold: u32,
    level: u16,
}

impl<const N: usize, const M: usize> SpectrumDisplay<N, M> {
    pub const fn new() -> Self {
        SpectrumDisplay {
            fft: Radix2Fft::new(),
            history: [0.0; M],
            re: [0.0; M],
            im: [0.0; M],
            power: [0.0; M],
            mean: [0.0; M],
            position: 0,
            hold: HOLD_TIME,
            level: 0,
        }
    }

    /// Running mean of `|X[k]|²`.
    pub fn mean_spectrum(&self) -> &[f32; M] {
        &self.mean
    }

    /// Scale a mean power to the displayed code.
    pub fn display_level(power: f32) -> u16 {
        ((libm::logf(power) - LOG_OFFSET) * LOG_GAIN).clamp(0.0, LEVEL_MAX) as u16
    }

    fn update_spectrum(&mut self, input: &[u16; N], probe: &mut dyn Indicator) {
        self.history.copy_within(N.., 0);
        block_to_float(input, &mut self.history[M - N..]);

        self.re = self.history;
        self.im = [0.0; M];

        probe.set_high(Line::Measure);
        self.fft.forward(&mut self.re, &mut self.im);
        probe.set_low(Line::Measure);

        magnitude_squared(&self.re, &self.im, &mut self.power);
        for (m, &p) in self.mean.iter_mut().zip(self.power.iter()) {
            *m = *m * 0.75 + p * 0.25;
        }
    }

    fn next_output(&mut self) -> u16 {
        let code = if self.position >= M {
            SYNC_PATTERN[(self.position - M) / 4]
        } else {
            if self.hold == HOLD_TIME {
                self.level = Self::display_level(self.mean[self.position]);
            }
            self.level
        };

        self.hold -= 1;
        if self.hold == 0 {
            self.hold = HOLD_TIME;
            self.position += 1;
            if self.position >= M + SYNC_POSITIONS {
                self.position = 0;
            }
        }
        code
    }
}

impl<const N: usize, const M: usize> Default for SpectrumDisplay<N, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, const M: usize> BlockProcessor<N> for SpectrumDisplay<N, M> {
    fn init(&mut self) -> Result<(), InitError> {
        if N >= M {
            return Err(InitError::BlockExceedsTransform {
                block: N,
                transform: M,
            });
        }
        self.fft.init()
    }

    fn process(&mut self, mut blocks: Blocks<'_, N>, probe: &mut dyn Indicator) {
        blocks.pass_lane(1);
        let Some((input, output)) = blocks.lane(0) else {
            return;
        };

        self.update_spectrum(input, probe);
        for o in output.iter_mut() {
            *o = self.next_output();
        }
    }
}
