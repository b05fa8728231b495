//! FFT overlap-add filter.
//!
//! The transform is four blocks long (`M = 4N`), so consecutive frames
//! overlap by 75 %. Every period:
//!
//! 1. shift the time history down one block and append the new block
//! 2. window, FFT, multiply each bin by its weight, IFFT, window again
//! 3. shift the accumulator down one block, add the lower three quarters of
//!    the frame and store its top quarter
//! 4. emit the bottom quarter of the accumulator
//!
//! The window is scaled so that its square sums to one over the four
//! overlapping frames; with all weights at 1.0 the output is the input
//! delayed by three blocks. Lane B passes through.

use crate::dsp::fft::Radix2Fft;
use crate::dsp::helpers::{float_to_code, to_normalized};
use crate::dsp::window::overlap_hamming;
use crate::error::InitError;
use crate::indicator::{Indicator, Line};
use crate::processor::{BlockProcessor, Blocks};

/// Overlap-add filter with per-bin weights.
pub struct OverlapAddFilter<const N: usize, const M: usize> {
    fft: Radix2Fft<M>,
    window: [f32; M],
    weights: [f32; M],
    history: [f32; M],
    re: [f32; M],
    im: [f32; M],
    acc: [f32; M],
}

impl<const N: usize, const M: usize> OverlapAddFilter<N, M> {
    /// Filter with explicit per-bin weights (full spectrum, `M` entries).
    pub const fn with_weights(weights: [f32; M]) -> Self {
        OverlapAddFilter {
            fft: Radix2Fft::new(),
            window: [0.0; M],
            weights,
            history: [0.0; M],
            re: [0.0; M],
            im: [0.0; M],
            acc: [0.0; M],
        }
    }

    /// All-pass: the input comes back three blocks late.
    pub const fn identity() -> Self {
        Self::with_weights([1.0; M])
    }

    /// Comb of pass bands: bins `k` with `(k / 8) % 4 == 0` pass, mirrored
    /// onto the negative frequencies.
    pub fn comb() -> Self {
        let mut weights = [0.0f32; M];
        for (k, w) in weights.iter_mut().enumerate().take(M / 2 + 1) {
            *w = if (k / 8) % 4 == 0 { 1.0 } else { 0.0 };
        }
        for k in 1..M / 2 {
            weights[M - k] = weights[k];
        }
        Self::with_weights(weights)
    }

    pub fn weights(&self) -> &[f32; M] {
        &self.weights
    }

    pub fn set_weights(&mut self, weights: [f32; M]) {
        self.weights = weights;
    }

    fn filter_frame(&mut self, probe: &mut dyn Indicator) {
        for ((r, &x), &w) in self.re.iter_mut().zip(self.history.iter()).zip(self.window.iter()) {
            *r = x * w;
        }
        self.im = [0.0; M];

        probe.set_high(Line::Measure);
        self.fft.forward(&mut self.re, &mut self.im);
        probe.set_low(Line::Measure);

        for ((r, i), &g) in self.re.iter_mut().zip(self.im.iter_mut()).zip(self.weights.iter()) {
            *r *= g;
            *i *= g;
        }
        self.fft.inverse(&mut self.re, &mut self.im);
        probe.set_high(Line::Measure);
    }

    fn accumulate(&mut self) {
        self.acc.copy_within(N.., 0);
        let overlap = M - N;
        for i in 0..overlap {
            self.acc[i] += self.re[i] * self.window[i];
        }
        for i in overlap..M {
            self.acc[i] = self.re[i] * self.window[i];
        }
    }
}

impl<const N: usize, const M: usize> Default for OverlapAddFilter<N, M> {
    fn default() -> Self {
        Self::comb()
    }
}

impl<const N: usize, const M: usize> BlockProcessor<N> for OverlapAddFilter<N, M> {
    fn init(&mut self) -> Result<(), InitError> {
        if M != 4 * N {
            return Err(InitError::OverlapMismatch {
                block: N,
                transform: M,
            });
        }
        self.fft.init()?;
        self.window = overlap_hamming::<M>();
        self.history = [0.0; M];
        self.acc = [0.0; M];
        Ok(())
    }

    fn process(&mut self, mut blocks: Blocks<'_, N>, probe: &mut dyn Indicator) {
        blocks.pass_lane(1);
        let Some((input, output)) = blocks.lane(0) else {
            return;
        };

        self.history.copy_within(N.., 0);
        for (h, &c) in self.history[M - N..].iter_mut().zip(input.iter()) {
            *h = to_normalized(c);
        }

        self.filter_frame(probe);
        self.accumulate();

        for (o, &y) in output.iter_mut().zip(self.acc.iter()) {
            *o = float_to_code(y * 32768.0);
        }
        probe.set_low(Line::Measure);
    }
}
