//! Echo cancellation residual in Q15.
//!
//! Lane A is the reference. It runs through an `L`-tap Q15 FIR model of the
//! echo path, and the prediction is subtracted from lane B:
//!
//! ```text
//! e[n] = sat16(b[n] − sat16((Σ h[k]·a[n−k]) >> 15))
//! ```
//!
//! The residual `e` is written to both outputs. Without a second lane there is
//! nothing to cancel and the payload passes lane A through.

use crate::dsp::delay_line::DelayLine;
use crate::dsp::helpers::{saturate_to_code, to_signed};
use crate::dsp::intrinsics::{saturate16, saturate_q15_accumulator};
use crate::indicator::{Indicator, Line};
use crate::processor::{BlockProcessor, Blocks};

/// Taps of the default echo model: `(delay, Q15 gain)`.
pub const ECHO_TAPS: [(usize, i16); 4] = [(0, 2767), (400, 4767), (800, 8767), (1200, 16767)];

/// Length of the default echo model (200 ms at 8 kHz).
pub const ECHO_MODEL_LEN: usize = 1600;

/// Residual filter with an `L`-tap Q15 echo model.
pub struct AdaptiveResidual<const N: usize, const L: usize> {
    coeffs: [i16; L],
    line: DelayLine<i16, L>,
}

impl<const N: usize, const L: usize> AdaptiveResidual<N, L> {
    pub const fn new(coeffs: [i16; L]) -> Self {
        AdaptiveResidual {
            coeffs,
            line: DelayLine::filled(0),
        }
    }

    pub fn coeffs(&self) -> &[i16; L] {
        &self.coeffs
    }

    /// Predict the echo of `reference` and return the saturated residual of
    /// `observed`.
    pub fn residual(&mut self, reference: i16, observed: i16) -> i16 {
        self.line.push(reference);
        let prediction = saturate_q15_accumulator(self.line.convolve_q15(&self.coeffs));
        saturate16(observed as i32 - prediction as i32)
    }
}

impl<const N: usize> AdaptiveResidual<N, ECHO_MODEL_LEN> {
    /// Sparse four-echo model.
    pub const fn echo_model() -> Self {
        let mut coeffs = [0i16; ECHO_MODEL_LEN];
        let mut i = 0;
        while i < ECHO_TAPS.len() {
            let (delay, gain) = ECHO_TAPS[i];
            coeffs[delay] = gain;
            i += 1;
        }
        Self::new(coeffs)
    }
}

impl<const N: usize, const L: usize> BlockProcessor<N> for AdaptiveResidual<N, L> {
    fn init(&mut self) -> Result<(), crate::error::InitError> {
        self.line = DelayLine::filled(0);
        Ok(())
    }

    fn process(&mut self, blocks: Blocks<'_, N>, probe: &mut dyn Indicator) {
        let Blocks { inputs, outputs } = blocks;
        let [out_a, out_b] = outputs;

        match (inputs, out_a, out_b) {
            ([Some(reference), Some(observed)], Some(out_a), Some(out_b)) => {
                probe.set_high(Line::Measure);
                for i in 0..N {
                    let e = self.residual(to_signed(reference[i]), to_signed(observed[i]));
                    let code = saturate_to_code(e as i32);
                    out_a[i] = code;
                    out_b[i] = code;
                }
                probe.set_low(Line::Measure);
            }
            ([Some(input), _], Some(out_a), _) => out_a.copy_from_slice(input),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::helpers::to_code;
    use crate::indicator::NoIndicator;

    fn step<const N: usize, const L: usize>(
        f: &mut AdaptiveResidual<N, L>,
        a: &[u16; N],
        b: &[u16; N],
    ) -> ([u16; N], [u16; N]) {
        let mut oa = [0u16; N];
        let mut ob = [0u16; N];
        f.process(
            Blocks {
                inputs: [Some(a), Some(b)],
                outputs: [Some(&mut oa), Some(&mut ob)],
            },
            &mut NoIndicator,
        );
        (oa, ob)
    }

    #[test]
    fn echo_model_taps() {
        let f = AdaptiveResidual::<8, ECHO_MODEL_LEN>::echo_model();
        let c = f.coeffs();
        assert_eq!(c[0], 2767);
        assert_eq!(c[400], 4767);
        assert_eq!(c[800], 8767);
        assert_eq!(c[1200], 16767);
        assert_eq!(c.iter().filter(|&&h| h != 0).count(), 4);
    }

    #[test]
    fn perfect_model_cancels_echo() {
        // Echo path: half amplitude, two samples late.
        let mut f = AdaptiveResidual::<4, 3>::new([0, 0, 16384]);
        BlockProcessor::<4>::init(&mut f).unwrap();

        let x: [i16; 12] = [1000, -2000, 3000, 400, -500, 600, 7000, -800, 900, 10, 20, -30];
        let mut echo = [0i16; 12];
        for n in 2..12 {
            echo[n] = x[n - 2] / 2;
        }
        for p in 0..3 {
            let a: [u16; 4] = core::array::from_fn(|i| to_code(x[p * 4 + i]));
            let b: [u16; 4] = core::array::from_fn(|i| to_code(echo[p * 4 + i]));
            let (oa, ob) = step(&mut f, &a, &b);
            assert_eq!(oa, [32768; 4]);
            assert_eq!(ob, [32768; 4]);
        }
    }

    #[test]
    fn residual_saturates() {
        let mut f = AdaptiveResidual::<2, 1>::new([i16::MAX]);
        // prediction ≈ +32766, observed = -32768: clamps at -32768.
        let (oa, ob) = step(&mut f, &[65535, 65535], &[0, 0]);
        assert_eq!(oa, [0, 0]);
        assert_eq!(ob, [0, 0]);
        // prediction ≈ -32767, observed = +32767: clamps at +32767.
        let (oa, _) = step(&mut f, &[0, 0], &[65535, 65535]);
        assert_eq!(oa, [65535, 65535]);
    }

    #[test]
    fn single_lane_passes_through() {
        let mut f = AdaptiveResidual::<3, 4>::new([100; 4]);
        let a = [1u16, 2, 3];
        let mut oa = [0u16; 3];
        f.process(
            Blocks {
                inputs: [Some(&a), None],
                outputs: [Some(&mut oa), None],
            },
            &mut NoIndicator,
        );
        assert_eq!(oa, a);
    }
}
