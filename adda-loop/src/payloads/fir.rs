//! Direct-form FIR filter on lane A.
//!
//! `y[n] = Σ h[k]·x[n−k]` over a persistent delay line, computed in `f32` on
//! signed samples. Lane B passes through.

use crate::dsp::delay_line::DelayLine;
use crate::dsp::helpers::{float_to_code, to_signed};
use crate::indicator::{Indicator, Line};
use crate::processor::{BlockProcessor, Blocks};

/// 32-tap band-pass for 44.1 kHz: pass band 9–12 kHz, stop bands below
/// 6 kHz and above 15 kHz, 40 dB attenuation.
pub const BAND_PASS_44K1: [f32; 32] = [
    -0.001_283_568_7,
    -0.005_139_602_3,
    -0.000_354_667_06,
    -0.014_484_681,
    0.002_124_485_5,
    0.030_777_462,
    0.002_281_425_6,
    -0.026_738_355,
    -0.001_939_243_1,
    -0.021_237_097,
    -0.023_592_415,
    0.104_784_97,
    0.084_509_96,
    -0.180_643_2,
    -0.159_281_63,
    0.202_324,
    0.202_324,
    -0.159_281_63,
    -0.180_643_2,
    0.084_509_96,
    0.104_784_97,
    -0.023_592_415,
    -0.021_237_097,
    -0.001_939_243_1,
    -0.026_738_355,
    0.002_281_425_6,
    0.030_777_462,
    0.002_124_485_5,
    -0.014_484_681,
    -0.000_354_667_06,
    -0.005_139_602_3,
    -0.001_283_568_7,
];

/// FIR filter with `L` taps, processing blocks of `N`.
pub struct FirFilter<const N: usize, const L: usize> {
    coeffs: [f32; L],
    line: DelayLine<f32, L>,
}

impl<const N: usize, const L: usize> FirFilter<N, L> {
    pub const fn new(coeffs: [f32; L]) -> Self {
        FirFilter {
            coeffs,
            line: DelayLine::filled(0.0),
        }
    }

    pub fn coeffs(&self) -> &[f32; L] {
        &self.coeffs
    }

    /// Filter one signed sample.
    pub fn filter_sample(&mut self, x: f32) -> f32 {
        self.line.push(x);
        self.line.convolve(&self.coeffs)
    }
}

impl<const N: usize> FirFilter<N, 32> {
    pub const fn band_pass() -> Self {
        Self::new(BAND_PASS_44K1)
    }
}

impl<const N: usize, const L: usize> BlockProcessor<N> for FirFilter<N, L> {
    fn init(&mut self) -> Result<(), crate::error::InitError> {
        self.line = DelayLine::filled(0.0);
        Ok(())
    }

    fn process(&mut self, mut blocks: Blocks<'_, N>, probe: &mut dyn Indicator) {
        blocks.pass_lane(1);
        let Some((input, output)) = blocks.lane(0) else {
            return;
        };

        probe.set_high(Line::Measure);
        for (o, &c) in output.iter_mut().zip(input.iter()) {
            let y = self.filter_sample(to_signed(c) as f32);
            *o = float_to_code(y);
        }
        probe.set_low(Line::Measure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::NoIndicator;

    fn step<const N: usize, const L: usize>(f: &mut FirFilter<N, L>, input: &[u16; N]) -> [u16; N] {
        let mut out = [0u16; N];
        f.process(
            Blocks {
                inputs: [Some(input), None],
                outputs: [Some(&mut out), None],
            },
            &mut NoIndicator,
        );
        out
    }

    #[test]
    fn impulse_recovers_coefficients() {
        const N: usize = 8;
        let mut f = FirFilter::<N, 32>::band_pass();
        BlockProcessor::<N>::init(&mut f).unwrap();

        let amplitude = 32767.0f32;
        let mut response = std::vec::Vec::new();
        for p in 0..5 {
            let mut input = [32768u16; N];
            if p == 0 {
                input[0] = 65535;
            }
            response.extend_from_slice(&step(&mut f, &input));
        }

        for (k, &h) in BAND_PASS_44K1.iter().enumerate() {
            let expected = float_to_code(h * amplitude);
            assert_eq!(response[k], expected, "tap {k}");
        }
        assert!(response[32..].iter().all(|&c| c == 32768));
    }

    #[test]
    fn state_carries_across_blocks() {
        let mut f = FirFilter::<2, 3>::new([1.0, 1.0, 1.0]);
        BlockProcessor::<2>::init(&mut f).unwrap();
        let a = step(&mut f, &[32768 + 10, 32768 + 20]);
        let b = step(&mut f, &[32768 + 30, 32768]);
        assert_eq!(a, [32768 + 10, 32768 + 30]);
        assert_eq!(b, [32768 + 60, 32768 + 50]);
    }

    #[test]
    fn full_scale_clamps() {
        let mut f = FirFilter::<4, 4>::new([1.0; 4]);
        BlockProcessor::<4>::init(&mut f).unwrap();
        let out = step(&mut f, &[65535; 4]);
        assert_eq!(out, [65535, 65535, 65535, 65535]);
        let out = step(&mut f, &[0; 4]);
        // Running sums 65533, -2, -65537, -131072 clip at ±32767.
        assert_eq!(out, [65535, 32766, 1, 1]);
    }

    #[test]
    fn lane_b_untouched() {
        let mut f = FirFilter::<2, 32>::band_pass();
        let a = [1000u16, 2000];
        let b = [3000u16, 4000];
        let mut oa = [0u16; 2];
        let mut ob = [0u16; 2];
        f.process(
            Blocks {
                inputs: [Some(&a), Some(&b)],
                outputs: [Some(&mut oa), Some(&mut ob)],
            },
            &mut NoIndicator,
        );
        assert_eq!(ob, b);
    }
}
