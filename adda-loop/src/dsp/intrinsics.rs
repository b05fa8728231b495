//! Saturation primitives with pure-Rust fallbacks.
//!
//! On Cortex-M4F (`thumbv7em`, DSP extension) [`saturate16`] compiles to a
//! single `SSAT`. Host tests and other targets use the portable branch.

/// Saturate an `i32` to `i16` range (`-32768..=32767`).
///
/// Maps to ARM `SSAT #16`.
#[inline(always)]
pub fn saturate16(val: i32) -> i16 {
    #[cfg(all(target_arch = "arm", target_feature = "dsp"))]
    {
        let out: i32;
        unsafe {
            core::arch::asm!(
                "ssat {out}, #16, {val}",
                out = out(reg) out,
                val = in(reg) val,
            );
        }
        out as i16
    }
    #[cfg(not(all(target_arch = "arm", target_feature = "dsp")))]
    {
        if val > 32767 {
            32767
        } else if val < -32768 {
            -32768
        } else {
            val as i16
        }
    }
}

/// Saturate an `i64` accumulator, shifted right by 15, to `i16` (Q15 MAC result).
#[inline(always)]
pub fn saturate_q15_accumulator(acc: i64) -> i16 {
    let shifted = acc >> 15;
    if shifted > i16::MAX as i64 {
        i16::MAX
    } else if shifted < i16::MIN as i64 {
        i16::MIN
    } else {
        shifted as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturate16() {
        assert_eq!(saturate16(0), 0);
        assert_eq!(saturate16(32767), 32767);
        assert_eq!(saturate16(32768), 32767);
        assert_eq!(saturate16(-32768), -32768);
        assert_eq!(saturate16(-32769), -32768);
        assert_eq!(saturate16(100000), 32767);
        assert_eq!(saturate16(-100000), -32768);
    }

    #[test]
    fn test_saturate_q15_accumulator() {
        // 0.5 * 0.5 in Q15
        assert_eq!(saturate_q15_accumulator(16384 * 16384), 8192);
        assert_eq!(saturate_q15_accumulator(1 << 40), 32767);
        assert_eq!(saturate_q15_accumulator(-(1 << 40)), -32768);
        // Arithmetic shift rounds toward negative infinity.
        assert_eq!(saturate_q15_accumulator(-1), -1);
    }
}
