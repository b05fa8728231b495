//! Conversions between converter codes and working representations.
//!
//! Converter codes are unsigned with 0 V at [`MID_SCALE`]. Payloads work on
//! signed samples (`code - 32768`), optionally normalised to `[-1.0, 1.0)`.

use super::intrinsics::saturate16;
use crate::constants::MID_SCALE;

/// Largest magnitude emitted by float payloads (symmetric clip).
pub const FLOAT_CLIP: f32 = 32767.0;

/// Unsigned converter code → signed sample.
#[inline(always)]
pub fn to_signed(code: u16) -> i16 {
    (code ^ MID_SCALE) as i16
}

/// Signed sample → unsigned converter code.
#[inline(always)]
pub fn to_code(sample: i16) -> u16 {
    (sample as u16) ^ MID_SCALE
}

/// Saturate an `i32` result into `i16` range and make it a converter code.
#[inline(always)]
pub fn saturate_to_code(value: i32) -> u16 {
    to_code(saturate16(value))
}

/// Converter code → sample normalised by 1/32768.
#[inline(always)]
pub fn to_normalized(code: u16) -> f32 {
    to_signed(code) as f32 * (1.0 / 32768.0)
}

/// Float sample (signed, code units) → converter code.
///
/// Rounds to nearest and clips to ±32767.
#[inline]
pub fn float_to_code(value: f32) -> u16 {
    let clipped = libm::roundf(value).clamp(-FLOAT_CLIP, FLOAT_CLIP);
    (clipped as i32 + MID_SCALE as i32) as u16
}

/// Convert a whole block of codes to signed float samples.
pub fn block_to_float<const N: usize>(codes: &[u16; N], out: &mut [f32]) {
    for (o, &c) in out.iter_mut().zip(codes.iter()) {
        *o = to_signed(c) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_code_mapping() {
        assert_eq!(to_signed(0), -32768);
        assert_eq!(to_signed(32768), 0);
        assert_eq!(to_signed(65535), 32767);
        assert_eq!(to_code(-32768), 0);
        assert_eq!(to_code(0), 32768);
        assert_eq!(to_code(32767), 65535);
        for code in [0u16, 1, 12345, 32767, 32768, 40000, 65535] {
            assert_eq!(to_code(to_signed(code)), code);
        }
    }

    #[test]
    fn saturating_code_clamps() {
        assert_eq!(saturate_to_code(100_000), 65535);
        assert_eq!(saturate_to_code(-100_000), 0);
        assert_eq!(saturate_to_code(-5), 32763);
    }

    #[test]
    fn normalized_range() {
        assert_eq!(to_normalized(32768), 0.0);
        assert_eq!(to_normalized(0), -1.0);
        assert_eq!(to_normalized(49152), 0.5);
    }

    #[test]
    fn float_to_code_rounds_and_clips() {
        assert_eq!(float_to_code(0.0), 32768);
        assert_eq!(float_to_code(1.6), 32770);
        assert_eq!(float_to_code(-1.6), 32766);
        assert_eq!(float_to_code(1.0e9), 65535);
        assert_eq!(float_to_code(-1.0e9), 1);
    }

    #[test]
    fn block_conversion() {
        let codes = [32768u16, 32769, 32767];
        let mut out = [9.0f32; 3];
        block_to_float(&codes, &mut out);
        assert_eq!(out, [0.0, 1.0, -1.0]);
    }
}
