//! Window tables.

use core::f64::consts::PI;

/// Hamming window normalised for 75 % overlap-add.
///
/// `w[i] = (0.54 − 0.46·cos(π(2i+1)/M)) / sqrt(4·0.54² + 2·0.46²)`.
/// Applied on analysis and synthesis, the squared window summed over four
/// hops of `M/4` is exactly one.
pub fn overlap_hamming<const M: usize>() -> [f32; M] {
    let norm = 1.0 / libm::sqrt(4.0 * 0.54 * 0.54 + 2.0 * 0.46 * 0.46);
    let mut w = [0.0f32; M];
    for (i, v) in w.iter_mut().enumerate() {
        let phase = PI / M as f64 * (2 * i + 1) as f64;
        *v = (norm * (0.54 - 0.46 * libm::cos(phase))) as f32;
    }
    w
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_window_sums_to_one_over_four_hops() {
        let w = overlap_hamming::<64>();
        for i in 0..16 {
            let sum: f32 = (0..4).map(|k| w[i + 16 * k] * w[i + 16 * k]).sum();
            assert!((sum - 1.0).abs() < 1e-5, "offset {i}: {sum}");
        }
    }

    #[test]
    fn window_is_symmetric() {
        let w = overlap_hamming::<32>();
        for i in 0..16 {
            assert!((w[i] - w[31 - i]).abs() < 1e-6);
        }
    }
}
