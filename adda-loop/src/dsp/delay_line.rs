//! Fixed-length circular delay line for direct-form FIR filtering.

/// The last `L` input samples, newest first on iteration.
///
/// `L` must be at least 1.
pub struct DelayLine<T, const L: usize> {
    buf: [T; L],
    /// Index of the newest sample.
    head: usize,
}

impl<T: Copy, const L: usize> DelayLine<T, L> {
    /// Delay line whose history is `value` everywhere.
    pub const fn filled(value: T) -> Self {
        DelayLine {
            buf: [value; L],
            head: 0,
        }
    }

    /// Shift in one sample, dropping the oldest.
    #[inline]
    pub fn push(&mut self, sample: T) {
        self.head += 1;
        if self.head == L {
            self.head = 0;
        }
        self.buf[self.head] = sample;
    }

    /// `x[n], x[n-1], …, x[n-L+1]`.
    pub fn recent(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = self.buf.split_at(self.head + 1);
        newer.iter().rev().chain(older.iter().rev())
    }

    pub const fn len(&self) -> usize {
        L
    }

    pub const fn is_empty(&self) -> bool {
        L == 0
    }
}

impl<const L: usize> DelayLine<f32, L> {
    /// `Σ h[k]·x[n−k]`.
    pub fn convolve(&self, coeffs: &[f32; L]) -> f32 {
        coeffs.iter().zip(self.recent()).map(|(h, x)| h * x).sum()
    }
}

impl<const L: usize> DelayLine<i16, L> {
    /// `Σ h[k]·x[n−k]` in Q15 with a 64-bit accumulator, not yet shifted.
    pub fn convolve_q15(&self, coeffs: &[i16; L]) -> i64 {
        coeffs
            .iter()
            .zip(self.recent())
            .map(|(&h, &x)| h as i64 * x as i64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_is_newest_first() {
        let mut line = DelayLine::<i32, 4>::filled(0);
        for x in 1..=6 {
            line.push(x);
        }
        let got: std::vec::Vec<i32> = line.recent().copied().collect();
        assert_eq!(got, std::vec![6, 5, 4, 3]);
        assert_eq!(line.len(), 4);
    }

    #[test]
    fn float_convolution_recovers_impulse_response() {
        let h = [0.5f32, -0.25, 0.125];
        let mut line = DelayLine::<f32, 3>::filled(0.0);
        let mut out = [0.0f32; 5];
        for (n, o) in out.iter_mut().enumerate() {
            line.push(if n == 0 { 1.0 } else { 0.0 });
            *o = line.convolve(&h);
        }
        assert_eq!(out, [0.5, -0.25, 0.125, 0.0, 0.0]);
    }

    #[test]
    fn q15_convolution_accumulates_wide() {
        let h = [i16::MAX; 8];
        let mut line = DelayLine::<i16, 8>::filled(i16::MAX);
        line.push(i16::MAX);
        let acc = line.convolve_q15(&h);
        assert_eq!(acc, 8 * (i16::MAX as i64) * (i16::MAX as i64));
    }
}
