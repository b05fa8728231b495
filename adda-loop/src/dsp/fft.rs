//! Complex FFT over split real/imaginary arrays.
//!
//! The kernel is `microfft`'s fixed-size radix-2 transform; this wrapper
//! picks the `cfft_M` entry point for the const size `M` and moves samples
//! between the payloads' `[f32; M]` pairs and a complex scratch buffer. The
//! forward transform is unscaled. The inverse is computed as
//! `conj(fft(conj(X))) / M`, so `inverse(forward(x))` returns `x`.
//!
//! [`Radix2Fft::init`] rejects sizes without a kernel.

use microfft::complex::{
    cfft_1024, cfft_128, cfft_16, cfft_2048, cfft_256, cfft_32, cfft_4096, cfft_512, cfft_64,
};
use microfft::Complex32;

use crate::error::InitError;

/// Run `$kernel` on `$buf` for whichever `$size` matches `$len`.
macro_rules! dispatch {
    ($len:expr, $buf:expr, $($size:literal => $kernel:ident),+ $(,)?) => {
        match $len {
            $($size => {
                if let Ok(fixed) = <&mut [Complex32; $size]>::try_from(&mut $buf[..]) {
                    let _ = $kernel(fixed);
                }
            })+
            _ => {}
        }
    };
}

/// Power-of-two complex transform of size `M`.
pub struct Radix2Fft<const M: usize> {
    scratch: [Complex32; M],
}

impl<const M: usize> Radix2Fft<M> {
    /// Smallest supported size.
    pub const MIN_SIZE: usize = 16;
    /// Largest supported size.
    pub const MAX_SIZE: usize = 4096;

    pub const fn new() -> Self {
        Radix2Fft {
            scratch: [Complex32::new(0.0, 0.0); M],
        }
    }

    pub const fn is_supported() -> bool {
        M.is_power_of_two() && M >= Self::MIN_SIZE && M <= Self::MAX_SIZE
    }

    /// Check that a kernel exists for `M`.
    pub fn init(&mut self) -> Result<(), InitError> {
        if !Self::is_supported() {
            return Err(InitError::UnsupportedTransformSize { size: M });
        }
        self.scratch = [Complex32::new(0.0, 0.0); M];
        Ok(())
    }

    /// Forward transform in place.
    pub fn forward(&mut self, re: &mut [f32; M], im: &mut [f32; M]) {
        for ((c, &r), &i) in self.scratch.iter_mut().zip(re.iter()).zip(im.iter()) {
            *c = Complex32::new(r, i);
        }
        self.run();
        for ((c, r), i) in self.scratch.iter().zip(re.iter_mut()).zip(im.iter_mut()) {
            *r = c.re;
            *i = c.im;
        }
    }

    /// Inverse transform in place, scaled by `1/M`.
    pub fn inverse(&mut self, re: &mut [f32; M], im: &mut [f32; M]) {
        for ((c, &r), &i) in self.scratch.iter_mut().zip(re.iter()).zip(im.iter()) {
            *c = Complex32::new(r, -i);
        }
        self.run();
        let scale = 1.0 / M as f32;
        for ((c, r), i) in self.scratch.iter().zip(re.iter_mut()).zip(im.iter_mut()) {
            *r = c.re * scale;
            *i = -c.im * scale;
        }
    }

    fn run(&mut self) {
        dispatch!(M, self.scratch,
            16 => cfft_16,
            32 => cfft_32,
            64 => cfft_64,
            128 => cfft_128,
            256 => cfft_256,
            512 => cfft_512,
            1024 => cfft_1024,
            2048 => cfft_2048,
            4096 => cfft_4096,
        );
    }
}

impl<const M: usize> Default for Radix2Fft<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// `|X[k]|²` for every bin.
pub fn magnitude_squared<const M: usize>(re: &[f32; M], im: &[f32; M], out: &mut [f32; M]) {
    for ((o, &r), &i) in out.iter_mut().zip(re.iter()).zip(im.iter()) {
        *o = r * r + i * i;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsupported_sizes() {
        assert_eq!(
            Radix2Fft::<8>::new().init(),
            Err(InitError::UnsupportedTransformSize { size: 8 })
        );
        assert_eq!(
            Radix2Fft::<48>::new().init(),
            Err(InitError::UnsupportedTransformSize { size: 48 })
        );
        assert!(Radix2Fft::<16>::is_supported());
        assert!(Radix2Fft::<4096>::is_supported());
        assert!(!Radix2Fft::<8192>::is_supported());
    }

    #[test]
    fn cosine_lands_in_its_bin() {
        let mut fft = Radix2Fft::<64>::new();
        fft.init().unwrap();
        let mut re = [0.0f32; 64];
        let mut im = [0.0f32; 64];
        for (n, r) in re.iter_mut().enumerate() {
            *r = libm::cosf(2.0 * core::f32::consts::PI * 5.0 * n as f32 / 64.0);
        }
        fft.forward(&mut re, &mut im);

        let mut mag = [0.0f32; 64];
        magnitude_squared(&re, &im, &mut mag);
        // A unit cosine puts M/2 in bins k and M-k.
        assert!((mag[5] - 32.0 * 32.0).abs() < 0.5);
        assert!((mag[59] - 32.0 * 32.0).abs() < 0.5);
        for (k, &m) in mag.iter().enumerate() {
            if k != 5 && k != 59 {
                assert!(m < 1e-4, "leak into bin {k}: {m}");
            }
        }
    }

    #[test]
    fn impulse_is_flat() {
        let mut fft = Radix2Fft::<16>::new();
        fft.init().unwrap();
        let mut re = [0.0f32; 16];
        let mut im = [0.0f32; 16];
        re[0] = 1.0;
        fft.forward(&mut re, &mut im);
        for k in 0..16 {
            assert!((re[k] - 1.0).abs() < 1e-6);
            assert!(im[k].abs() < 1e-6);
        }
    }

    #[test]
    fn matches_direct_dft_at_every_size() {
        fn check<const M: usize>() {
            let mut fft = Radix2Fft::<M>::new();
            fft.init().unwrap();
            let mut re = [0.0f32; M];
            let mut im = [0.0f32; M];
            for n in 0..M {
                re[n] = ((n * 7) % 13) as f32 - 6.0;
                im[n] = ((n * 3) % 5) as f32 - 2.0;
            }
            let (x_re, x_im) = (re, im);
            fft.forward(&mut re, &mut im);

            for k in [0, 1, M / 4, M / 2 - 1, M - 1] {
                let (mut sr, mut si) = (0.0f64, 0.0f64);
                for n in 0..M {
                    let phase = -2.0 * core::f64::consts::PI * (k * n % M) as f64 / M as f64;
                    let (c, s) = (libm::cos(phase), libm::sin(phase));
                    sr += x_re[n] as f64 * c - x_im[n] as f64 * s;
                    si += x_re[n] as f64 * s + x_im[n] as f64 * c;
                }
                let tol = 1e-3 * M as f64;
                assert!((re[k] as f64 - sr).abs() < tol, "M={M} bin {k} re");
                assert!((im[k] as f64 - si).abs() < tol, "M={M} bin {k} im");
            }
        }
        check::<16>();
        check::<32>();
        check::<64>();
        check::<128>();
        check::<256>();
        check::<512>();
        check::<1024>();
        check::<2048>();
        check::<4096>();
    }

    #[test]
    fn inverse_undoes_forward() {
        let mut fft = Radix2Fft::<128>::new();
        fft.init().unwrap();
        let mut re = [0.0f32; 128];
        let mut im = [0.0f32; 128];
        for (n, r) in re.iter_mut().enumerate() {
            *r = ((n * 37) % 23) as f32 - 11.0;
        }
        let original = re;
        fft.forward(&mut re, &mut im);
        fft.inverse(&mut re, &mut im);
        for n in 0..128 {
            assert!((re[n] - original[n]).abs() < 1e-3);
            assert!(im[n].abs() < 1e-3);
        }
    }
}
