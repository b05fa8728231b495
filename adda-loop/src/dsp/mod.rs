//! DSP building blocks for the payloads.
//!
//! - [`intrinsics`]: saturation primitives (`SSAT` on Cortex-M4)
//! - [`helpers`]: converter code ↔ signed/float sample conversion
//! - [`fft`]: radix-2 complex FFT, sizes 16..=4096
//! - [`delay_line`]: circular FIR delay line
//! - [`window`]: overlap-add window table

pub mod delay_line;
pub mod fft;
pub mod helpers;
pub mod intrinsics;
pub mod window;

pub use delay_line::DelayLine;
pub use fft::Radix2Fft;
