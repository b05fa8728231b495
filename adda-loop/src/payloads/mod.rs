//! Ready-made [`BlockProcessor`](crate::processor::BlockProcessor)
//! implementations.
//!
//! | Payload | Lane A out | Lane B out | State |
//! |---------|------------|------------|-------|
//! | [`PassThrough`] | A in | B in | none |
//! | [`SpectrumDisplay`] | log power spectrum + trigger pulse | B in | history, running mean |
//! | [`OverlapAddFilter`] | A in, filtered per bin | B in | history, accumulator |
//! | [`FirFilter`] | A in, FIR filtered | B in | delay line |
//! | [`AdaptiveResidual`] | B in − echo(A in) | same as A | delay line |
//!
//! Every payload except [`PassThrough`] needs the `dsp` feature.

mod passthrough;

pub use passthrough::PassThrough;

#[cfg(feature = "dsp")]
pub mod adaptive;
#[cfg(feature = "dsp")]
pub mod fir;
#[cfg(feature = "dsp")]
pub mod overlap_add;
#[cfg(feature = "dsp")]
pub mod spectrum;

#[cfg(feature = "dsp")]
pub use adaptive::AdaptiveResidual;
#[cfg(feature = "dsp")]
pub use fir::FirFilter;
#[cfg(feature = "dsp")]
pub use overlap_add::OverlapAddFilter;
#[cfg(feature = "dsp")]
pub use spectrum::SpectrumDisplay;
