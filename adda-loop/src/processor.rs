//! Block processor contract.
//!
//! A [`BlockProcessor`] is invoked once per released block period with the
//! input halves the engines just filled and the output halves they will play
//! next. It must finish before the next period is released; nothing enforces
//! that, a late processor only leaves stale samples in the output halves.
//!
//! Samples cross the boundary as unsigned converter codes centered on
//! [`MID_SCALE`](crate::constants::MID_SCALE). Any payload that computes in a
//! signed representation must clamp back into `0..=u16::MAX`.

use crate::buffer::Block;
use crate::constants::MAX_CHANNELS;
use crate::error::InitError;
use crate::indicator::Indicator;

/// Buffers handed to [`BlockProcessor::process`] for one period.
///
/// Lanes that are not configured are `None`.
pub struct Blocks<'a, const N: usize> {
    pub inputs: [Option<&'a Block<N>>; MAX_CHANNELS],
    pub outputs: [Option<&'a mut Block<N>>; MAX_CHANNELS],
}

impl<'a, const N: usize> Blocks<'a, N> {
    /// Number of configured lanes.
    pub fn channels(&self) -> usize {
        self.inputs.iter().filter(|b| b.is_some()).count()
    }

    /// Copy every configured input lane to its output lane.
    pub fn pass_through(&mut self) {
        for (input, output) in self.inputs.iter().zip(self.outputs.iter_mut()) {
            if let (Some(input), Some(output)) = (input, output) {
                output.copy_from_slice(&input[..]);
            }
        }
    }

    /// Input and output of lane `lane`, if both are configured.
    pub fn lane(&mut self, lane: usize) -> Option<(&'a Block<N>, &mut Block<N>)> {
        match (self.inputs[lane], self.outputs[lane].as_deref_mut()) {
            (Some(input), Some(output)) => Some((input, output)),
            _ => None,
        }
    }

    /// Copy lane `lane` through unchanged, if configured.
    pub fn pass_lane(&mut self, lane: usize) {
        if let Some((input, output)) = self.lane(lane) {
            output.copy_from_slice(input);
        }
    }
}

/// Per-period transform from input blocks to output blocks.
pub trait BlockProcessor<const N: usize> {
    /// One-time table and state generation, called before sampling starts.
    fn init(&mut self) -> Result<(), InitError> {
        Ok(())
    }

    /// Transform one period. `probe` may be used for phase timing.
    fn process(&mut self, blocks: Blocks<'_, N>, probe: &mut dyn Indicator);
}

impl<const N: usize, T: BlockProcessor<N> + ?Sized> BlockProcessor<N> for &mut T {
    fn init(&mut self) -> Result<(), InitError> {
        (**self).init()
    }

    fn process(&mut self, blocks: Blocks<'_, N>, probe: &mut dyn Indicator) {
        (**self).process(blocks, probe)
    }
}
