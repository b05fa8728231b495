//! Identity payload.

use crate::indicator::Indicator;
use crate::processor::{BlockProcessor, Blocks};

/// Copies every configured input lane to its output lane, bit for bit.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl<const N: usize> BlockProcessor<N> for PassThrough {
    fn process(&mut self, mut blocks: Blocks<'_, N>, _probe: &mut dyn Indicator) {
        blocks.pass_through();
    }
}
