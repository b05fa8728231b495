//! Terminal fault reporting.
//!
//! Once the loop has faulted, [`FaultReporter::halt`] takes over and cycles
//! the four LED lines through a fixed pattern forever:
//!
//! ```text
//! frame   HalfA  HalfB  Idle  Aux
//!   0       1      1     1     1
//!   1       0      1     0     1
//!   2       1      0     1     0
//! ```
//!
//! Frames are separated by a calibrated [`DelayNs`] wait. There is no way
//! back out.

use embedded_hal::delay::DelayNs;

use crate::error::FaultCause;
use crate::indicator::{Indicator, Line};

/// Delay between two frames of the pattern.
pub const FRAME_MS: u32 = 300;

/// LED levels per frame, in [`Line::LEDS`] order.
pub const FRAMES: [[bool; 4]; 3] = [
    [true, true, true, true],
    [false, true, false, true],
    [true, false, true, false],
];

/// Drives the fault pattern with a delay provider `D`.
pub struct FaultReporter<D> {
    delay: D,
    frame_ms: u32,
}

impl<D: DelayNs> FaultReporter<D> {
    pub fn new(delay: D) -> Self {
        Self::with_frame_ms(delay, FRAME_MS)
    }

    /// Use a frame delay other than [`FRAME_MS`].
    pub fn with_frame_ms(delay: D, frame_ms: u32) -> Self {
        FaultReporter { delay, frame_ms }
    }

    pub fn frame_ms(&self) -> u32 {
        self.frame_ms
    }

    /// Write frame `index` (modulo the pattern length) to the LED lines.
    pub fn show_frame(&mut self, indicator: &mut dyn Indicator, index: usize) {
        let frame = &FRAMES[index % FRAMES.len()];
        for (&line, &level) in Line::LEDS.iter().zip(frame.iter()) {
            indicator.set(line, level);
        }
    }

    /// One full pass over the pattern, waiting after every frame.
    pub fn blink_once(&mut self, indicator: &mut dyn Indicator) {
        for i in 0..FRAMES.len() {
            self.show_frame(indicator, i);
            self.delay.delay_ms(self.frame_ms);
        }
    }

    /// Report `cause` and blink forever.
    pub fn halt(&mut self, indicator: &mut dyn Indicator, cause: FaultCause) -> ! {
        #[cfg(feature = "defmt")]
        defmt::error!("halted: {}", cause);
        #[cfg(not(feature = "defmt"))]
        let _ = cause;

        loop {
            self.blink_once(indicator);
        }
    }

    /// Give the delay provider back.
    pub fn release(self) -> D {
        self.delay
    }
}
