//! Write-only indicator lines (LEDs and scope probes).
//!
//! | [`Line`] | Use |
//! |----------|-----|
//! | `HalfA` / `HalfB` | Which buffer set is being processed; fault pattern |
//! | `Idle` | High while the processor is not running; fault pattern |
//! | `Aux` | Fault pattern |
//! | `Measure` | Free for payload phase timing |
//! | `Engine(id)` | Toggled on every completion of `id` |
//! | `ClockTick` | Toggled on every sample clock tick |
//!
//! Nothing in the loop reads a line back.

use embedded_hal::digital::OutputPin;

use crate::constants::ENGINE_COUNT;
use crate::io::engine::EngineId;

/// Number of indicator lines.
pub const LINE_COUNT: usize = 6 + ENGINE_COUNT;

/// One binary output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    HalfA,
    HalfB,
    Idle,
    Aux,
    Measure,
    Engine(EngineId),
    ClockTick,
}

impl Line {
    /// The four LED lines used by the fault pattern, in pattern order.
    pub const LEDS: [Line; 4] = [Line::HalfA, Line::HalfB, Line::Idle, Line::Aux];

    pub const fn index(self) -> usize {
        match self {
            Line::HalfA => 0,
            Line::HalfB => 1,
            Line::Idle => 2,
            Line::Aux => 3,
            Line::Measure => 4,
            Line::Engine(id) => 5 + id.index(),
            Line::ClockTick => 5 + ENGINE_COUNT,
        }
    }
}

/// Sink for indicator writes.
pub trait Indicator {
    fn set(&mut self, line: Line, high: bool);

    fn toggle(&mut self, line: Line);

    fn set_high(&mut self, line: Line) {
        self.set(line, true);
    }

    fn set_low(&mut self, line: Line) {
        self.set(line, false);
    }
}

/// Discards every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndicator;

impl Indicator for NoIndicator {
    fn set(&mut self, _line: Line, _high: bool) {}

    fn toggle(&mut self, _line: Line) {}
}

/// Indicator backed by one `OutputPin` per line.
///
/// The last written level of each line is tracked so that
/// [`toggle`](Indicator::toggle) works on pins without readback. Pin errors
/// are dropped: indicators are diagnostic only.
pub struct PinIndicator<P> {
    pins: [P; LINE_COUNT],
    levels: u16,
}

impl<P: OutputPin> PinIndicator<P> {
    /// Take ownership of the pins, indexed by [`Line::index`], and drive
    /// them all low.
    pub fn new(pins: [P; LINE_COUNT]) -> Self {
        let mut ind = PinIndicator { pins, levels: 0 };
        for pin in ind.pins.iter_mut() {
            let _ = pin.set_low();
        }
        ind
    }

    /// Last level written to `line`.
    pub fn level(&self, line: Line) -> bool {
        self.levels & (1 << line.index()) != 0
    }

    /// Give the pins back.
    pub fn release(self) -> [P; LINE_COUNT] {
        self.pins
    }
}

impl<P: OutputPin> Indicator for PinIndicator<P> {
    fn set(&mut self, line: Line, high: bool) {
        let idx = line.index();
        let pin = &mut self.pins[idx];
        if high {
            let _ = pin.set_high();
            self.levels |= 1 << idx;
        } else {
            let _ = pin.set_low();
            self.levels &= !(1 << idx);
        }
    }

    fn toggle(&mut self, line: Line) {
        let high = !self.level(line);
        self.set(line, high);
    }
}

impl<T: Indicator + ?Sized> Indicator for &mut T {
    fn set(&mut self, line: Line, high: bool) {
        (**self).set(line, high);
    }

    fn toggle(&mut self, line: Line) {
        (**self).toggle(line);
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording pins and indicators for tests.

    use core::cell::RefCell;
    use core::convert::Infallible;
    use std::rc::Rc;
    use std::vec::Vec;

    use embedded_hal::digital::{ErrorType, OutputPin};

    use super::{Indicator, Line, LINE_COUNT};

    /// Pin that appends `(pin, level)` to a shared log.
    pub struct MockPin {
        pub id: usize,
        pub log: Rc<RefCell<Vec<(usize, bool)>>>,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push((self.id, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push((self.id, true));
            Ok(())
        }
    }

    pub fn pins() -> ([MockPin; LINE_COUNT], Rc<RefCell<Vec<(usize, bool)>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let pins = core::array::from_fn(|id| MockPin {
            id,
            log: log.clone(),
        });
        (pins, log)
    }

    /// Indicator that keeps current levels and counts toggles.
    #[derive(Default)]
    pub struct RecordingIndicator {
        pub levels: [bool; LINE_COUNT],
        pub toggles: [u32; LINE_COUNT],
        pub writes: Vec<(Line, bool)>,
    }

    impl Indicator for RecordingIndicator {
        fn set(&mut self, line: Line, high: bool) {
            self.levels[line.index()] = high;
            self.writes.push((line, high));
        }

        fn toggle(&mut self, line: Line) {
            let idx = line.index();
            self.levels[idx] = !self.levels[idx];
            self.toggles[idx] += 1;
        }
    }

    impl RecordingIndicator {
        pub fn level(&self, line: Line) -> bool {
            self.levels[line.index()]
        }

        pub fn toggles(&self, line: Line) -> u32 {
            self.toggles[line.index()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{pins, RecordingIndicator};
    use super::*;

    #[test]
    fn line_indices_are_dense_and_unique() {
        let mut seen = [false; LINE_COUNT];
        let mut lines = std::vec![Line::HalfA, Line::HalfB, Line::Idle, Line::Aux, Line::Measure];
        lines.extend(EngineId::ALL.iter().map(|&id| Line::Engine(id)));
        lines.push(Line::ClockTick);
        for line in lines {
            assert!(!seen[line.index()]);
            seen[line.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn pin_indicator_starts_low_and_toggles() {
        let (p, log) = pins();
        let mut ind = PinIndicator::new(p);
        assert_eq!(log.borrow().len(), LINE_COUNT);
        assert!(log.borrow().iter().all(|&(_, level)| !level));
        log.borrow_mut().clear();

        ind.toggle(Line::ClockTick);
        ind.toggle(Line::ClockTick);
        ind.set_high(Line::Idle);
        assert!(ind.level(Line::Idle));
        assert!(!ind.level(Line::ClockTick));

        let tick = Line::ClockTick.index();
        assert_eq!(
            *log.borrow(),
            std::vec![(tick, true), (tick, false), (Line::Idle.index(), true)]
        );
    }

    #[test]
    fn forwarding_through_mut_ref() {
        let mut rec = RecordingIndicator::default();
        {
            let mut r = &mut rec;
            r.set_high(Line::Aux);
            r.toggle(Line::Measure);
        }
        assert!(rec.level(Line::Aux));
        assert_eq!(rec.toggles(Line::Measure), 1);
    }
}
