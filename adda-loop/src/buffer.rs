//! Double-buffer storage.
//!
//! Each lane/direction owns one [`BufferPair`]: two statically sized
//! [`Block`]s and an index naming the half the transfer engine is currently
//! filling or draining. The depth is fixed at two by the DMA double-buffer
//! mode; the other half belongs to the block processor.
//!
//! ```text
//!            active ──┐
//!                     ▼
//! ┌──────────────┬──────────────┐
//! │  Half A [N]  │  Half B [N]  │
//! └──────────────┴──────────────┘
//! ```

/// One half of a double buffer: `N` unsigned converter codes.
pub type Block<const N: usize> = [u16; N];

/// Memory target of a double-buffered DMA stream (`CT` bit: 0 = A, 1 = B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    A,
    B,
}

impl Half {
    /// The opposite half.
    #[inline]
    pub const fn other(self) -> Half {
        match self {
            Half::A => Half::B,
            Half::B => Half::A,
        }
    }

    /// Index into the pair (`0` for A, `1` for B).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Half::A => 0,
            Half::B => 1,
        }
    }
}

/// Two halves of one lane's double buffer plus the active-half index.
pub struct BufferPair<const N: usize> {
    halves: [Block<N>; 2],
    active: Half,
}

impl<const N: usize> BufferPair<N> {
    /// Zeroed pair with half A active.
    pub const fn new() -> Self {
        BufferPair {
            halves: [[0u16; N]; 2],
            active: Half::A,
        }
    }

    /// Pair with both halves filled with `value`.
    pub const fn filled(value: u16) -> Self {
        BufferPair {
            halves: [[value; N]; 2],
            active: Half::A,
        }
    }

    /// Half currently owned by the transfer engine.
    #[inline]
    pub fn active(&self) -> Half {
        self.active
    }

    /// Hand the active half over and take the other one (hardware rearm).
    #[inline]
    pub(crate) fn flip(&mut self) -> Half {
        let finished = self.active;
        self.active = finished.other();
        finished
    }

    pub(crate) fn set_active(&mut self, half: Half) {
        self.active = half;
    }

    #[inline]
    pub fn half(&self, half: Half) -> &Block<N> {
        &self.halves[half.index()]
    }

    #[inline]
    pub fn half_mut(&mut self, half: Half) -> &mut Block<N> {
        &mut self.halves[half.index()]
    }
}

impl<const N: usize> Default for BufferPair<N> {
    fn default() -> Self {
        Self::new()
    }
}
