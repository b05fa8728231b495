//! Cooperative background loop.
//!
//! Everything time-critical runs in the completion handlers. The main
//! context only calls an [`IdleHook`] over and over; the hook gets no timing
//! guarantee and must not block.

/// Background work polled from the main loop.
pub trait IdleHook {
    fn poll(&mut self);
}

impl<F: FnMut()> IdleHook for F {
    fn poll(&mut self) {
        self()
    }
}

/// Does nothing. On hardware this is where a `wfi` would go.
pub struct NoIdle;

impl IdleHook for NoIdle {
    fn poll(&mut self) {}
}

/// Run `hook` once.
#[inline]
pub fn poll<H: IdleHook + ?Sized>(hook: &mut H) {
    hook.poll();
}

/// Run `hook` forever.
pub fn run<H: IdleHook>(mut hook: H) -> ! {
    loop {
        hook.poll();
    }
}
