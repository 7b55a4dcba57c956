//! Timer Hardware Abstraction Layer.

/// Compare-channel timer.
///
/// A free-running counter with per-handle compare registers; `start` arms
/// the handle to flag a match `ticks` counts from now.
pub trait Timer {
    /// Which compare channel to use.
    type Handle: Copy + Clone;

    /// Error type for timer operations.
    type Error: core::fmt::Debug;

    /// Arm `handle` to match `ticks` counter ticks from now.
    ///
    /// # Errors
    ///
    /// Returns an error if `ticks` does not fit the counter.
    fn start(&mut self, handle: Self::Handle, ticks: u32) -> Result<(), Self::Error>;

    /// Disarm a channel.
    fn stop(&mut self, handle: Self::Handle) -> Result<(), Self::Error>;

    /// Clear a pending match.
    fn clear_interrupt(&mut self, handle: Self::Handle) -> Result<(), Self::Error>;

    /// Check if a channel has a pending match.
    fn is_pending(&self, handle: Self::Handle) -> Result<bool, Self::Error>;
}

/// A free-running counter that counts down from `reload()` to zero and
/// then restarts at `reload()`.
pub trait DownCounter {
    /// Value loaded after the counter passes zero.
    fn reload(&self) -> u32;

    /// Current counter value.
    fn current(&self) -> u32;

    /// Busy-wait until at least `ticks` counter ticks have elapsed.
    ///
    /// Elapsed time is accumulated between successive samples; a sample
    /// larger than the previous one means the counter wrapped through zero.
    /// Samples must be taken at least once per counter period.
    fn delay_ticks(&self, ticks: u64) {
        let period = u64::from(self.reload()) + 1;
        let mut elapsed: u64 = 0;
        let mut last = u64::from(self.current());

        while elapsed < ticks {
            let now = u64::from(self.current());
            if now != last {
                elapsed += if now < last {
                    last - now
                } else {
                    last + period - now
                };
                last = now;
            }
            core::hint::spin_loop();
        }
    }
}
