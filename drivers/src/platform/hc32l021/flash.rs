//! HC32L021 Flash Controller Driver
//!
//! Only the read wait states are handled here. They must be raised before
//! HCLK goes above 24 MHz and may be lowered after it drops.

use log::trace;

use super::ConfigError;
use crate::hw::hc32l021::flash::*;
use crate::hw::reg::RegisterBus;

/// Highest HCLK the flash can be read at without a wait state.
pub const ZERO_WAIT_MAX_HZ: u32 = 24_000_000;

/// Wait states needed to read the flash at `hclk_hz`.
pub const fn wait_cycles_for(hclk_hz: u32) -> u32 {
    if hclk_hz <= ZERO_WAIT_MAX_HZ { 0 } else { 1 }
}

/// Flash controller driver.
pub struct Flash<B: RegisterBus> {
    bus: B,
    base: usize,
}

impl<B: RegisterBus> Flash<B> {
    pub const fn new(bus: B) -> Self {
        Self {
            bus,
            base: FLASH_BASE,
        }
    }

    #[inline]
    fn addr(&self, offset: usize) -> usize {
        self.base + offset
    }

    fn unlock(&self) {
        self.bus.write(self.addr(BYPASS), BYPASS_KEY_FIRST);
        self.bus.write(self.addr(BYPASS), BYPASS_KEY_SECOND);
    }

    pub fn set_wait_cycles(&self, cycles: u32) -> Result<(), ConfigError> {
        ConfigError::check("wait_cycles", CR_WAIT, cycles)?;
        trace!("flash: {} wait cycles", cycles);
        let cr = self.bus.read(self.addr(CR));
        self.unlock();
        self.bus.write(self.addr(CR), CR_WAIT.set(cr, cycles));
        Ok(())
    }

    pub fn wait_cycles(&self) -> u32 {
        self.bus.read_field(self.addr(CR), CR_WAIT)
    }

    /// Program the wait states required for `hclk_hz`.
    pub fn configure_for(&self, hclk_hz: u32) {
        // Always 0 or 1, both fit
        let _ = self.set_wait_cycles(wait_cycles_for(hclk_hz));
    }
}
