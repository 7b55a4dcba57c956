//! ARMv6-M SysTick Timer Driver
//!
//! A 24-bit down counter clocked from the processor clock. The library uses
//! it as the time base for the software delays in [`crate::ddl`].

use crate::hal::timer::DownCounter;
use crate::hw::cortex_m::systick::*;
use crate::hw::reg::RegisterBus;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SysTickError {
    /// Reload must be in `1..=0xFF_FFFF`.
    InvalidReload(u32),
}

/// SysTick driver.
pub struct SysTick<B: RegisterBus> {
    bus: B,
    base: usize,
}

impl<B: RegisterBus> SysTick<B> {
    pub const fn new(bus: B) -> Self {
        Self {
            bus,
            base: SYST_BASE,
        }
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        self.bus.read(self.base + offset)
    }

    #[inline]
    fn write_reg(&self, offset: usize, value: u32) {
        self.bus.write(self.base + offset, value)
    }

    /// Program the reload value and start counting on the processor clock.
    pub fn configure(&self, reload: u32, tick_interrupt: bool) -> Result<(), SysTickError> {
        if reload == 0 || !RVR_RELOAD.fits(reload) {
            return Err(SysTickError::InvalidReload(reload));
        }

        // Stop, reload, clear current value (also clears COUNTFLAG)
        self.write_reg(CSR, 0);
        self.write_reg(RVR, reload);
        self.write_reg(CVR, 0);

        let mut csr = CSR_CLKSOURCE.prep(1) | CSR_ENABLE.prep(1);
        if tick_interrupt {
            csr |= CSR_TICKINT.prep(1);
        }
        self.write_reg(CSR, csr);
        Ok(())
    }

    /// Run as a free-running counter over the full 24-bit range, no interrupt.
    pub fn start_free_running(&self) {
        // Full-range reload always fits
        let _ = self.configure(RVR_RELOAD.max(), false);
    }

    pub fn stop(&self) {
        let csr = self.read_reg(CSR);
        self.write_reg(CSR, CSR_ENABLE.set(csr, 0));
    }

    pub fn is_enabled(&self) -> bool {
        CSR_ENABLE.get(self.read_reg(CSR)) != 0
    }

    /// True if the counter reached zero since the last `CSR` read.
    pub fn has_wrapped(&self) -> bool {
        CSR_COUNTFLAG.get(self.read_reg(CSR)) != 0
    }
}

impl<B: RegisterBus> DownCounter for SysTick<B> {
    fn reload(&self) -> u32 {
        RVR_RELOAD.get(self.read_reg(RVR))
    }

    fn current(&self) -> u32 {
        CVR_CURRENT.get(self.read_reg(CVR))
    }
}
