use core::sync::atomic::{Ordering, compiler_fence};

use crate::sync::irq::IrqControl;

const PRIMASK_PM_BIT: u32 = 1 << 0;

pub struct CortexMIrq;

/// Interrupt masking for ARMv6-M through PRIMASK.
///
/// `disable()` reads PRIMASK, sets it with `cpsid i` and reports whether
/// interrupts were enabled before the call. `restore(true)` re-enables them
/// with `cpsie i`; `restore(false)` leaves them masked so nested critical
/// sections unwind correctly.
impl IrqControl for CortexMIrq {
    type State = bool;

    #[inline(always)]
    fn disable() -> bool {
        let primask: u32;
        unsafe {
            core::arch::asm!(
                "mrs {0}, PRIMASK",
                "cpsid i",
                out(reg) primask,
                options(nostack, preserves_flags)
            );
        }
        // Keep accesses inside the masked region
        compiler_fence(Ordering::SeqCst);
        primask & PRIMASK_PM_BIT == 0
    }

    #[inline(always)]
    fn restore(prev_enabled: bool) {
        compiler_fence(Ordering::SeqCst);
        if prev_enabled {
            unsafe {
                core::arch::asm!("cpsie i", options(nostack, preserves_flags));
            }
        }
    }
}
