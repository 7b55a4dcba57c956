//! Cortex-M0+ support.

pub mod irq;

/// Sleep until the next interrupt.
#[inline(always)]
pub fn wfi() {
    unsafe {
        core::arch::asm!("wfi", options(nomem, nostack, preserves_flags));
    }
}

/// Unmask interrupts globally (clear PRIMASK).
#[inline(always)]
pub fn enable_interrupts() {
    core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
    unsafe {
        core::arch::asm!("cpsie i", options(nostack, preserves_flags));
    }
}
