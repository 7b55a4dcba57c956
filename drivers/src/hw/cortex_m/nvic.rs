pub const ISER: usize = 0xE000_E100;
pub const ICER: usize = 0xE000_E180;
pub const ISPR: usize = 0xE000_E200;
pub const ICPR: usize = 0xE000_E280;
pub const IPR0: usize = 0xE000_E400;

/// Cortex-M0+ implements the top two priority bits only.
pub const PRIO_BITS: u32 = 2;

/// Number of external interrupt lines on ARMv6-M.
pub const IRQ_LINES: u32 = 32;

/// Word address of the priority register holding `irq`.
pub const fn ipr(irq: u32) -> usize {
    IPR0 + 4 * (irq as usize / 4)
}

/// Bit offset of `irq`'s priority byte inside its word.
pub const fn ipr_shift(irq: u32) -> u32 {
    8 * (irq % 4) + (8 - PRIO_BITS)
}
