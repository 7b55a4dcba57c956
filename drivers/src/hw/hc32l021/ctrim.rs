//! Clock trim / calibration unit (CTRIM).

use super::PERIPH_BASE;
use crate::hw::reg::Field;

pub const CTRIM_BASE: usize = PERIPH_BASE + 0x9000;

pub const CR0: usize = 0x00;
pub const CR1: usize = 0x04;
pub const IER: usize = 0x08;
pub const ISR: usize = 0x0C;
/// Write 0 to clear the matching `ISR` bit.
pub const ICR: usize = 0x10;
pub const ARR: usize = 0x14;
pub const CNT: usize = 0x18;
pub const FLIM: usize = 0x1C;
pub const TVAL: usize = 0x20;
pub const FCAP: usize = 0x24;

// CR0
pub const CR0_STEP: Field = Field::new(0, 3);
pub const CR0_ETRFLT: Field = Field::new(4, 3);
pub const CR0_SRC: Field = Field::new(8, 3);

// CR1
pub const CR1_EN: Field = Field::bit(0);
pub const CR1_MD: Field = Field::new(1, 2);
pub const CR1_OST: Field = Field::bit(3);
pub const CR1_PRS: Field = Field::new(4, 4);

pub const ARR_ARR: Field = Field::new(0, 16);
pub const CNT_CNT: Field = Field::new(0, 16);
pub const FLIM_FLIM: Field = Field::new(0, 12);
pub const TVAL_TVAL: Field = Field::new(0, 9);
pub const FCAP_FCAP: Field = Field::new(0, 16);

bitflags::bitflags! {
    /// `ISR` status bits; the same positions are used in `ICR`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Status: u32 {
        /// Counter direction, set while counting down. Read only.
        const UD = 1 << 0;
        /// Counting period finished.
        const END = 1 << 1;
        /// Error stayed above the limit for a whole trim run.
        const MISS = 1 << 2;
        /// Trim code overflowed or underflowed its range.
        const OV = 1 << 3;
        /// Trim converged inside the error limit.
        const OK = 1 << 4;
    }
}

bitflags::bitflags! {
    /// `IER` interrupt enable bits.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Interrupts: u32 {
        const END = 1 << 1;
        const MISS = 1 << 2;
        const OV = 1 << 3;
        const OK = 1 << 4;
    }
}
