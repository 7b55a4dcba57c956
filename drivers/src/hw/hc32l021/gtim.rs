//! General purpose timer (GTIM), two instances.

use super::PERIPH_BASE;
use crate::hw::reg::Field;

pub const GTIM0_BASE: usize = PERIPH_BASE + 0x1800;
pub const GTIM1_BASE: usize = PERIPH_BASE + 0x1C00;

pub const ARR: usize = 0x00;
pub const CNT: usize = 0x04;
pub const CMMR: usize = 0x08;
pub const CR0: usize = 0x0C;
pub const IER: usize = 0x10;
pub const IFR: usize = 0x14;
/// Write 0 to clear the matching `IFR` bit.
pub const ICR: usize = 0x18;
pub const CR1: usize = 0x1C;
pub const CCR0: usize = 0x20;

pub const CHANNELS: usize = 4;

/// Offset of the compare/capture register of `channel`.
pub const fn ccr(channel: usize) -> usize {
    CCR0 + 4 * channel
}

pub const ARR_ARR: Field = Field::new(0, 16);
pub const CNT_CNT: Field = Field::new(0, 16);
pub const CCR_CCR: Field = Field::new(0, 16);

/// Compare output mode of `channel` in `CMMR`.
pub const fn cmmr_ccm(channel: usize) -> Field {
    Field::new(4 * channel as u32, 3)
}

// CR0
pub const CR0_CEN: Field = Field::bit(0);
pub const CR0_MD: Field = Field::new(1, 2);
pub const CR0_OST: Field = Field::bit(3);
pub const CR0_PRS: Field = Field::new(4, 3);
pub const CR0_TOGEN: Field = Field::bit(7);
pub const CR0_TRP: Field = Field::bit(8);
pub const CR0_TRS: Field = Field::new(9, 3);

/// Capture edge select of `channel` in `CR1`.
pub const fn cr1_cce(channel: usize) -> Field {
    Field::new(2 * channel as u32, 2)
}

/// Capture (1) or compare (0) function of `channel` in `CR1`.
pub const fn cr1_ccs(channel: usize) -> Field {
    Field::bit(8 + channel as u32)
}

bitflags::bitflags! {
    /// Bits shared by `IER`, `IFR` and `ICR`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Events: u32 {
        /// Counter reload (update).
        const UI = 1 << 0;
        /// Trigger input edge.
        const TI = 1 << 1;
        const CC0 = 1 << 2;
        const CC1 = 1 << 3;
        const CC2 = 1 << 4;
        const CC3 = 1 << 5;
    }
}

impl Events {
    /// Compare/capture event of `channel`.
    pub const fn cc(channel: usize) -> Self {
        Self::from_bits_truncate(Self::CC0.bits() << channel)
    }
}
