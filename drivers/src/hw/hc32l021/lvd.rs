//! Low voltage detector (LVD).

use super::PERIPH_BASE;
use crate::hw::reg::Field;

pub const LVD_BASE: usize = PERIPH_BASE + 0x2400;

pub const CR: usize = 0x00;
pub const IFR: usize = 0x04;

pub const CR_EN: Field = Field::bit(0);
pub const CR_SRC: Field = Field::new(1, 2);
pub const CR_VTDS: Field = Field::new(4, 4);
pub const CR_FLTEN: Field = Field::bit(8);
pub const CR_FLTTIME: Field = Field::new(9, 3);
/// 0: raise an interrupt, 1: reset the chip.
pub const CR_ACT: Field = Field::bit(12);
pub const CR_FTEN: Field = Field::bit(13);
pub const CR_RTEN: Field = Field::bit(14);
pub const CR_HTEN: Field = Field::bit(15);
pub const CR_IE: Field = Field::bit(16);

/// Trigger enables, contiguous from `CR_FTEN`.
pub const CR_TRIGGER: Field = Field::new(13, 3);

/// Interrupt flag, write 0 to clear.
pub const IFR_INTF: Field = Field::bit(0);
/// Filtered comparator output, read only.
pub const IFR_FILTER: Field = Field::bit(1);
