//! Flash controller: wait states and register unlock.

use super::PERIPH_BASE;
use crate::hw::reg::Field;

pub const FLASH_BASE: usize = PERIPH_BASE + 0x2_0000;

pub const CR: usize = 0x20;
/// Unlock sequence register for `CR`.
pub const BYPASS: usize = 0x2C;

pub const BYPASS_KEY_FIRST: u32 = 0x5A5A;
pub const BYPASS_KEY_SECOND: u32 = 0xA5A5;

pub const CR_OP: Field = Field::new(0, 2);
pub const CR_WAIT: Field = Field::new(2, 2);
