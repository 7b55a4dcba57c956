//! GPIO ports.

use super::PERIPH_BASE;
use crate::hw::reg::Field;

pub const GPIO_BASE: usize = PERIPH_BASE + 0x2_0C00;
pub const PORT_STRIDE: usize = 0x40;
pub const PINS_PER_PORT: u8 = 16;

/// 1: input, 0: output.
pub const DIR: usize = 0x00;
pub const IN: usize = 0x04;
pub const OUT: usize = 0x08;
/// Write 1 to set the output bit.
pub const BSET: usize = 0x0C;
/// Write 1 to clear the output bit.
pub const BCLR: usize = 0x10;
pub const PU: usize = 0x14;
pub const PD: usize = 0x18;
pub const OD: usize = 0x1C;

pub const fn pin(n: u8) -> Field {
    Field::bit(n as u32)
}
