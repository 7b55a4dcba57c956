//! True random number generator (TRNG).

use super::PERIPH_BASE;
use crate::hw::reg::Field;

pub const TRNG_BASE: usize = PERIPH_BASE + 0x4C00;

pub const CR: usize = 0x00;
pub const MODE: usize = 0x04;
pub const DATA0: usize = 0x0C;
pub const DATA1: usize = 0x10;

/// Noise source enable.
pub const CR_RNG_CIR: Field = Field::bit(0);
/// Start a generation; cleared by hardware when done.
pub const CR_RNG_RUN: Field = Field::bit(1);

/// Load the current data registers as the new seed.
pub const MODE_LOAD: Field = Field::bit(0);
/// XOR the shift chain output back into the seed.
pub const MODE_FDBK: Field = Field::bit(1);
pub const MODE_CNT: Field = Field::new(2, 3);

/// Shift count used while seeding: 256 bits.
pub const MODE_CNT_SEED: u32 = 0b110;
/// Shift count used for a plain generation: 64 bits.
pub const MODE_CNT_GENERATE: u32 = 0b100;
