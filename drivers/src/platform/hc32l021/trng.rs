//! HC32L021 True Random Number Generator (TRNG) Driver
//!
//! Each run shifts the noise source into a 64-bit register pair
//! (`DATA0`/`DATA1`). Power-up needs a seeding run with load and feedback
//! enabled before plain runs produce usable output.

use log::{trace, warn};

use crate::hw::hc32l021::trng::*;
use crate::hw::reg::RegisterBus;

/// Polls of `RNG_RUN` before a run is declared stuck.
pub const TRNG_TIMEOUT: u32 = 0x1000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrngError {
    /// `RNG_RUN` did not self-clear within [`TRNG_TIMEOUT`] polls.
    Timeout,
}

/// TRNG driver.
pub struct Trng<B: RegisterBus> {
    bus: B,
    base: usize,
}

impl<B: RegisterBus> Trng<B> {
    pub const fn new(bus: B) -> Self {
        Self {
            bus,
            base: TRNG_BASE,
        }
    }

    #[inline]
    fn addr(&self, offset: usize) -> usize {
        self.base + offset
    }

    /// Power the noise source and seed the generator.
    pub fn init(&self) -> Result<(), TrngError> {
        self.bus.set_bits(self.addr(CR), CR_RNG_CIR.mask());

        // Seed: load the data registers and feed the chain back into them
        self.run(true, true, MODE_CNT_SEED)?;
        // One plain run to flush the seed
        self.run(false, false, MODE_CNT_GENERATE)
    }

    /// Produce 64 new bits in `DATA0`/`DATA1`.
    pub fn generate(&self) -> Result<(), TrngError> {
        self.run(false, false, MODE_CNT_GENERATE)
    }

    fn run(&self, load: bool, feedback: bool, count: u32) -> Result<(), TrngError> {
        trace!("trng: run load={} fdbk={} cnt={}", load, feedback, count);

        self.bus.modify(
            self.addr(MODE),
            MODE_LOAD.mask() | MODE_FDBK.mask() | MODE_CNT.mask(),
            MODE_LOAD.prep(u32::from(load))
                | MODE_FDBK.prep(u32::from(feedback))
                | MODE_CNT.prep(count),
        );
        self.bus.set_bits(self.addr(CR), CR_RNG_RUN.mask());

        for _ in 0..TRNG_TIMEOUT {
            if self.bus.read_field(self.addr(CR), CR_RNG_RUN) == 0 {
                return Ok(());
            }
        }
        warn!("trng: run did not finish after {} polls", TRNG_TIMEOUT);
        Err(TrngError::Timeout)
    }

    pub fn data0(&self) -> u32 {
        self.bus.read(self.addr(DATA0))
    }

    pub fn data1(&self) -> u32 {
        self.bus.read(self.addr(DATA1))
    }

    /// Generate and return the 64-bit result, `DATA1` in the high word.
    pub fn random_u64(&self) -> Result<u64, TrngError> {
        self.generate()?;
        Ok((u64::from(self.data1()) << 32) | u64::from(self.data0()))
    }

    /// Power down the noise source.
    pub fn disable(&self) {
        self.bus.clear_bits(self.addr(CR), CR_RNG_CIR.mask());
    }

    pub fn is_enabled(&self) -> bool {
        self.bus.read_field(self.addr(CR), CR_RNG_CIR) != 0
    }
}
