//! HC32L021 Platform Implementation
//!
//! Drivers for the on-chip peripherals of the HDSC HC32L021 (Cortex-M0+,
//! 64 KiB flash, 8 KiB SRAM).
//!
//! # Hardware Overview
//!
//! - **Timers**: CTRIM clock trimming/calibration, two GTIM general timers
//! - **Analog**: LVD low voltage detector
//! - **Security**: TRNG true random number generator
//! - **System**: SYSCTRL clock tree, flash wait states, GPIO ports A/B
//!
//! # Usage
//!
//! ```ignore
//! use hc32l021_ddl::hw::reg::Mmio;
//! use hc32l021_ddl::platform::hc32l021::{system, trng::Trng};
//!
//! let bus = unsafe { Mmio::new() };
//! system::system_init(bus)?;
//! let trng = Trng::new(bus);
//! trng.init()?;
//! let value = trng.random_u64()?;
//! ```

pub mod ctrim;
pub mod flash;
pub mod gpio;
pub mod gtim;
pub mod interrupt;
pub mod lvd;
pub mod sysctrl;
pub mod system;
pub mod trng;

use log::warn;

use super::Platform;
use crate::hw::reg::{Field, RegisterBus};

/// A configuration value outside the range its register field can hold.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidParameter { field: &'static str, value: u32 },
}

impl ConfigError {
    /// Accept `value` if it fits `register_field`.
    pub(crate) fn check(name: &'static str, register_field: Field, value: u32) -> Result<(), Self> {
        if register_field.fits(value) {
            Ok(())
        } else {
            warn!("{} = {:#x} does not fit its field", name, value);
            Err(ConfigError::InvalidParameter { field: name, value })
        }
    }
}

/// HC32L021 platform implementation.
pub struct Hc32l021Platform;

impl Platform for Hc32l021Platform {
    type InitError = sysctrl::ClockError;

    fn name() -> &'static str {
        "HC32L021"
    }

    fn early_init<B: RegisterBus + Copy>(bus: B) -> Result<u32, Self::InitError> {
        system::system_init(bus)
    }

    fn core_clock_hz() -> u32 {
        system::system_core_clock()
    }
}
