//! HC32L021 peripheral address map.

pub mod ctrim;
pub mod flash;
pub mod gpio;
pub mod gtim;
pub mod lvd;
pub mod sysctrl;
pub mod trng;

/// Start of the APB/AHB peripheral region.
pub const PERIPH_BASE: usize = 0x4000_0000;

/// Factory calibration word for the RC48M oscillator at 4 MHz.
pub const RC48M_TRIM_4M_ADDR: usize = 0x0010_07BC;
