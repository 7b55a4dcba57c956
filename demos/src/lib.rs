//! Demo applications for the HC32L021 device driver library.
//!
//! Each module drives one peripheral the way a board bring-up would: enable
//! its clock gate, configure it through the driver, then either poll for a
//! bounded number of iterations or hand the work to an interrupt handler
//! registered in the dispatch table. All demos take the register bus as a
//! parameter, so they run unchanged against the simulated register file.
//!
//! - [`gtim_pwm`]: two PWM outputs from GTIM0
//! - [`gtim_capture`]: rising-edge input capture on GTIM0 CH0
//! - [`ctrim_calibration`]: RC48M frequency measurement
//! - [`ctrim_trim`]: RC48M automatic trim
//! - [`lvd_interrupt`]: low voltage interrupt toggling the LED
//! - [`trng_generate`]: 64-bit random numbers

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod ctrim_calibration;
pub mod ctrim_trim;
pub mod gtim_capture;
pub mod gtim_pwm;
pub mod lvd_interrupt;
pub mod trng_generate;

pub use board::DemoError;
