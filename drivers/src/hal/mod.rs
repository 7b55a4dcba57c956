//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! Generic traits implemented by the SoC drivers in [`crate::platform`]
//! and the core drivers in [`crate::peripheral`], so demo code can be
//! written against capabilities rather than register maps.
//!
//! - [`gpio`]: General Purpose Input/Output control
//! - [`timer`]: Compare timers and down-counting delay sources
//! - [`interrupt`]: Interrupt controller management

pub mod gpio;
pub mod interrupt;
pub mod timer;
