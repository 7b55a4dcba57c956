//! HC32L021 Device Driver Library
//!
//! This crate provides a layered architecture for hardware abstraction:
//!
//! # Module Organization
//!
//! - [`hw`]: Register maps and the [`RegisterBus`] access seam
//! - [`hal`]: Platform-independent trait definitions
//! - [`platform`]: Part-specific drivers (CTRIM, GTIM, LVD, TRNG, clocks, GPIO)
//! - [`peripheral`]: Cortex-M0+ core peripherals (SysTick, NVIC)
//! - [`ddl`]: Delays and small utilities
//!
//! Drivers never touch addresses directly; they are handed a bus. Firmware
//! passes [`Mmio`], host tests pass `sim::SimBus`.
//!
//! # Usage Example
//!
//! ```ignore
//! use hc32l021_ddl::Mmio;
//! use hc32l021_ddl::platform::hc32l021::lvd::{Lvd, LvdConfig};
//!
//! let bus = unsafe { Mmio::new() };
//! let lvd = Lvd::new(bus);
//! lvd.init(&LvdConfig::default());
//! lvd.enable();
//! ```

#![cfg_attr(not(test), no_std)]

#[cfg(any(test, feature = "sim"))]
extern crate alloc;

pub mod ddl;
pub mod hal;
pub mod hw;
pub mod peripheral;
pub mod platform;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

// Re-export commonly used types
pub use hal::gpio::{GpioController, PinLevel};
pub use hal::interrupt::{InterruptController, PriorityInterruptController};
pub use hal::timer::{DownCounter, Timer};
pub use hw::reg::{Field, Mmio, RegisterBus};
pub use platform::hc32l021::ConfigError;
