//! Peripheral Drivers
//!
//! Drivers for ARM core peripherals that every Cortex-M0+ part carries,
//! independent of the vendor register map.
//!
//! # Available Peripherals
//!
//! - [`systick`]: 24-bit SysTick down counter
//! - [`nvic`]: Nested Vectored Interrupt Controller

pub mod nvic;
pub mod systick;
