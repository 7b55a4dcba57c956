//! Target-independent support code shared by the HC32L021 driver library
//! and the demo applications.
//!
//! - [`sync`]: spin locks usable from both thread mode and interrupt handlers
//! - [`arch`]: the interrupt-masking primitive for the current target

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod sync;

pub use arch::PlatformIrq;
