//! Register maps.
//!
//! Base addresses, register offsets and bit-field positions, fixed by the
//! silicon. Nothing here touches hardware; the drivers in
//! [`crate::platform`] and [`crate::peripheral`] do, through a
//! [`reg::RegisterBus`].

pub mod cortex_m;
pub mod hc32l021;
pub mod reg;
