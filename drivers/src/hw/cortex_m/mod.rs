//! ARMv6-M system control space registers used by the library.

pub mod nvic;
pub mod systick;
