//! Platform Abstraction Layer
//!
//! Each supported part implements the [`Platform`] trait and exposes its
//! peripheral drivers in a submodule. Exactly one part is selected at build
//! time through a cargo feature and re-exported as [`CurrentPlatform`].
//!
//! # Usage
//!
//! ```ignore
//! use hc32l021_ddl::hw::reg::Mmio;
//! use hc32l021_ddl::platform::{CurrentPlatform, Platform};
//!
//! let bus = unsafe { Mmio::new() };
//! CurrentPlatform::early_init(bus)?;
//! log::info!("{} at {} Hz", CurrentPlatform::name(), CurrentPlatform::core_clock_hz());
//! ```

use crate::hw::reg::RegisterBus;

/// Platform trait - implemented by each supported part
pub trait Platform {
    /// Error returned by early initialization.
    type InitError: core::fmt::Debug;

    /// Platform name for debugging
    fn name() -> &'static str;

    /// Bring the clock tree to its boot configuration.
    ///
    /// Returns the resulting core clock in Hz.
    fn early_init<B: RegisterBus + Copy>(bus: B) -> Result<u32, Self::InitError>;

    /// Core clock in Hz as last computed.
    fn core_clock_hz() -> u32;
}

// Platform selection based on Cargo features
cfg_if::cfg_if! {
    if #[cfg(feature = "hc32l021")] {
        pub mod hc32l021;
        pub use hc32l021::Hc32l021Platform as CurrentPlatform;
    } else {
        compile_error!(
            "No platform selected!\n\
            Use: cargo build --features hc32l021"
        );
    }
}
