//! Architecture selection.
//!
//! Firmware builds for the Cortex-M0+ core mask interrupts through PRIMASK.
//! Host builds (unit tests, simulation) have no interrupts to mask.

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "arm", target_os = "none"))] {
        pub mod arm;
        pub use arm::irq::CortexMIrq as PlatformIrq;
    } else {
        pub mod host;
        pub use host::HostIrq as PlatformIrq;
    }
}
