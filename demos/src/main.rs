//! Demo firmware: brings up the clock tree, runs each polled demo once, then
//! sleeps with the LVD and capture interrupts armed.
//!
//! ```text
//! cargo build -p hc32l021-demos --features firmware --target thumbv6m-none-eabi --release
//! ```

#![no_std]
#![no_main]

use panic_halt as _;

use common::arch::arm::{enable_interrupts, wfi};
use cortex_m_rt::entry;
use hc32l021_ddl::Mmio;
use hc32l021_ddl::platform::{CurrentPlatform, Platform};
use hc32l021_demos::board::report;
use hc32l021_demos::{ctrim_calibration, ctrim_trim, gtim_capture, gtim_pwm, lvd_interrupt, trng_generate};

/// PWM periods to run before switching to interrupt-driven demos.
const PWM_PERIODS: u32 = 1_000;

#[entry]
fn main() -> ! {
    // SAFETY: this is the only code touching the register space
    let bus = unsafe { Mmio::new() };

    if CurrentPlatform::early_init(bus).is_err() {
        halt();
    }

    let mut seeds = [0u64; 4];
    report("trng_generate", trng_generate::run(bus, &mut seeds));
    report("ctrim_trim", ctrim_trim::run(bus));
    report("ctrim_calibration", ctrim_calibration::run(bus));
    report("gtim_pwm", gtim_pwm::run(bus, PWM_PERIODS));

    let lvd = report("lvd_interrupt", lvd_interrupt::setup(bus));
    let capture = report("gtim_capture", gtim_capture::setup(bus));
    if lvd.is_some() || capture.is_some() {
        enable_interrupts();
    }

    halt()
}

fn halt() -> ! {
    loop {
        wfi();
    }
}
