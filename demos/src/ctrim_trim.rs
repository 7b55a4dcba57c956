//! Automatic trim of RC48M at 4 MHz against the 32.768 kHz ETR reference.
//!
//! CTRIM steps the RC48M trim code until the cycle count in one reference
//! window lands within `error_limit` of the expected count. `OK` means the
//! trim converged; `MISS` or `OV` mean it gave up. The LED toggles on
//! success.

use hc32l021_ddl::RegisterBus;
use hc32l021_ddl::platform::hc32l021::ctrim::{
    Ctrim, RefClock, RefPrescaler, Status, TrimConfig, TrimStep, TrimTarget,
};
use hc32l021_ddl::platform::hc32l021::sysctrl::{PeriphClocks, SysCtrl};
use log::{info, warn};

use crate::board::{self, DemoError, POLL_LIMIT, poll_until};
use crate::ctrim_calibration::ETR_REF_HZ;

pub const TARGET_HZ: u32 = 4_000_000;

pub const PRESCALER: RefPrescaler = RefPrescaler::Div32;

/// Accepted distance from the expected count.
pub const ERROR_LIMIT: u16 = 0x10;

/// Target cycles expected in one `prescaler` window of `ref_hz`.
pub fn expected_count(target_hz: u32, ref_hz: u32, prescaler: RefPrescaler) -> u16 {
    (u64::from(target_hz) * u64::from(prescaler.divisor()) / u64::from(ref_hz)) as u16
}

pub fn config() -> TrimConfig {
    TrimConfig {
        target: TrimTarget::Rc48m,
        ref_clock: RefClock::Etr,
        prescaler: PRESCALER,
        step: TrimStep::Step16,
        reload: expected_count(TARGET_HZ, ETR_REF_HZ, PRESCALER),
        error_limit: ERROR_LIMIT,
        ..TrimConfig::default()
    }
}

/// Trim RC48M and return the converged trim code.
pub fn run<B: RegisterBus + Copy>(bus: B) -> Result<u16, DemoError> {
    SysCtrl::new(bus).periph_clock_enable(PeriphClocks::CTRIM | PeriphClocks::GPIO);
    board::led_init(bus)?;

    let ctrim = Ctrim::new(bus);
    ctrim.trim_init(&config())?;
    ctrim.flag_clear_all();
    ctrim.enable();

    let done = Status::OK | Status::MISS | Status::OV;
    let mut status = Status::empty();
    let finished = poll_until(POLL_LIMIT, || {
        status = ctrim.status();
        status.intersects(done)
    });
    ctrim.disable();
    ctrim.flag_clear_all();

    if !finished {
        return Err(DemoError::Timeout("ctrim trim"));
    }
    if !status.contains(Status::OK) {
        warn!("ctrim_trim: failed with {:?}", status);
        return Err(DemoError::TrimFailed(status));
    }

    let code = ctrim.trim_code();
    board::led_toggle(bus)?;
    info!("ctrim_trim: converged to {:#x}", code);
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::{board_bus, led_is_on};
    use hc32l021_ddl::hw::hc32l021::ctrim::{
        ARR, CR0, CR0_STEP, CTRIM_BASE, FLIM, ICR, ISR, TVAL,
    };
    use hc32l021_ddl::platform::hc32l021::ctrim::Mode;
    use hc32l021_ddl::sim::SimBus;

    /// ISR reports `outcome` on the fifth poll; TVAL holds `code`.
    fn trimming_bus(outcome: Status, code: u32) -> SimBus {
        let bus = board_bus();
        bus.write_zero_to_clear(CTRIM_BASE + ICR, CTRIM_BASE + ISR);
        bus.poke(CTRIM_BASE + TVAL, code);
        let mut polls = 0;
        bus.on_read(CTRIM_BASE + ISR, move |file| {
            polls += 1;
            if polls == 5 {
                let isr = file.get(CTRIM_BASE + ISR) | outcome.bits();
                file.set(CTRIM_BASE + ISR, isr);
            }
            file.get(CTRIM_BASE + ISR)
        });
        bus
    }

    #[test]
    fn expected_count_for_4mhz() {
        assert_eq!(expected_count(TARGET_HZ, ETR_REF_HZ, PRESCALER), 3_906);
        assert_eq!(expected_count(48_000_000, ETR_REF_HZ, RefPrescaler::Div1), 1_464);
    }

    #[test]
    fn converged_trim_returns_code_and_toggles_led() {
        let bus = trimming_bus(Status::OK, 0x0A7);
        assert_eq!(run(&bus), Ok(0x0A7));
        assert!(led_is_on(&bus));

        let ctrim = Ctrim::new(&bus);
        assert_eq!(ctrim.mode(), Mode::Rc48mTrim);
        assert_eq!(bus.peek(CTRIM_BASE + ARR), 3_906);
        assert_eq!(bus.peek(CTRIM_BASE + FLIM), 0x10);
        assert_eq!(CR0_STEP.get(bus.peek(CTRIM_BASE + CR0)), TrimStep::Step16 as u32);
        assert!(!ctrim.is_enabled());
        assert!(ctrim.status().is_empty());
    }

    #[test]
    fn miss_or_overflow_is_a_failure() {
        let bus = trimming_bus(Status::MISS | Status::END, 0);
        assert_eq!(
            run(&bus),
            Err(DemoError::TrimFailed(Status::MISS | Status::END))
        );
        assert!(!led_is_on(&bus));

        let bus = trimming_bus(Status::OV, 0);
        assert_eq!(run(&bus), Err(DemoError::TrimFailed(Status::OV)));
    }

    #[test]
    fn silent_trim_times_out() {
        let bus = board_bus();
        assert_eq!(run(&bus), Err(DemoError::Timeout("ctrim trim")));
    }
}
