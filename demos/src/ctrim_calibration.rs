//! Measure the RC48M frequency with CTRIM against a 32.768 kHz reference on
//! the CTRIM_ETR pin.
//!
//! One prescaled reference period gates the counter; at `END` the number of
//! RC48M cycles seen in that window is waiting in `FCAP`.

use hc32l021_ddl::RegisterBus;
use hc32l021_ddl::hal::gpio::{Direction, GpioController};
use hc32l021_ddl::platform::hc32l021::ctrim::{
    CalibConfig, CalibTarget, Ctrim, RefClock, RefPrescaler, Status,
};
use hc32l021_ddl::platform::hc32l021::gpio::{Gpio, Pin, Port};
use hc32l021_ddl::platform::hc32l021::sysctrl::{PeriphClocks, SysCtrl};
use log::info;

use crate::board::{DemoError, POLL_LIMIT, poll_until};

/// Frequency fed to CTRIM_ETR.
pub const ETR_REF_HZ: u32 = 32_768;

pub const ETR_PIN: Pin = Pin::new(Port::A, 1);

pub const PRESCALER: RefPrescaler = RefPrescaler::Div32;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// RC48M cycles counted in one gate window.
    pub capture: u16,
    /// Frequency those cycles correspond to.
    pub hz: u32,
}

/// Convert a capture taken over one `prescaler` window of `ref_hz`.
pub fn capture_to_hz(capture: u16, ref_hz: u32, prescaler: RefPrescaler) -> u32 {
    (u64::from(capture) * u64::from(ref_hz) / u64::from(prescaler.divisor())) as u32
}

pub fn run<B: RegisterBus + Copy>(bus: B) -> Result<Measurement, DemoError> {
    SysCtrl::new(bus).periph_clock_enable(PeriphClocks::CTRIM | PeriphClocks::GPIO);
    Gpio::new(bus).set_direction(ETR_PIN, Direction::Input)?;

    let ctrim = Ctrim::new(bus);
    ctrim.calib_init(&CalibConfig {
        target: CalibTarget::Rc48m,
        ref_clock: RefClock::Etr,
        prescaler: PRESCALER,
        one_shot: true,
        ..CalibConfig::default()
    })?;
    ctrim.flag_clear_all();
    ctrim.enable();

    let finished = poll_until(POLL_LIMIT, || ctrim.flag_get(Status::END));
    ctrim.disable();
    if !finished {
        return Err(DemoError::Timeout("ctrim end"));
    }

    let capture = ctrim.capture();
    ctrim.flag_clear_all();

    let measurement = Measurement {
        capture,
        hz: capture_to_hz(capture, ETR_REF_HZ, PRESCALER),
    };
    info!("ctrim_calibration: {:?}", measurement);
    Ok(measurement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::board_bus;
    use hc32l021_ddl::hw::hc32l021::ctrim::{CR1, CR1_EN, CTRIM_BASE, FCAP, ICR, ISR};
    use hc32l021_ddl::platform::hc32l021::ctrim::Mode;

    #[test]
    fn capture_scales_to_frequency() {
        assert_eq!(capture_to_hz(3_906, ETR_REF_HZ, RefPrescaler::Div32), 3_999_744);
        assert_eq!(capture_to_hz(0, ETR_REF_HZ, RefPrescaler::Div1), 0);
        assert_eq!(capture_to_hz(1_465, ETR_REF_HZ, RefPrescaler::Div1), 48_005_120);
    }

    #[test]
    fn measures_after_end() {
        let bus = board_bus();
        bus.write_zero_to_clear(CTRIM_BASE + ICR, CTRIM_BASE + ISR);
        bus.poke(CTRIM_BASE + FCAP, 3_906);
        let mut polls = 0;
        bus.on_read(CTRIM_BASE + ISR, move |file| {
            polls += 1;
            if polls == 10 {
                let isr = file.get(CTRIM_BASE + ISR) | Status::END.bits();
                file.set(CTRIM_BASE + ISR, isr);
            }
            file.get(CTRIM_BASE + ISR)
        });

        let measurement = run(&bus).unwrap();
        assert_eq!(measurement.capture, 3_906);
        assert_eq!(measurement.hz, 3_999_744);

        let ctrim = Ctrim::new(&bus);
        assert_eq!(ctrim.mode(), Mode::Rc48mCalib);
        assert_eq!(ctrim.ref_clock(), Some(RefClock::Etr));
        assert!(!ctrim.is_enabled());
        assert!(ctrim.status().is_empty());
    }

    #[test]
    fn missing_reference_times_out() {
        let bus = board_bus();
        assert_eq!(run(&bus), Err(DemoError::Timeout("ctrim end")));
        assert_eq!(CR1_EN.get(bus.peek(CTRIM_BASE + CR1)), 0);
    }
}
