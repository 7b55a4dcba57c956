//! Input capture on GTIM0 CH0: every rising edge on the capture pin latches
//! the counter into `CCR0` and raises the CTIM0 interrupt, whose handler
//! records the captured value.
//!
//! GTIM0 is shared with [`crate::gtim_pwm`]; run this after the PWM demo has
//! stopped the timer. The capture input has its own pin, PB4.

use core::sync::atomic::{AtomicU32, Ordering};

use hc32l021_ddl::hal::gpio::{Direction, GpioController, PullMode};
use hc32l021_ddl::platform::hc32l021::gpio::{Gpio, Pin, Port};
use hc32l021_ddl::platform::hc32l021::gtim::{
    CaptureEdge, Channel, ChannelFunction, Gtim, GtimConfig, Instance, Prescaler,
};
use hc32l021_ddl::platform::hc32l021::interrupt::{self, Irq};
use hc32l021_ddl::platform::hc32l021::sysctrl::{PeriphClocks, SysCtrl};
use hc32l021_ddl::{Mmio, RegisterBus};
use log::debug;

use crate::board::DemoError;

pub const CAPTURE_PIN: Pin = Pin::new(Port::B, 4);

pub const CAPTURE_PRIORITY: u8 = 1;

const CHANNEL: Channel = Channel::Ch0;

static CAPTURES: AtomicU32 = AtomicU32::new(0);
static LAST_CAPTURE: AtomicU32 = AtomicU32::new(0);

/// Configure the channel, install the handler and start counting.
pub fn setup<B: RegisterBus + Copy>(bus: B) -> Result<(), DemoError> {
    SysCtrl::new(bus).periph_clock_enable(PeriphClocks::GTIM0 | PeriphClocks::GPIO);

    let mut gpio = Gpio::new(bus);
    gpio.set_direction(CAPTURE_PIN, Direction::Input)?;
    gpio.set_pull(CAPTURE_PIN, PullMode::Down)?;

    let gtim = Gtim::new(bus, Instance::Gtim0);
    gtim.init(&GtimConfig {
        prescaler: Prescaler::Div16,
        ..GtimConfig::default()
    });
    gtim.set_channel_function(CHANNEL, ChannelFunction::Capture);
    gtim.set_capture_edge(CHANNEL, CaptureEdge::Rising);
    gtim.flag_clear_all();
    gtim.int_enable(CHANNEL.event());

    interrupt::register(Irq::Ctim0, ctim0_irq);
    interrupt::enable_nvic(bus, Irq::Ctim0, CAPTURE_PRIORITY, true)?;

    gtim.enable();
    Ok(())
}

/// Handler body: take the pending capture, if any.
pub fn on_capture<B: RegisterBus>(bus: B) -> Option<u16> {
    let gtim = Gtim::new(bus, Instance::Gtim0);
    if !gtim.flag_get(CHANNEL.event()) {
        return None;
    }
    let value = gtim.compare_capture_reg_get(CHANNEL);
    gtim.flag_clear(CHANNEL.event());

    LAST_CAPTURE.store(u32::from(value), Ordering::Relaxed);
    CAPTURES.fetch_add(1, Ordering::Relaxed);
    debug!("gtim_capture: {}", value);
    Some(value)
}

fn ctim0_irq(_irq: Irq) {
    // SAFETY: runs on the chip, GTIM0 registers are mapped
    let bus = unsafe { Mmio::new() };
    on_capture(bus);
}

/// Number of captures taken so far and the most recent value.
pub fn captures() -> (u32, u16) {
    (
        CAPTURES.load(Ordering::Relaxed),
        LAST_CAPTURE.load(Ordering::Relaxed) as u16,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::board_bus;
    use hc32l021_ddl::hw::cortex_m::nvic::{IPR0, ISER};
    use hc32l021_ddl::hw::hc32l021::gtim::{CCR0, GTIM0_BASE, ICR, IFR};
    use hc32l021_ddl::platform::hc32l021::gtim::Events;

    #[test]
    fn capture_setup_and_handler() {
        let bus = board_bus();
        bus.write_one_to_set(ISER, ISER);
        setup(&bus).unwrap();

        let gtim = Gtim::new(&bus, Instance::Gtim0);
        assert!(gtim.is_enabled());
        assert_eq!(gtim.channel_function(Channel::Ch0), ChannelFunction::Capture);
        assert_eq!(gtim.capture_edge(Channel::Ch0), CaptureEdge::Rising);
        assert_eq!(gtim.enabled_interrupts(), Events::CC0);
        assert_eq!(bus.peek(ISER), 1 << Irq::Ctim0.number());
        assert_eq!(bus.peek(IPR0 + 12), u32::from(CAPTURE_PRIORITY) << 22);
        assert!(interrupt::unregister(Irq::Ctim0).is_some());

        // Nothing latched yet
        assert_eq!(on_capture(&bus), None);
        assert_eq!(captures().0, 0);

        // Edge arrives: CCR0 latched, CC0 raised
        bus.write_zero_to_clear(GTIM0_BASE + ICR, GTIM0_BASE + IFR);
        bus.poke(GTIM0_BASE + CCR0, 0x1234);
        bus.poke(GTIM0_BASE + IFR, Events::CC0.bits() | Events::UI.bits());
        assert_eq!(on_capture(&bus), Some(0x1234));
        assert_eq!(captures(), (1, 0x1234));
        assert_eq!(bus.peek(GTIM0_BASE + IFR), Events::UI.bits());
        assert_eq!(on_capture(&bus), None);
    }

    #[test]
    fn capture_pin_is_not_driven_by_other_demos() {
        use crate::board::LED;
        use crate::ctrim_calibration::ETR_PIN;
        use crate::gtim_pwm::PWM_PINS;

        assert!(!PWM_PINS.contains(&CAPTURE_PIN));
        assert_ne!(CAPTURE_PIN, LED);
        assert_ne!(CAPTURE_PIN, ETR_PIN);
    }
}
