//! Two PWM outputs from GTIM0: CH0 at 25 % and CH1 at 75 % duty.
//!
//! The counter runs from PCLK/8 with a 1000-tick period; the foreground
//! loop counts periods by polling the update flag.

use hc32l021_ddl::RegisterBus;
use hc32l021_ddl::hal::gpio::{Direction, GpioController};
use hc32l021_ddl::platform::hc32l021::gpio::{Gpio, Pin, Port};
use hc32l021_ddl::platform::hc32l021::gtim::{
    Channel, ChannelFunction, CompareMode, Events, Gtim, GtimConfig, Instance, Prescaler,
};
use hc32l021_ddl::platform::hc32l021::sysctrl::{PeriphClocks, SysCtrl};
use log::info;

use crate::board::{DemoError, POLL_LIMIT, poll_until};

/// Counter reload; the PWM period is `PERIOD + 1` ticks.
pub const PERIOD: u16 = 999;

/// Compare value per channel.
pub const DUTY: [(Channel, u16); 2] = [(Channel::Ch0, 250), (Channel::Ch1, 750)];

/// CH0 and CH1 outputs.
pub const PWM_PINS: [Pin; 2] = [Pin::new(Port::A, 5), Pin::new(Port::A, 6)];

/// Configure pins and timer and start the counter.
pub fn setup<B: RegisterBus + Copy>(bus: B) -> Result<Gtim<B>, DemoError> {
    SysCtrl::new(bus).periph_clock_enable(PeriphClocks::GTIM0 | PeriphClocks::GPIO);

    let mut gpio = Gpio::new(bus);
    for pin in PWM_PINS {
        gpio.set_direction(pin, Direction::Output)?;
    }

    let gtim = Gtim::new(bus, Instance::Gtim0);
    gtim.init(&GtimConfig {
        prescaler: Prescaler::Div8,
        reload: PERIOD,
        ..GtimConfig::default()
    });
    for (channel, duty) in DUTY {
        gtim.set_channel_function(channel, ChannelFunction::Compare);
        gtim.set_compare_mode(channel, CompareMode::Pwm1);
        gtim.compare_capture_reg_set(channel, duty);
    }
    gtim.flag_clear_all();
    gtim.enable();
    Ok(gtim)
}

/// Run the PWM for `periods` counter periods, then stop the timer.
pub fn run<B: RegisterBus + Copy>(bus: B, periods: u32) -> Result<u32, DemoError> {
    let gtim = setup(bus)?;

    for _ in 0..periods {
        if !poll_until(POLL_LIMIT, || gtim.flag_get(Events::UI)) {
            gtim.disable();
            return Err(DemoError::Timeout("gtim update"));
        }
        gtim.flag_clear(Events::UI);
    }

    gtim.disable();
    info!("gtim_pwm: {} periods", periods);
    Ok(periods)
}
