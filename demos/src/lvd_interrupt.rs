//! Low voltage warning: the LVD watches AVCC against 2.8 V and interrupts
//! on both crossings. The handler clears the flag and toggles the LED, so
//! the LED state follows the supply.

use hc32l021_ddl::platform::hc32l021::interrupt::{self, Irq};
use hc32l021_ddl::platform::hc32l021::lvd::{
    Action, FilterTime, Lvd, LvdConfig, Source, Threshold, Trigger,
};
use hc32l021_ddl::platform::hc32l021::sysctrl::{PeriphClocks, SysCtrl};
use hc32l021_ddl::{Mmio, RegisterBus};
use log::debug;

use crate::board::{self, DemoError, report};

pub const LVD_PRIORITY: u8 = 0;

pub fn config() -> LvdConfig {
    LvdConfig {
        source: Source::Avcc,
        threshold: Threshold::V2_8,
        filter: Some(FilterTime::Us1800),
        action: Action::Interrupt,
        trigger: Trigger::FALLING | Trigger::RISING,
    }
}

/// Configure the detector, install the handler and enable the line.
pub fn setup<B: RegisterBus + Copy>(bus: B) -> Result<(), DemoError> {
    SysCtrl::new(bus).periph_clock_enable(PeriphClocks::VC_LVD | PeriphClocks::GPIO);
    board::led_init(bus)?;

    let lvd = Lvd::new(bus);
    lvd.init(&config());
    lvd.flag_clear();
    lvd.int_enable();

    interrupt::register(Irq::Lvd, lvd_irq);
    interrupt::enable_nvic(bus, Irq::Lvd, LVD_PRIORITY, true)?;

    lvd.enable();
    Ok(())
}

/// Handler body. Returns whether a detection was pending.
pub fn on_lvd<B: RegisterBus + Copy>(bus: B) -> Result<bool, DemoError> {
    let lvd = Lvd::new(bus);
    if !lvd.flag_get() {
        return Ok(false);
    }
    lvd.flag_clear();
    board::led_toggle(bus)?;
    debug!("lvd_interrupt: below threshold = {}", lvd.status());
    Ok(true)
}

fn lvd_irq(_irq: Irq) {
    // SAFETY: runs on the chip, LVD and GPIO registers are mapped
    let bus = unsafe { Mmio::new() };
    report("lvd_interrupt", on_lvd(bus));
}
