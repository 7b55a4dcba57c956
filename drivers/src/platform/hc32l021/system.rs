//! HC32L021 System Startup
//!
//! Boot clock bring-up and the `SystemCoreClock` bookkeeping the delay
//! helpers rely on. The core clock is a process-wide atomic updated by
//! [`system_core_clock_update`] after every clock tree change.

use core::sync::atomic::{AtomicU32, Ordering};

use log::debug;

use super::flash::Flash;
use super::sysctrl::{ClockError, ClockSource, HclkDiv, PclkDiv, Rc48mFreq, SysCtrl};
use crate::hw::hc32l021::RC48M_TRIM_4M_ADDR;
use crate::hw::hc32l021::sysctrl::*;
use crate::hw::reg::RegisterBus;

/// Core clock out of reset: RC48M at 4 MHz, HCLK undivided.
pub const BOOT_CORE_CLOCK_HZ: u32 = 4_000_000;

/// Crystal assumed on XTH unless a [`ClockConfig`] says otherwise.
pub const XTH_DEFAULT_HZ: u32 = 8_000_000;

static SYSTEM_CORE_CLOCK: AtomicU32 = AtomicU32::new(BOOT_CORE_CLOCK_HZ);
static XTH_HZ: AtomicU32 = AtomicU32::new(XTH_DEFAULT_HZ);

/// Clock tree setup applied by [`configure_clock`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClockConfig {
    pub source: ClockSource,
    /// Only used when `source` is RC48M.
    pub rc48m_freq: Rc48mFreq,
    pub hclk_div: HclkDiv,
    pub pclk_div: PclkDiv,
    /// Frequency of the crystal on XTH, if one is fitted.
    pub xth_hz: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            source: ClockSource::Rc48m,
            rc48m_freq: Rc48mFreq::F4M,
            hclk_div: HclkDiv::Div1,
            pclk_div: PclkDiv::Div1,
            xth_hz: XTH_DEFAULT_HZ,
        }
    }
}

/// Last computed HCLK in Hz.
pub fn system_core_clock() -> u32 {
    SYSTEM_CORE_CLOCK.load(Ordering::Relaxed)
}

/// Frequency of the selected system clock source, before the HCLK divider.
fn source_hz<B: RegisterBus>(bus: &B) -> u32 {
    let cr0 = bus.read(SYSCTRL_BASE + CR0);
    match CR0_CLKSW.get(cr0) {
        0 => {
            let fsel = bus.read_field(SYSCTRL_BASE + RC48M_CR, RC48M_FSEL) as usize;
            RC48M_FREQ_HZ.get(fsel).copied().unwrap_or(BOOT_CORE_CLOCK_HZ)
        }
        1 => XTH_HZ.load(Ordering::Relaxed),
        2 => {
            let fsel = bus.read_field(SYSCTRL_BASE + RCL_CR, RCL_FSEL) as usize;
            RCL_FREQ_HZ[fsel]
        }
        3 => XTL_FREQ_HZ,
        _ => BOOT_CORE_CLOCK_HZ,
    }
}

/// Recompute HCLK from the clock switch, oscillator settings and HCLK
/// prescaler, store it and return it.
pub fn system_core_clock_update<B: RegisterBus>(bus: B) -> u32 {
    let hclk_prs = bus.read_field(SYSCTRL_BASE + CR0, CR0_HCLK_PRS);
    let hz = source_hz(&bus) >> hclk_prs;
    SYSTEM_CORE_CLOCK.store(hz, Ordering::Relaxed);
    hz
}

/// Switch the clock tree to `config`.
///
/// Flash wait states are raised before the switch when the new HCLK needs
/// them and lowered afterwards when it does not. The RC48M trim currently
/// loaded is kept across frequency changes.
pub fn configure_clock<B: RegisterBus + Copy>(bus: B, config: &ClockConfig) -> Result<u32, ClockError> {
    debug!("system: configure clock {:?}", config);
    XTH_HZ.store(config.xth_hz, Ordering::Relaxed);

    let sysctrl = SysCtrl::new(bus);
    let flash = Flash::new(bus);

    let target_source_hz = match config.source {
        ClockSource::Rc48m => {
            sysctrl.set_rc48m_freq(config.rc48m_freq, sysctrl.rc48m_trim())?;
            config.rc48m_freq.hz()
        }
        ClockSource::Xth => config.xth_hz,
        ClockSource::Rcl => sysctrl.rcl_hz(),
        ClockSource::Xtl => XTL_FREQ_HZ,
    };
    let target_hz = target_source_hz >> config.hclk_div as u32;

    sysctrl.clock_source_enable(config.source)?;
    flash.configure_for(target_hz.max(system_core_clock()));

    sysctrl.set_hclk_div(config.hclk_div);
    sysctrl.set_pclk_div(config.pclk_div);
    sysctrl.switch_clock(config.source)?;

    flash.configure_for(target_hz);
    Ok(system_core_clock_update(bus))
}

/// Boot-time clock setup: load the factory RC48M trim for 4 MHz and run
/// the core from RC48M at 4 MHz. Returns the resulting core clock.
pub fn system_init<B: RegisterBus + Copy>(bus: B) -> Result<u32, ClockError> {
    let trim = RC48M_TRIM.get(bus.read(RC48M_TRIM_4M_ADDR));
    debug!("system: factory rc48m trim {:#x}", trim);

    SysCtrl::new(bus).set_rc48m_freq(Rc48mFreq::F4M, trim as u16)?;
    configure_clock(bus, &ClockConfig::default())
}
