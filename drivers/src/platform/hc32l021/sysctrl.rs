//! HC32L021 System Control (SYSCTRL) Driver
//!
//! Oscillator enables, system clock switch, HCLK/PCLK prescalers and
//! peripheral clock gates. `CR0` and `CR1` are write protected: every
//! write must be preceded by the two-word key sequence in `CR2`.

use log::{debug, trace, warn};

use super::ConfigError;
use crate::hw::hc32l021::sysctrl::*;
use crate::hw::reg::{Field, RegisterBus};

pub use crate::hw::hc32l021::sysctrl::PeriphClocks;

/// Polls of an oscillator's stable bit before giving up.
pub const CLOCK_STABLE_TIMEOUT: u32 = 0x1_0000;

/// System clock sources, `CR0.CLKSW`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum ClockSource {
    Rc48m = 0,
    Xth = 1,
    Rcl = 2,
    Xtl = 3,
}

impl ClockSource {
    fn from_bits(bits: u32) -> Option<Self> {
        Some(match bits {
            0 => ClockSource::Rc48m,
            1 => ClockSource::Xth,
            2 => ClockSource::Rcl,
            3 => ClockSource::Xtl,
            _ => return None,
        })
    }

    fn enable_bit(self) -> Field {
        match self {
            ClockSource::Rc48m => CR1_RC48M_EN,
            ClockSource::Xth => CR1_XTH_EN,
            ClockSource::Rcl => CR1_RCL_EN,
            ClockSource::Xtl => CR1_XTL_EN,
        }
    }

    fn stable_bit(self) -> (usize, Field) {
        match self {
            ClockSource::Rc48m => (RC48M_CR, RC48M_STABLE),
            ClockSource::Xth => (XTH_CR, XTH_STABLE),
            ClockSource::Rcl => (RCL_CR, RCL_STABLE),
            ClockSource::Xtl => (XTL_CR, XTL_STABLE),
        }
    }
}

/// RC48M output frequency, `RC48M_CR.FSEL`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum Rc48mFreq {
    F4M = 0,
    F8M,
    F16M,
    F24M,
    F32M,
    F48M,
}

impl Rc48mFreq {
    fn from_bits(bits: u32) -> Option<Self> {
        Some(match bits {
            0 => Rc48mFreq::F4M,
            1 => Rc48mFreq::F8M,
            2 => Rc48mFreq::F16M,
            3 => Rc48mFreq::F24M,
            4 => Rc48mFreq::F32M,
            5 => Rc48mFreq::F48M,
            _ => return None,
        })
    }

    pub const fn hz(self) -> u32 {
        RC48M_FREQ_HZ[self as usize]
    }
}

/// HCLK prescaler, `CR0.HCLK_PRS`: divide the system clock by `2^n`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum HclkDiv {
    Div1 = 0,
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
}

/// PCLK prescaler, `CR0.PCLK_PRS`: divide HCLK by `2^n`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum PclkDiv {
    Div1 = 0,
    Div2,
    Div4,
    Div8,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The oscillator never reported stable.
    NotStable(ClockSource),
    Config(ConfigError),
}

impl From<ConfigError> for ClockError {
    fn from(err: ConfigError) -> Self {
        ClockError::Config(err)
    }
}

/// SYSCTRL driver.
pub struct SysCtrl<B: RegisterBus> {
    bus: B,
    base: usize,
}

impl<B: RegisterBus> SysCtrl<B> {
    pub const fn new(bus: B) -> Self {
        Self {
            bus,
            base: SYSCTRL_BASE,
        }
    }

    #[inline]
    fn addr(&self, offset: usize) -> usize {
        self.base + offset
    }

    /// Open `CR0`/`CR1` for exactly one write.
    pub fn unlock(&self) {
        self.bus.write(self.addr(CR2), CR2_KEY_FIRST);
        self.bus.write(self.addr(CR2), CR2_KEY_SECOND);
    }

    fn protected_write_field(&self, offset: usize, field: Field, value: u32) {
        let current = self.bus.read(self.addr(offset));
        self.unlock();
        self.bus.write(self.addr(offset), field.set(current, value));
    }

    pub fn is_stable(&self, source: ClockSource) -> bool {
        let (offset, bit) = source.stable_bit();
        self.bus.read_field(self.addr(offset), bit) != 0
    }

    /// Start an oscillator and wait for it to settle.
    pub fn clock_source_enable(&self, source: ClockSource) -> Result<(), ClockError> {
        debug!("sysctrl: enable {:?}", source);
        self.protected_write_field(CR1, source.enable_bit(), 1);

        for _ in 0..CLOCK_STABLE_TIMEOUT {
            if self.is_stable(source) {
                return Ok(());
            }
        }
        warn!("sysctrl: {:?} not stable", source);
        Err(ClockError::NotStable(source))
    }

    pub fn clock_source_disable(&self, source: ClockSource) {
        self.protected_write_field(CR1, source.enable_bit(), 0);
    }

    pub fn is_source_enabled(&self, source: ClockSource) -> bool {
        self.bus.read_field(self.addr(CR1), source.enable_bit()) != 0
    }

    /// Switch the system clock. The target oscillator must already be stable.
    pub fn switch_clock(&self, source: ClockSource) -> Result<(), ClockError> {
        if !self.is_stable(source) {
            return Err(ClockError::NotStable(source));
        }
        trace!("sysctrl: switch system clock to {:?}", source);
        self.protected_write_field(CR0, CR0_CLKSW, source as u32);
        Ok(())
    }

    /// Current system clock source; `None` for a reserved encoding.
    pub fn clock_source(&self) -> Option<ClockSource> {
        ClockSource::from_bits(self.bus.read_field(self.addr(CR0), CR0_CLKSW))
    }

    pub fn set_hclk_div(&self, div: HclkDiv) {
        self.protected_write_field(CR0, CR0_HCLK_PRS, div as u32);
    }

    /// HCLK divisor currently applied to the system clock.
    pub fn hclk_divisor(&self) -> u32 {
        1 << self.bus.read_field(self.addr(CR0), CR0_HCLK_PRS)
    }

    pub fn set_pclk_div(&self, div: PclkDiv) {
        self.protected_write_field(CR0, CR0_PCLK_PRS, div as u32);
    }

    /// PCLK divisor currently applied to HCLK.
    pub fn pclk_divisor(&self) -> u32 {
        1 << self.bus.read_field(self.addr(CR0), CR0_PCLK_PRS)
    }

    pub fn periph_clock_enable(&self, clocks: PeriphClocks) {
        self.bus.set_bits(self.addr(PERI_CLKEN0), clocks.bits());
    }

    pub fn periph_clock_disable(&self, clocks: PeriphClocks) {
        self.bus.clear_bits(self.addr(PERI_CLKEN0), clocks.bits());
    }

    /// True if every gate in `clocks` is open.
    pub fn periph_clock_is_enabled(&self, clocks: PeriphClocks) -> bool {
        self.bus.bits_set(self.addr(PERI_CLKEN0), clocks.bits())
    }

    /// Select the RC48M frequency together with the trim value matching it.
    pub fn set_rc48m_freq(&self, freq: Rc48mFreq, trim: u16) -> Result<(), ConfigError> {
        let trim = u32::from(trim);
        ConfigError::check("rc48m_trim", RC48M_TRIM, trim)?;
        self.bus.modify(
            self.addr(RC48M_CR),
            RC48M_FSEL.mask() | RC48M_TRIM.mask(),
            RC48M_FSEL.prep(freq as u32) | RC48M_TRIM.prep(trim),
        );
        Ok(())
    }

    pub fn rc48m_freq(&self) -> Option<Rc48mFreq> {
        Rc48mFreq::from_bits(self.bus.read_field(self.addr(RC48M_CR), RC48M_FSEL))
    }

    pub fn rc48m_trim(&self) -> u16 {
        self.bus.read_field(self.addr(RC48M_CR), RC48M_TRIM) as u16
    }

    pub fn set_rc48m_trim(&self, trim: u16) -> Result<(), ConfigError> {
        let trim = u32::from(trim);
        ConfigError::check("rc48m_trim", RC48M_TRIM, trim)?;
        self.bus
            .write_field(self.addr(RC48M_CR), RC48M_TRIM, trim);
        Ok(())
    }

    pub fn rcl_hz(&self) -> u32 {
        RCL_FREQ_HZ[self.bus.read_field(self.addr(RCL_CR), RCL_FSEL) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBus;

    fn reg(offset: usize) -> usize {
        SYSCTRL_BASE + offset
    }

    #[test]
    fn protected_writes_are_preceded_by_key() {
        let bus = SimBus::new();
        bus.poke(reg(XTH_CR), XTH_STABLE.mask());
        let sysctrl = SysCtrl::new(&bus);
        sysctrl.switch_clock(ClockSource::Xth).unwrap();

        let writes = bus.writes();
        assert_eq!(
            writes,
            vec![
                (reg(CR2), CR2_KEY_FIRST),
                (reg(CR2), CR2_KEY_SECOND),
                (reg(CR0), 1),
            ]
        );
        assert_eq!(sysctrl.clock_source(), Some(ClockSource::Xth));
    }

    #[test]
    fn switch_refuses_unstable_source() {
        let bus = SimBus::new();
        let sysctrl = SysCtrl::new(&bus);
        assert_eq!(
            sysctrl.switch_clock(ClockSource::Xtl),
            Err(ClockError::NotStable(ClockSource::Xtl))
        );
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn enable_waits_for_stable() {
        let bus = SimBus::new();
        let mut polls = 0;
        bus.on_read(reg(RCL_CR), move |_| {
            polls += 1;
            if polls > 5 { RCL_STABLE.mask() } else { 0 }
        });
        let sysctrl = SysCtrl::new(&bus);
        assert_eq!(sysctrl.clock_source_enable(ClockSource::Rcl), Ok(()));
        assert!(sysctrl.is_source_enabled(ClockSource::Rcl));
        assert_eq!(bus.read_count(reg(RCL_CR)), 6);

        assert_eq!(
            sysctrl.clock_source_enable(ClockSource::Xth),
            Err(ClockError::NotStable(ClockSource::Xth))
        );
        assert_eq!(bus.read_count(reg(XTH_CR)), CLOCK_STABLE_TIMEOUT as usize);

        sysctrl.clock_source_disable(ClockSource::Rcl);
        assert!(!sysctrl.is_source_enabled(ClockSource::Rcl));
        assert!(sysctrl.is_source_enabled(ClockSource::Xth));
    }

    #[test]
    fn prescalers_round_trip() {
        let bus = SimBus::new();
        let sysctrl = SysCtrl::new(&bus);
        sysctrl.set_hclk_div(HclkDiv::Div8);
        sysctrl.set_pclk_div(PclkDiv::Div4);
        assert_eq!(sysctrl.hclk_divisor(), 8);
        assert_eq!(sysctrl.pclk_divisor(), 4);
        assert_eq!(sysctrl.clock_source(), Some(ClockSource::Rc48m));
    }

    #[test]
    fn peripheral_gates() {
        let bus = SimBus::new();
        let sysctrl = SysCtrl::new(&bus);
        sysctrl.periph_clock_enable(PeriphClocks::GTIM0 | PeriphClocks::GPIO);
        sysctrl.periph_clock_enable(PeriphClocks::TRNG);
        sysctrl.periph_clock_disable(PeriphClocks::GPIO);
        assert!(sysctrl.periph_clock_is_enabled(PeriphClocks::GTIM0 | PeriphClocks::TRNG));
        assert!(!sysctrl.periph_clock_is_enabled(PeriphClocks::GPIO));
    }

    #[test]
    fn rc48m_frequency_and_trim() {
        let bus = SimBus::new();
        bus.poke(reg(RC48M_CR), RC48M_STABLE.mask());
        let sysctrl = SysCtrl::new(&bus);
        sysctrl.set_rc48m_freq(Rc48mFreq::F24M, 0x3A5).unwrap();
        assert_eq!(sysctrl.rc48m_freq(), Some(Rc48mFreq::F24M));
        assert_eq!(sysctrl.rc48m_trim(), 0x3A5);
        assert!(sysctrl.is_stable(ClockSource::Rc48m));

        sysctrl.set_rc48m_trim(0x123).unwrap();
        assert_eq!(sysctrl.rc48m_trim(), 0x123);
        assert_eq!(sysctrl.rc48m_freq(), Some(Rc48mFreq::F24M));
        assert!(sysctrl.set_rc48m_trim(0x1000).is_err());
        assert_eq!(Rc48mFreq::F48M.hz(), 48_000_000);
    }

    #[test]
    fn rcl_frequency_select() {
        let bus = SimBus::new();
        let sysctrl = SysCtrl::new(&bus);
        assert_eq!(sysctrl.rcl_hz(), 32_768);
        bus.poke(reg(RCL_CR), RCL_FSEL.mask());
        assert_eq!(sysctrl.rcl_hz(), 38_400);
    }
}
