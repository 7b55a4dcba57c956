//! HC32L021 Clock Trim (CTRIM) Driver
//!
//! CTRIM counts the trimmed oscillator against a reference clock over one
//! reference period (`ARR` reference edges) and compares the count with the
//! expected value. In trim mode the hardware then nudges the oscillator's
//! trim code by a shrinking step until the error falls under `FLIM`; in
//! calibration mode it only captures the count into `FCAP` so software can
//! compute the frequency. The search itself runs in silicon; this driver
//! programs it and reports its status bits.

use log::debug;

use super::ConfigError;
use crate::hw::hc32l021::ctrim::*;
use crate::hw::reg::RegisterBus;

pub use crate::hw::hc32l021::ctrim::{Interrupts, Status};

/// Oscillator under calibration (`CR1.MD` with the calibration bit set).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CalibTarget {
    Rc48m,
    Rcl,
}

/// Oscillator under automatic trim (`CR1.MD` with the calibration bit clear).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrimTarget {
    Rc48m,
    Rcl,
}

/// Operating mode as encoded in `CR1.MD`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum Mode {
    Rc48mTrim = 0b00,
    RclTrim = 0b01,
    Rc48mCalib = 0b10,
    RclCalib = 0b11,
}

impl Mode {
    fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0b00 => Mode::Rc48mTrim,
            0b01 => Mode::RclTrim,
            0b10 => Mode::Rc48mCalib,
            _ => Mode::RclCalib,
        }
    }
}

impl From<CalibTarget> for Mode {
    fn from(target: CalibTarget) -> Self {
        match target {
            CalibTarget::Rc48m => Mode::Rc48mCalib,
            CalibTarget::Rcl => Mode::RclCalib,
        }
    }
}

impl From<TrimTarget> for Mode {
    fn from(target: TrimTarget) -> Self {
        match target {
            TrimTarget::Rc48m => Mode::Rc48mTrim,
            TrimTarget::Rcl => Mode::RclTrim,
        }
    }
}

/// Reference clock source, `CR0.SRC`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum RefClock {
    /// External reference on the CTRIM_ETR pin.
    Etr = 0b000,
    Xth = 0b001,
    Xtl = 0b010,
    Rcl = 0b011,
    Rc48m = 0b100,
}

impl RefClock {
    fn from_bits(bits: u32) -> Option<Self> {
        Some(match bits {
            0b000 => RefClock::Etr,
            0b001 => RefClock::Xth,
            0b010 => RefClock::Xtl,
            0b011 => RefClock::Rcl,
            0b100 => RefClock::Rc48m,
            _ => return None,
        })
    }
}

/// Reference clock prescaler, `CR1.PRS`: divide by `2^n`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum RefPrescaler {
    Div1 = 0,
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
    Div256,
    Div512,
    Div1024,
    Div2048,
    Div4096,
    Div8192,
    Div16384,
    Div32768,
}

impl RefPrescaler {
    pub const fn divisor(self) -> u32 {
        1 << self as u32
    }
}

/// Initial trim step, `CR0.STEP`: the search starts moving the trim code
/// by `2^n` and halves the step on every sign change of the error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum TrimStep {
    Step1 = 0,
    Step2,
    Step4,
    Step8,
    Step16,
    Step32,
    Step64,
    Step128,
}

/// ETR input digital filter, `CR0.ETRFLT`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum EtrFilter {
    None = 0,
    PclkN2,
    PclkN4,
    PclkN8,
    PclkDiv4N6,
    PclkDiv4N8,
    PclkDiv16N6,
    PclkDiv16N8,
}

/// Counting direction reported in `ISR.UD`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Calibration mode configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CalibConfig {
    pub target: CalibTarget,
    pub ref_clock: RefClock,
    pub prescaler: RefPrescaler,
    /// Stop after one counting period instead of repeating.
    pub one_shot: bool,
    pub filter: EtrFilter,
    pub step: TrimStep,
    /// Reference edges per counting period.
    pub reload: u16,
    /// Accepted count error, `0..=0xFFF`.
    pub error_limit: u16,
}

impl Default for CalibConfig {
    fn default() -> Self {
        Self {
            target: CalibTarget::Rc48m,
            ref_clock: RefClock::Etr,
            prescaler: RefPrescaler::Div1,
            one_shot: false,
            filter: EtrFilter::None,
            step: TrimStep::Step16,
            reload: 0xFFFF,
            error_limit: 0x10,
        }
    }
}

/// Automatic trim mode configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TrimConfig {
    pub target: TrimTarget,
    pub ref_clock: RefClock,
    pub prescaler: RefPrescaler,
    pub one_shot: bool,
    pub filter: EtrFilter,
    pub step: TrimStep,
    /// Reference edges per counting period.
    pub reload: u16,
    /// Accepted count error, `0..=0xFFF`.
    pub error_limit: u16,
    /// Trim code the search starts from, `0..=0x1FF`. `None` keeps `TVAL`.
    pub initial_code: Option<u16>,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            target: TrimTarget::Rc48m,
            ref_clock: RefClock::Etr,
            prescaler: RefPrescaler::Div1,
            one_shot: false,
            filter: EtrFilter::None,
            step: TrimStep::Step16,
            reload: 0xFFFF,
            error_limit: 0x10,
            initial_code: None,
        }
    }
}

/// CTRIM driver.
pub struct Ctrim<B: RegisterBus> {
    bus: B,
    base: usize,
}

impl<B: RegisterBus> Ctrim<B> {
    pub const fn new(bus: B) -> Self {
        Self {
            bus,
            base: CTRIM_BASE,
        }
    }

    #[inline]
    fn addr(&self, offset: usize) -> usize {
        self.base + offset
    }

    /// Program calibration mode. `CR1.EN` is not touched.
    pub fn calib_init(&self, config: &CalibConfig) -> Result<(), ConfigError> {
        let error_limit = u32::from(config.error_limit);
        ConfigError::check("error_limit", FLIM_FLIM, error_limit)?;
        debug!("ctrim: calibration init {:?}", config);

        self.write_control(
            Mode::from(config.target),
            config.ref_clock,
            config.prescaler,
            config.one_shot,
            config.filter,
            config.step,
        );
        self.bus
            .write(self.addr(ARR), ARR_ARR.prep(u32::from(config.reload)));
        self.bus.write(self.addr(FLIM), FLIM_FLIM.prep(error_limit));
        Ok(())
    }

    /// Program automatic trim mode. `CR1.EN` is not touched.
    pub fn trim_init(&self, config: &TrimConfig) -> Result<(), ConfigError> {
        let error_limit = u32::from(config.error_limit);
        ConfigError::check("error_limit", FLIM_FLIM, error_limit)?;
        if let Some(code) = config.initial_code {
            ConfigError::check("trim_code", TVAL_TVAL, u32::from(code))?;
        }
        debug!("ctrim: trim init {:?}", config);

        self.write_control(
            Mode::from(config.target),
            config.ref_clock,
            config.prescaler,
            config.one_shot,
            config.filter,
            config.step,
        );
        self.bus
            .write(self.addr(ARR), ARR_ARR.prep(u32::from(config.reload)));
        self.bus.write(self.addr(FLIM), FLIM_FLIM.prep(error_limit));
        if let Some(code) = config.initial_code {
            self.bus.write(self.addr(TVAL), TVAL_TVAL.prep(u32::from(code)));
        }
        Ok(())
    }

    /// Masked update of `CR0` and `CR1`; `CR1.EN` is left as it is.
    fn write_control(
        &self,
        mode: Mode,
        ref_clock: RefClock,
        prescaler: RefPrescaler,
        one_shot: bool,
        filter: EtrFilter,
        step: TrimStep,
    ) {
        self.bus.modify(
            self.addr(CR0),
            CR0_STEP.mask() | CR0_ETRFLT.mask() | CR0_SRC.mask(),
            CR0_STEP.prep(step as u32)
                | CR0_ETRFLT.prep(filter as u32)
                | CR0_SRC.prep(ref_clock as u32),
        );
        self.bus.modify(
            self.addr(CR1),
            CR1_MD.mask() | CR1_OST.mask() | CR1_PRS.mask(),
            CR1_MD.prep(mode as u32)
                | CR1_OST.prep(u32::from(one_shot))
                | CR1_PRS.prep(prescaler as u32),
        );
    }

    pub fn enable(&self) {
        self.bus.set_bits(self.addr(CR1), CR1_EN.mask());
    }

    pub fn disable(&self) {
        self.bus.clear_bits(self.addr(CR1), CR1_EN.mask());
    }

    pub fn is_enabled(&self) -> bool {
        self.bus.read_field(self.addr(CR1), CR1_EN) != 0
    }

    pub fn mode(&self) -> Mode {
        Mode::from_bits(self.bus.read_field(self.addr(CR1), CR1_MD))
    }

    pub fn set_prescaler(&self, prescaler: RefPrescaler) {
        self.bus
            .write_field(self.addr(CR1), CR1_PRS, prescaler as u32);
    }

    pub fn set_step(&self, step: TrimStep) {
        self.bus.write_field(self.addr(CR0), CR0_STEP, step as u32);
    }

    /// Reference source currently selected; `None` for a reserved encoding.
    pub fn ref_clock(&self) -> Option<RefClock> {
        RefClock::from_bits(self.bus.read_field(self.addr(CR0), CR0_SRC))
    }

    pub fn int_enable(&self, interrupts: Interrupts) {
        self.bus.set_bits(self.addr(IER), interrupts.bits());
    }

    pub fn int_disable(&self, interrupts: Interrupts) {
        self.bus.clear_bits(self.addr(IER), interrupts.bits());
    }

    pub fn enabled_interrupts(&self) -> Interrupts {
        Interrupts::from_bits_truncate(self.bus.read(self.addr(IER)))
    }

    /// True if every bit of `flag` is set in `ISR`.
    pub fn flag_get(&self, flag: Status) -> bool {
        self.bus.bits_set(self.addr(ISR), flag.bits())
    }

    pub fn status(&self) -> Status {
        Status::from_bits_truncate(self.bus.read(self.addr(ISR)))
    }

    /// Clear `flags`. `ICR` is write-0-to-clear; ones leave a flag alone.
    pub fn flag_clear(&self, flags: Status) {
        self.bus.write(self.addr(ICR), !flags.bits());
    }

    /// Clear every flag at once.
    pub fn flag_clear_all(&self) {
        self.bus.write(self.addr(ICR), 0);
    }

    pub fn direction(&self) -> Direction {
        if self.flag_get(Status::UD) {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn set_reload(&self, reload: u16) {
        self.bus
            .write(self.addr(ARR), ARR_ARR.prep(u32::from(reload)));
    }

    pub fn reload(&self) -> u16 {
        self.bus.read_field(self.addr(ARR), ARR_ARR) as u16
    }

    pub fn counter(&self) -> u16 {
        self.bus.read_field(self.addr(CNT), CNT_CNT) as u16
    }

    pub fn set_error_limit(&self, limit: u16) -> Result<(), ConfigError> {
        let limit = u32::from(limit);
        ConfigError::check("error_limit", FLIM_FLIM, limit)?;
        self.bus.write(self.addr(FLIM), FLIM_FLIM.prep(limit));
        Ok(())
    }

    pub fn error_limit(&self) -> u16 {
        self.bus.read_field(self.addr(FLIM), FLIM_FLIM) as u16
    }

    /// Trim code the hardware converged to (or is currently trying).
    pub fn trim_code(&self) -> u16 {
        self.bus.read_field(self.addr(TVAL), TVAL_TVAL) as u16
    }

    /// Seed the trim search, `0..=0x1FF`.
    pub fn set_trim_code(&self, code: u16) -> Result<(), ConfigError> {
        let code = u32::from(code);
        ConfigError::check("trim_code", TVAL_TVAL, code)?;
        self.bus.write(self.addr(TVAL), TVAL_TVAL.prep(code));
        Ok(())
    }

    /// Oscillator count captured at the end of the last period.
    pub fn capture(&self) -> u16 {
        self.bus.read_field(self.addr(FCAP), FCAP_FCAP) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBus;

    fn reg(offset: usize) -> usize {
        CTRIM_BASE + offset
    }

    #[test]
    fn defaults_match_reset_recommendation() {
        let trim = TrimConfig::default();
        assert_eq!(trim.target, TrimTarget::Rc48m);
        assert_eq!(trim.ref_clock, RefClock::Etr);
        assert_eq!(trim.step, TrimStep::Step16);
        assert_eq!(trim.reload, 0xFFFF);
        assert_eq!(trim.error_limit, 0x10);

        let calib = CalibConfig::default();
        assert_eq!(Mode::from(calib.target), Mode::Rc48mCalib);
        assert_eq!(calib.ref_clock, RefClock::Etr);
        assert_eq!(calib.step, TrimStep::Step16);
        assert_eq!(calib.reload, 0xFFFF);
        assert_eq!(calib.error_limit, 0x10);
    }

    #[test]
    fn calib_init_default_programs_step_and_error_limit() {
        let bus = SimBus::new();
        bus.poke(reg(CR0), 0x0000_0007);
        bus.poke(reg(FLIM), 0x0000_0ABC);
        let ctrim = Ctrim::new(&bus);

        ctrim.calib_init(&CalibConfig::default()).unwrap();

        assert_eq!(bus.read_field(reg(CR0), CR0_STEP), TrimStep::Step16 as u32);
        assert_eq!(ctrim.error_limit(), 0x10);
        assert_eq!(ctrim.reload(), 0xFFFF);
        assert_eq!(ctrim.mode(), Mode::Rc48mCalib);
        assert_eq!(ctrim.ref_clock(), Some(RefClock::Etr));
    }

    #[test]
    fn calib_init_rejects_wide_error_limit() {
        let bus = SimBus::new();
        let ctrim = Ctrim::new(&bus);
        let config = CalibConfig {
            error_limit: 0x1000,
            ..CalibConfig::default()
        };
        assert_eq!(
            ctrim.calib_init(&config),
            Err(ConfigError::InvalidParameter {
                field: "error_limit",
                value: 0x1000,
            })
        );
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn calib_init_writes_fields_and_keeps_enable() {
        let bus = SimBus::new();
        bus.poke(reg(CR0), 0xFFFF_F807);
        bus.poke(reg(CR1), 0xFFFF_FF01);
        let ctrim = Ctrim::new(&bus);

        ctrim.calib_init(&CalibConfig {
            target: CalibTarget::Rcl,
            ref_clock: RefClock::Xtl,
            prescaler: RefPrescaler::Div256,
            one_shot: true,
            filter: EtrFilter::PclkN4,
            step: TrimStep::Step2,
            reload: 0x1234,
            error_limit: 0x0FF,
        })
        .unwrap();

        // STEP = 1, ETRFLT = 2, SRC = 2
        assert_eq!(bus.peek(reg(CR0)), 0xFFFF_FA21);
        // EN kept, MD = 3, OST = 1, PRS = 8
        assert_eq!(bus.peek(reg(CR1)), 0xFFFF_FF8F);
        assert_eq!(ctrim.reload(), 0x1234);
        assert_eq!(ctrim.error_limit(), 0x0FF);
        assert_eq!(ctrim.mode(), Mode::RclCalib);
        assert_eq!(ctrim.ref_clock(), Some(RefClock::Xtl));
        assert!(ctrim.is_enabled());
    }

    #[test]
    fn trim_init_round_trips() {
        let bus = SimBus::new();
        let ctrim = Ctrim::new(&bus);
        let config = TrimConfig {
            step: TrimStep::Step64,
            error_limit: 0xFFF,
            reload: 4_000,
            initial_code: Some(0x155),
            ..TrimConfig::default()
        };
        ctrim.trim_init(&config).unwrap();
        assert_eq!(ctrim.trim_code(), 0x155);

        assert_eq!(bus.read_field(reg(CR0), CR0_STEP), TrimStep::Step64 as u32);
        assert_eq!(ctrim.mode(), Mode::Rc48mTrim);
        assert_eq!(ctrim.error_limit(), 0xFFF);
        assert_eq!(ctrim.reload(), 4_000);
        assert!(!ctrim.is_enabled());
    }

    #[test]
    fn trim_init_rejects_wide_error_limit() {
        let bus = SimBus::new();
        let ctrim = Ctrim::new(&bus);
        let config = TrimConfig {
            error_limit: 0x1000,
            ..TrimConfig::default()
        };
        assert_eq!(
            ctrim.trim_init(&config),
            Err(ConfigError::InvalidParameter {
                field: "error_limit",
                value: 0x1000,
            })
        );
        assert!(bus.writes().is_empty());

        let config = TrimConfig {
            initial_code: Some(0x200),
            ..TrimConfig::default()
        };
        assert!(ctrim.trim_init(&config).is_err());
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn enable_disable_single_bit() {
        let bus = SimBus::new();
        bus.poke(reg(CR1), 0x0000_00F6);
        let ctrim = Ctrim::new(&bus);
        ctrim.enable();
        assert_eq!(bus.peek(reg(CR1)), 0x0000_00F7);
        ctrim.disable();
        assert_eq!(bus.peek(reg(CR1)), 0x0000_00F6);
    }

    #[test]
    fn flag_clear_only_touches_requested_bits() {
        let bus = SimBus::new();
        bus.poke(reg(ICR), 0xFFFF_FFFF);
        let ctrim = Ctrim::new(&bus);

        ctrim.flag_clear(Status::OK | Status::MISS);
        assert_eq!(bus.peek(reg(ICR)), !(Status::OK | Status::MISS).bits());

        ctrim.flag_clear_all();
        assert_eq!(bus.peek(reg(ICR)), 0);
    }

    #[test]
    fn flags_clear_through_icr() {
        let bus = SimBus::new();
        bus.write_zero_to_clear(reg(ICR), reg(ISR));
        bus.poke(reg(ICR), 0xFFFF_FFFF);
        bus.poke(reg(ISR), (Status::END | Status::OK | Status::UD).bits());
        let ctrim = Ctrim::new(&bus);

        assert!(ctrim.flag_get(Status::OK));
        assert!(ctrim.flag_get(Status::OK | Status::END));
        assert!(!ctrim.flag_get(Status::OK | Status::OV));
        assert_eq!(ctrim.direction(), Direction::Down);

        ctrim.flag_clear(Status::END);
        assert_eq!(ctrim.status(), Status::OK | Status::UD);
        ctrim.flag_clear_all();
        assert!(ctrim.status().is_empty());
        assert_eq!(ctrim.direction(), Direction::Up);
    }

    #[test]
    fn interrupt_enables_accumulate() {
        let bus = SimBus::new();
        let ctrim = Ctrim::new(&bus);
        ctrim.int_enable(Interrupts::OK | Interrupts::MISS);
        ctrim.int_enable(Interrupts::OV);
        ctrim.int_disable(Interrupts::MISS);
        assert_eq!(ctrim.enabled_interrupts(), Interrupts::OK | Interrupts::OV);
    }

    #[test]
    fn trim_code_and_limits_are_range_checked() {
        let bus = SimBus::new();
        let ctrim = Ctrim::new(&bus);
        ctrim.set_trim_code(0x1FF).unwrap();
        assert_eq!(ctrim.trim_code(), 0x1FF);
        assert!(ctrim.set_trim_code(0x200).is_err());
        assert_eq!(ctrim.trim_code(), 0x1FF);

        ctrim.set_error_limit(0x20).unwrap();
        assert_eq!(ctrim.error_limit(), 0x20);
        assert!(ctrim.set_error_limit(0x2000).is_err());
    }

    #[test]
    fn read_only_registers_are_masked() {
        let bus = SimBus::new();
        bus.poke(reg(CNT), 0xABCD_1234);
        bus.poke(reg(FCAP), 0x0001_BEEF);
        let ctrim = Ctrim::new(&bus);
        assert_eq!(ctrim.counter(), 0x1234);
        assert_eq!(ctrim.capture(), 0xBEEF);
    }

    #[test]
    fn prescaler_and_step_setters_preserve_neighbours() {
        let bus = SimBus::new();
        bus.poke(reg(CR1), 0x0000_000F);
        bus.poke(reg(CR0), 0x0000_0770);
        let ctrim = Ctrim::new(&bus);
        ctrim.set_prescaler(RefPrescaler::Div32768);
        ctrim.set_step(TrimStep::Step2);
        assert_eq!(bus.peek(reg(CR1)), 0x0000_00FF);
        assert_eq!(bus.peek(reg(CR0)), 0x0000_0771);
        assert_eq!(RefPrescaler::Div32768.divisor(), 32_768);
    }
}
