//! HC32L021 General Timer (GTIM) Driver
//!
//! A 16-bit up counter with reload, a prescaler, trigger/gate inputs and
//! four channels that either compare against the counter (output modes,
//! PWM) or capture it on an input edge.

use log::debug;

use crate::hal::timer::Timer;
use crate::hw::hc32l021::gtim::*;
use crate::hw::reg::RegisterBus;

pub use crate::hw::hc32l021::gtim::Events;

/// Timer instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instance {
    Gtim0,
    Gtim1,
}

impl Instance {
    pub const fn base(self) -> usize {
        match self {
            Instance::Gtim0 => GTIM0_BASE,
            Instance::Gtim1 => GTIM1_BASE,
        }
    }
}

/// Compare/capture channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Channel {
    Ch0 = 0,
    Ch1 = 1,
    Ch2 = 2,
    Ch3 = 3,
}

impl Channel {
    pub const ALL: [Channel; CHANNELS] = [Channel::Ch0, Channel::Ch1, Channel::Ch2, Channel::Ch3];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Compare/capture event bit of this channel.
    pub const fn event(self) -> Events {
        Events::cc(self as usize)
    }
}

/// Counter clock and start condition, `CR0.MD`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum Mode {
    /// Count prescaled PCLK.
    Timer = 0b00,
    /// Count edges of the trigger input.
    Counter = 0b01,
    /// Count PCLK once the trigger input fires.
    TrigStart = 0b10,
    /// Count PCLK while the trigger input is active.
    Gate = 0b11,
}

/// Counter prescaler, `CR0.PRS`: divide by `2^n`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum Prescaler {
    Div1 = 0,
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
}

impl Prescaler {
    fn from_bits(bits: u32) -> Self {
        match bits & 0b111 {
            0 => Prescaler::Div1,
            1 => Prescaler::Div2,
            2 => Prescaler::Div4,
            3 => Prescaler::Div8,
            4 => Prescaler::Div16,
            5 => Prescaler::Div32,
            6 => Prescaler::Div64,
            _ => Prescaler::Div128,
        }
    }

    pub const fn divisor(self) -> u32 {
        1 << self as u32
    }
}

/// Trigger input source, `CR0.TRS`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum TriggerSource {
    Etr = 0,
    Ch0 = 1,
    Ch1 = 2,
    Ch2 = 3,
    Ch3 = 4,
    Itr0 = 5,
    Itr1 = 6,
    Itr2 = 7,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TriggerPolarity {
    /// Rising edge / active high.
    Rising,
    /// Falling edge / active low.
    Falling,
}

/// Output behaviour of a compare channel, `CMMR.CCnM`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum CompareMode {
    ForceLow = 0,
    ForceHigh = 1,
    MatchLow = 2,
    MatchHigh = 3,
    MatchToggle = 4,
    MatchPulse = 5,
    /// High while `CNT < CCRn`.
    Pwm1 = 6,
    /// Low while `CNT < CCRn`.
    Pwm2 = 7,
}

impl CompareMode {
    fn from_bits(bits: u32) -> Self {
        match bits & 0b111 {
            0 => CompareMode::ForceLow,
            1 => CompareMode::ForceHigh,
            2 => CompareMode::MatchLow,
            3 => CompareMode::MatchHigh,
            4 => CompareMode::MatchToggle,
            5 => CompareMode::MatchPulse,
            6 => CompareMode::Pwm1,
            _ => CompareMode::Pwm2,
        }
    }
}

/// Input edge captured by a capture channel, `CR1.CCnE`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum CaptureEdge {
    None = 0b00,
    Rising = 0b01,
    Falling = 0b10,
    Both = 0b11,
}

impl CaptureEdge {
    fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0b00 => CaptureEdge::None,
            0b01 => CaptureEdge::Rising,
            0b10 => CaptureEdge::Falling,
            _ => CaptureEdge::Both,
        }
    }
}

/// Channel function, `CR1.CSn`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelFunction {
    Compare,
    Capture,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GtimConfig {
    pub mode: Mode,
    pub prescaler: Prescaler,
    pub one_shot: bool,
    /// Drive the toggle output on every counter reload.
    pub toggle_output: bool,
    pub trigger: TriggerSource,
    pub trigger_polarity: TriggerPolarity,
    pub reload: u16,
}

impl Default for GtimConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Timer,
            prescaler: Prescaler::Div1,
            one_shot: false,
            toggle_output: false,
            trigger: TriggerSource::Etr,
            trigger_polarity: TriggerPolarity::Rising,
            reload: 0xFFFF,
        }
    }
}

/// GTIM driver.
pub struct Gtim<B: RegisterBus> {
    bus: B,
    base: usize,
}

impl<B: RegisterBus> Gtim<B> {
    pub const fn new(bus: B, instance: Instance) -> Self {
        Self {
            bus,
            base: instance.base(),
        }
    }

    #[inline]
    fn addr(&self, offset: usize) -> usize {
        self.base + offset
    }

    /// Program mode, prescaler and reload. The counter is left stopped.
    pub fn init(&self, config: &GtimConfig) {
        debug!("gtim@{:#010x}: init {:?}", self.base, config);

        let polarity = match config.trigger_polarity {
            TriggerPolarity::Rising => 0,
            TriggerPolarity::Falling => 1,
        };
        let mask = CR0_CEN.mask()
            | CR0_MD.mask()
            | CR0_OST.mask()
            | CR0_PRS.mask()
            | CR0_TOGEN.mask()
            | CR0_TRP.mask()
            | CR0_TRS.mask();
        let value = CR0_MD.prep(config.mode as u32)
            | CR0_OST.prep(u32::from(config.one_shot))
            | CR0_PRS.prep(config.prescaler as u32)
            | CR0_TOGEN.prep(u32::from(config.toggle_output))
            | CR0_TRP.prep(polarity)
            | CR0_TRS.prep(config.trigger as u32);
        self.bus.modify(self.addr(CR0), mask, value);
        self.set_reload(config.reload);
    }

    pub fn enable(&self) {
        self.bus.set_bits(self.addr(CR0), CR0_CEN.mask());
    }

    pub fn disable(&self) {
        self.bus.clear_bits(self.addr(CR0), CR0_CEN.mask());
    }

    pub fn is_enabled(&self) -> bool {
        self.bus.read_field(self.addr(CR0), CR0_CEN) != 0
    }

    pub fn set_mode(&self, mode: Mode) {
        self.bus.write_field(self.addr(CR0), CR0_MD, mode as u32);
    }

    pub fn set_prescaler(&self, prescaler: Prescaler) {
        self.bus
            .write_field(self.addr(CR0), CR0_PRS, prescaler as u32);
    }

    pub fn prescaler(&self) -> Prescaler {
        Prescaler::from_bits(self.bus.read_field(self.addr(CR0), CR0_PRS))
    }

    pub fn set_trigger(&self, source: TriggerSource, polarity: TriggerPolarity) {
        let polarity = match polarity {
            TriggerPolarity::Rising => 0,
            TriggerPolarity::Falling => 1,
        };
        self.bus.modify(
            self.addr(CR0),
            CR0_TRS.mask() | CR0_TRP.mask(),
            CR0_TRS.prep(source as u32) | CR0_TRP.prep(polarity),
        );
    }

    pub fn toggle_output_enable(&self) {
        self.bus.set_bits(self.addr(CR0), CR0_TOGEN.mask());
    }

    pub fn toggle_output_disable(&self) {
        self.bus.clear_bits(self.addr(CR0), CR0_TOGEN.mask());
    }

    pub fn one_shot_enable(&self) {
        self.bus.set_bits(self.addr(CR0), CR0_OST.mask());
    }

    pub fn one_shot_disable(&self) {
        self.bus.clear_bits(self.addr(CR0), CR0_OST.mask());
    }

    pub fn set_counter(&self, value: u16) {
        self.bus
            .write(self.addr(CNT), CNT_CNT.prep(u32::from(value)));
    }

    pub fn counter(&self) -> u16 {
        self.bus.read_field(self.addr(CNT), CNT_CNT) as u16
    }

    pub fn set_reload(&self, value: u16) {
        self.bus
            .write(self.addr(ARR), ARR_ARR.prep(u32::from(value)));
    }

    pub fn reload(&self) -> u16 {
        self.bus.read_field(self.addr(ARR), ARR_ARR) as u16
    }

    pub fn compare_capture_reg_set(&self, channel: Channel, value: u16) {
        self.bus.write(
            self.addr(ccr(channel.index())),
            CCR_CCR.prep(u32::from(value)),
        );
    }

    pub fn compare_capture_reg_get(&self, channel: Channel) -> u16 {
        self.bus
            .read_field(self.addr(ccr(channel.index())), CCR_CCR) as u16
    }

    pub fn set_compare_mode(&self, channel: Channel, mode: CompareMode) {
        self.bus
            .write_field(self.addr(CMMR), cmmr_ccm(channel.index()), mode as u32);
    }

    pub fn compare_mode(&self, channel: Channel) -> CompareMode {
        CompareMode::from_bits(
            self.bus
                .read_field(self.addr(CMMR), cmmr_ccm(channel.index())),
        )
    }

    pub fn set_channel_function(&self, channel: Channel, function: ChannelFunction) {
        let capture = match function {
            ChannelFunction::Compare => 0,
            ChannelFunction::Capture => 1,
        };
        self.bus
            .write_field(self.addr(CR1), cr1_ccs(channel.index()), capture);
    }

    pub fn channel_function(&self, channel: Channel) -> ChannelFunction {
        match self.bus.read_field(self.addr(CR1), cr1_ccs(channel.index())) {
            0 => ChannelFunction::Compare,
            _ => ChannelFunction::Capture,
        }
    }

    pub fn set_capture_edge(&self, channel: Channel, edge: CaptureEdge) {
        self.bus
            .write_field(self.addr(CR1), cr1_cce(channel.index()), edge as u32);
    }

    pub fn capture_edge(&self, channel: Channel) -> CaptureEdge {
        CaptureEdge::from_bits(
            self.bus
                .read_field(self.addr(CR1), cr1_cce(channel.index())),
        )
    }

    pub fn int_enable(&self, events: Events) {
        self.bus.set_bits(self.addr(IER), events.bits());
    }

    pub fn int_disable(&self, events: Events) {
        self.bus.clear_bits(self.addr(IER), events.bits());
    }

    pub fn enabled_interrupts(&self) -> Events {
        Events::from_bits_truncate(self.bus.read(self.addr(IER)))
    }

    /// True if every bit of `flag` is set in `IFR`.
    pub fn flag_get(&self, flag: Events) -> bool {
        self.bus.bits_set(self.addr(IFR), flag.bits())
    }

    pub fn flags(&self) -> Events {
        Events::from_bits_truncate(self.bus.read(self.addr(IFR)))
    }

    /// Clear `flags`. `ICR` is write-0-to-clear; ones leave a flag alone.
    pub fn flag_clear(&self, flags: Events) {
        self.bus.write(self.addr(ICR), !flags.bits());
    }

    pub fn flag_clear_all(&self) {
        self.bus.write(self.addr(ICR), 0);
    }
}

// ============================================================================
// HAL Implementation
// ============================================================================

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Match distance must fit the 16-bit counter and be non-zero.
    IntervalOutOfRange(u32),
}

/// Compare channels against the free-running counter: `start` programs
/// `CCRn = CNT + ticks` and starts the counter, the match raises `CCn`.
impl<B: RegisterBus> Timer for Gtim<B> {
    type Handle = Channel;
    type Error = TimerError;

    fn start(&mut self, handle: Self::Handle, ticks: u32) -> Result<(), Self::Error> {
        if ticks == 0 || ticks > u32::from(u16::MAX) {
            return Err(TimerError::IntervalOutOfRange(ticks));
        }
        self.set_channel_function(handle, ChannelFunction::Compare);
        self.flag_clear(handle.event());
        let target = self.counter().wrapping_add(ticks as u16);
        self.compare_capture_reg_set(handle, target);
        self.int_enable(handle.event());
        self.enable();
        Ok(())
    }

    fn stop(&mut self, handle: Self::Handle) -> Result<(), Self::Error> {
        self.int_disable(handle.event());
        self.flag_clear(handle.event());
        Ok(())
    }

    fn clear_interrupt(&mut self, handle: Self::Handle) -> Result<(), Self::Error> {
        self.flag_clear(handle.event());
        Ok(())
    }

    fn is_pending(&self, handle: Self::Handle) -> Result<bool, Self::Error> {
        Ok(self.flag_get(handle.event()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBus;

    const BASE: usize = GTIM0_BASE;

    #[test]
    fn compare_capture_registers_are_independent() {
        let bus = SimBus::new();
        let gtim = Gtim::new(&bus, Instance::Gtim0);
        let values = [0x1111, 0xA5A5, 0x0F0F, 0xFFFF];

        for (channel, value) in Channel::ALL.iter().zip(values) {
            gtim.compare_capture_reg_set(*channel, value);
        }
        for (channel, value) in Channel::ALL.iter().zip(values) {
            assert_eq!(gtim.compare_capture_reg_get(*channel), value);
        }

        gtim.compare_capture_reg_set(Channel::Ch2, 7);
        assert_eq!(gtim.compare_capture_reg_get(Channel::Ch1), 0xA5A5);
        assert_eq!(gtim.compare_capture_reg_get(Channel::Ch2), 7);
        assert_eq!(gtim.compare_capture_reg_get(Channel::Ch3), 0xFFFF);
    }

    #[test]
    fn instances_use_separate_blocks() {
        let bus = SimBus::new();
        let gtim0 = Gtim::new(&bus, Instance::Gtim0);
        let gtim1 = Gtim::new(&bus, Instance::Gtim1);
        gtim0.set_reload(100);
        gtim1.set_reload(200);
        assert_eq!(gtim0.reload(), 100);
        assert_eq!(gtim1.reload(), 200);
        assert_eq!(bus.peek(GTIM1_BASE + ARR), 200);
    }

    #[test]
    fn init_keeps_counter_stopped_and_unrelated_bits() {
        let bus = SimBus::new();
        bus.poke(BASE + CR0, 0xFFFF_F001);
        let gtim = Gtim::new(&bus, Instance::Gtim0);
        gtim.init(&GtimConfig {
            mode: Mode::Gate,
            prescaler: Prescaler::Div64,
            one_shot: true,
            toggle_output: false,
            trigger: TriggerSource::Ch2,
            trigger_polarity: TriggerPolarity::Falling,
            reload: 999,
        });

        let cr0 = bus.peek(BASE + CR0);
        assert_eq!(cr0 & 0xFFFF_F000, 0xFFFF_F000);
        assert_eq!(CR0_CEN.get(cr0), 0);
        assert_eq!(CR0_MD.get(cr0), 0b11);
        assert_eq!(CR0_OST.get(cr0), 1);
        assert_eq!(CR0_TOGEN.get(cr0), 0);
        assert_eq!(CR0_TRP.get(cr0), 1);
        assert_eq!(CR0_TRS.get(cr0), 3);
        assert_eq!(gtim.prescaler(), Prescaler::Div64);
        assert_eq!(gtim.reload(), 999);
    }

    #[test]
    fn channel_settings_do_not_leak() {
        let bus = SimBus::new();
        let gtim = Gtim::new(&bus, Instance::Gtim1);
        gtim.set_compare_mode(Channel::Ch0, CompareMode::Pwm1);
        gtim.set_compare_mode(Channel::Ch3, CompareMode::MatchToggle);
        gtim.set_capture_edge(Channel::Ch1, CaptureEdge::Falling);
        gtim.set_capture_edge(Channel::Ch2, CaptureEdge::Both);
        gtim.set_channel_function(Channel::Ch1, ChannelFunction::Capture);

        assert_eq!(gtim.compare_mode(Channel::Ch0), CompareMode::Pwm1);
        assert_eq!(gtim.compare_mode(Channel::Ch1), CompareMode::ForceLow);
        assert_eq!(gtim.compare_mode(Channel::Ch3), CompareMode::MatchToggle);
        assert_eq!(gtim.capture_edge(Channel::Ch0), CaptureEdge::None);
        assert_eq!(gtim.capture_edge(Channel::Ch1), CaptureEdge::Falling);
        assert_eq!(gtim.capture_edge(Channel::Ch2), CaptureEdge::Both);
        assert_eq!(gtim.channel_function(Channel::Ch1), ChannelFunction::Capture);
        assert_eq!(gtim.channel_function(Channel::Ch2), ChannelFunction::Compare);
        assert_eq!(bus.peek(GTIM1_BASE + CMMR), 0x4006);
        assert_eq!(bus.peek(GTIM1_BASE + CR1), 0x0000_0238);
    }

    #[test]
    fn setters_round_trip() {
        let bus = SimBus::new();
        let gtim = Gtim::new(&bus, Instance::Gtim0);
        gtim.set_counter(0xBEEF);
        assert_eq!(gtim.counter(), 0xBEEF);

        gtim.set_trigger(TriggerSource::Itr1, TriggerPolarity::Rising);
        assert_eq!(bus.read_field(BASE + CR0, CR0_TRS), 6);
        gtim.set_mode(Mode::Counter);
        assert_eq!(bus.read_field(BASE + CR0, CR0_MD), 1);

        gtim.toggle_output_enable();
        gtim.one_shot_enable();
        gtim.enable();
        assert!(gtim.is_enabled());
        gtim.toggle_output_disable();
        gtim.one_shot_disable();
        gtim.disable();
        assert_eq!(bus.peek(BASE + CR0), CR0_TRS.prep(6) | CR0_MD.prep(1));
    }

    #[test]
    fn flags_and_interrupts() {
        let bus = SimBus::new();
        bus.write_zero_to_clear(BASE + ICR, BASE + IFR);
        bus.poke(BASE + ICR, 0xFFFF_FFFF);
        bus.poke(BASE + IFR, (Events::UI | Events::CC1 | Events::CC3).bits());
        let gtim = Gtim::new(&bus, Instance::Gtim0);

        assert!(gtim.flag_get(Events::UI));
        assert!(gtim.flag_get(Channel::Ch3.event()));
        assert!(!gtim.flag_get(Channel::Ch0.event()));

        gtim.flag_clear(Events::CC1);
        assert_eq!(gtim.flags(), Events::UI | Events::CC3);
        gtim.flag_clear_all();
        assert!(gtim.flags().is_empty());

        gtim.int_enable(Events::UI | Events::CC0);
        gtim.int_disable(Events::UI);
        assert_eq!(gtim.enabled_interrupts(), Events::CC0);
    }

    #[test]
    fn hal_timer_arms_compare_channel() {
        let bus = SimBus::new();
        bus.poke(BASE + CNT, 0xFFF0);
        bus.poke(BASE + ICR, 0xFFFF_FFFF);
        let mut gtim = Gtim::new(&bus, Instance::Gtim0);

        gtim.start(Channel::Ch2, 0x20).unwrap();
        assert_eq!(gtim.compare_capture_reg_get(Channel::Ch2), 0x0010);
        assert_eq!(gtim.enabled_interrupts(), Events::CC2);
        assert!(gtim.is_enabled());
        assert!(!gtim.is_pending(Channel::Ch2).unwrap());

        bus.poke(BASE + IFR, Events::CC2.bits());
        assert!(gtim.is_pending(Channel::Ch2).unwrap());

        gtim.stop(Channel::Ch2).unwrap();
        assert!(gtim.enabled_interrupts().is_empty());
        assert_eq!(
            gtim.start(Channel::Ch0, 0x1_0000),
            Err(TimerError::IntervalOutOfRange(0x1_0000))
        );
    }
}
