//! HC32L021 Low Voltage Detector (LVD) Driver
//!
//! Compares a supply or pin voltage against one of sixteen thresholds and
//! either raises the LVD interrupt or resets the chip.

use log::debug;

use crate::hw::hc32l021::lvd::*;
use crate::hw::reg::RegisterBus;

/// Monitored voltage, `CR.SRC`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum Source {
    Avcc = 0,
    Pa04 = 1,
    Pb05 = 2,
    Pb07 = 3,
}

/// Detection threshold, `CR.VTDS`, 1.8 V to 3.3 V in 0.1 V steps.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum Threshold {
    V1_8 = 0,
    V1_9,
    V2_0,
    V2_1,
    V2_2,
    V2_3,
    V2_4,
    V2_5,
    V2_6,
    V2_7,
    V2_8,
    V2_9,
    V3_0,
    V3_1,
    V3_2,
    V3_3,
}

impl Threshold {
    const ALL: [Threshold; 16] = [
        Threshold::V1_8,
        Threshold::V1_9,
        Threshold::V2_0,
        Threshold::V2_1,
        Threshold::V2_2,
        Threshold::V2_3,
        Threshold::V2_4,
        Threshold::V2_5,
        Threshold::V2_6,
        Threshold::V2_7,
        Threshold::V2_8,
        Threshold::V2_9,
        Threshold::V3_0,
        Threshold::V3_1,
        Threshold::V3_2,
        Threshold::V3_3,
    ];

    fn from_bits(bits: u32) -> Self {
        Self::ALL[(bits & 0xF) as usize]
    }

    /// Threshold in millivolts.
    pub const fn millivolts(self) -> u32 {
        1_800 + 100 * self as u32
    }
}

/// Digital filter length, `CR.FLTTIME`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum FilterTime {
    Us7 = 0,
    Us14,
    Us28,
    Us112,
    Us450,
    Us1800,
    Us7200,
    Us28800,
}

/// What a detection does, `CR.ACT`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Interrupt,
    Reset,
}

bitflags::bitflags! {
    /// Detection conditions, `CR.FTEN`/`RTEN`/`HTEN`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Trigger: u32 {
        /// Voltage falls below the threshold.
        const FALLING = 1 << 0;
        /// Voltage rises above the threshold.
        const RISING = 1 << 1;
        /// Voltage is below the threshold.
        const LEVEL = 1 << 2;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LvdConfig {
    pub source: Source,
    pub threshold: Threshold,
    /// `None` disables the filter.
    pub filter: Option<FilterTime>,
    pub action: Action,
    pub trigger: Trigger,
}

impl Default for LvdConfig {
    fn default() -> Self {
        Self {
            source: Source::Avcc,
            threshold: Threshold::V2_5,
            filter: Some(FilterTime::Us28800),
            action: Action::Interrupt,
            trigger: Trigger::FALLING,
        }
    }
}

/// LVD driver.
pub struct Lvd<B: RegisterBus> {
    bus: B,
    base: usize,
}

impl<B: RegisterBus> Lvd<B> {
    pub const fn new(bus: B) -> Self {
        Self {
            bus,
            base: LVD_BASE,
        }
    }

    #[inline]
    fn addr(&self, offset: usize) -> usize {
        self.base + offset
    }

    /// Program source, threshold, filter, action and trigger conditions.
    /// Enable and interrupt enable are left unchanged.
    pub fn init(&self, config: &LvdConfig) {
        debug!("lvd: init {:?}", config);

        let (filter_enable, filter_time) = match config.filter {
            Some(time) => (1, time as u32),
            None => (0, 0),
        };
        let action = match config.action {
            Action::Interrupt => 0,
            Action::Reset => 1,
        };
        let mask = CR_SRC.mask()
            | CR_VTDS.mask()
            | CR_FLTEN.mask()
            | CR_FLTTIME.mask()
            | CR_ACT.mask()
            | CR_TRIGGER.mask();
        let value = CR_SRC.prep(config.source as u32)
            | CR_VTDS.prep(config.threshold as u32)
            | CR_FLTEN.prep(filter_enable)
            | CR_FLTTIME.prep(filter_time)
            | CR_ACT.prep(action)
            | CR_TRIGGER.prep(config.trigger.bits());
        self.bus.modify(self.addr(CR), mask, value);
    }

    pub fn enable(&self) {
        self.bus.set_bits(self.addr(CR), CR_EN.mask());
    }

    pub fn disable(&self) {
        self.bus.clear_bits(self.addr(CR), CR_EN.mask());
    }

    pub fn is_enabled(&self) -> bool {
        self.bus.read_field(self.addr(CR), CR_EN) != 0
    }

    pub fn int_enable(&self) {
        self.bus.set_bits(self.addr(CR), CR_IE.mask());
    }

    pub fn int_disable(&self) {
        self.bus.clear_bits(self.addr(CR), CR_IE.mask());
    }

    pub fn set_threshold(&self, threshold: Threshold) {
        self.bus
            .write_field(self.addr(CR), CR_VTDS, threshold as u32);
    }

    pub fn threshold(&self) -> Threshold {
        Threshold::from_bits(self.bus.read_field(self.addr(CR), CR_VTDS))
    }

    pub fn trigger(&self) -> Trigger {
        Trigger::from_bits_truncate(self.bus.read_field(self.addr(CR), CR_TRIGGER))
    }

    /// Interrupt flag.
    pub fn flag_get(&self) -> bool {
        self.bus.read_field(self.addr(IFR), IFR_INTF) != 0
    }

    /// Clear the interrupt flag (write 0 to `INTF`).
    pub fn flag_clear(&self) {
        self.bus.clear_bits(self.addr(IFR), IFR_INTF.mask());
    }

    /// Filtered comparator output: true while the monitored voltage is
    /// below the threshold.
    pub fn status(&self) -> bool {
        self.bus.read_field(self.addr(IFR), IFR_FILTER) != 0
    }
}
