//! Driver library utilities: busy-wait delays, integer log2, buffer clear.
//!
//! The delays run SysTick as a free-running counter on the core clock and
//! spin until enough ticks have passed. They assume the core clock stored
//! by [`system_core_clock_update`](crate::platform::hc32l021::system::system_core_clock_update)
//! is current.

use crate::hal::timer::DownCounter;
use crate::hw::reg::RegisterBus;
use crate::peripheral::systick::SysTick;
use crate::platform::hc32l021::system::system_core_clock;

/// Busy-wait delays on any down counter clocked at `clock_hz`.
pub struct Delay<C: DownCounter> {
    counter: C,
    clock_hz: u32,
}

impl<C: DownCounter> Delay<C> {
    pub const fn new(counter: C, clock_hz: u32) -> Self {
        Self { counter, clock_hz }
    }

    fn wait(&self, count: u32, ticks_per_unit: u32) {
        self.counter
            .delay_ticks(u64::from(count) * u64::from(ticks_per_unit));
    }

    pub fn delay_1ms(&self, count: u32) {
        self.wait(count, self.clock_hz / 1_000);
    }

    pub fn delay_100us(&self, count: u32) {
        self.wait(count, self.clock_hz / 10_000);
    }

    pub fn delay_10us(&self, count: u32) {
        self.wait(count, self.clock_hz / 100_000);
    }

    pub fn release(self) -> C {
        self.counter
    }
}

impl<B: RegisterBus> Delay<SysTick<B>> {
    /// Restart SysTick free-running on the current core clock.
    pub fn systick(bus: B) -> Self {
        let systick = SysTick::new(bus);
        systick.start_free_running();
        Self::new(systick, system_core_clock())
    }
}

/// Busy-wait `count` milliseconds.
pub fn delay_1ms<B: RegisterBus>(bus: B, count: u32) {
    Delay::systick(bus).delay_1ms(count);
}

/// Busy-wait `count` times 100 µs.
pub fn delay_100us<B: RegisterBus>(bus: B, count: u32) {
    Delay::systick(bus).delay_100us(count);
}

/// Busy-wait `count` times 10 µs.
pub fn delay_10us<B: RegisterBus>(bus: B, count: u32) {
    Delay::systick(bus).delay_10us(count);
}

/// Floor of log2; `log2(0)` is 0.
pub const fn log2(value: u32) -> u32 {
    if value == 0 {
        0
    } else {
        31 - value.leading_zeros()
    }
}

/// Zero a buffer.
pub fn mem_clear(buf: &mut [u8]) {
    buf.fill(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::cortex_m::systick::{CVR, RVR, SYST_BASE};
    use crate::sim::SimBus;

    const CVR_ADDR: usize = SYST_BASE + CVR;

    /// SysTick with a 1000-tick period losing `step` ticks per sample.
    fn short_systick(step: u32) -> SimBus {
        let bus = SimBus::new();
        bus.down_counter(CVR_ADDR, SYST_BASE + RVR, step);
        SysTick::new(&bus).configure(999, false).unwrap();
        bus
    }

    #[test]
    fn millisecond_delay_spans_several_wraps() {
        let bus = short_systick(7);
        // 1 MHz: 1000 ticks per ms, one counter period
        let delay = Delay::new(SysTick::new(&bus), 1_000_000);
        delay.delay_1ms(3);

        // First sample, then the fewest 7-tick steps covering 3000 ticks
        let samples = bus.read_count(CVR_ADDR);
        assert_eq!(samples, 1 + 429);
        assert!((samples - 1) * 7 >= 3_000);
    }

    #[test]
    fn sub_millisecond_delays_scale() {
        let bus = short_systick(10);
        let delay = Delay::new(SysTick::new(&bus), 4_000_000);

        // 100 µs at 4 MHz is 400 ticks
        delay.delay_100us(2);
        assert_eq!(bus.read_count(CVR_ADDR), 1 + 80);

        // 10 µs at 4 MHz is 40 ticks
        delay.delay_10us(1);
        assert_eq!(bus.read_count(CVR_ADDR), 81 + 1 + 4);
    }

    #[test]
    fn zero_delay_returns_after_one_sample() {
        let bus = short_systick(1);
        Delay::new(SysTick::new(&bus), 48_000_000).delay_1ms(0);
        assert_eq!(bus.read_count(CVR_ADDR), 1);
    }

    #[test]
    fn log2_floors() {
        assert_eq!(log2(0), 0);
        assert_eq!(log2(1), 0);
        assert_eq!(log2(2), 1);
        assert_eq!(log2(255), 7);
        assert_eq!(log2(256), 8);
        assert_eq!(log2(u32::MAX), 31);
    }

    #[test]
    fn mem_clear_zeroes_everything() {
        let mut buf = [0xA5u8; 17];
        mem_clear(&mut buf);
        assert!(buf.iter().all(|&b| b == 0));
        mem_clear(&mut []);
    }
}
