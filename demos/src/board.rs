//! Board wiring shared by the demos and the error type they return.

use hc32l021_ddl::RegisterBus;
use hc32l021_ddl::hal::gpio::{Direction, GpioController};
use hc32l021_ddl::peripheral::nvic::NvicError;
use hc32l021_ddl::platform::hc32l021::ConfigError;
use hc32l021_ddl::platform::hc32l021::ctrim::Status;
use hc32l021_ddl::platform::hc32l021::gpio::{Gpio, GpioError, Pin, Port};
use hc32l021_ddl::platform::hc32l021::sysctrl::ClockError;
use hc32l021_ddl::platform::hc32l021::trng::TrngError;
use log::warn;

/// User LED, active high.
pub const LED: Pin = Pin::new(Port::A, 3);

/// Upper bound on status polls while waiting for a peripheral event.
pub const POLL_LIMIT: u32 = 0x1_0000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DemoError {
    Config(ConfigError),
    Clock(ClockError),
    Gpio(GpioError),
    Nvic(NvicError),
    Trng(TrngError),
    /// The named event never showed up within [`POLL_LIMIT`] polls.
    Timeout(&'static str),
    /// CTRIM stopped with `MISS` or `OV` instead of `OK`.
    TrimFailed(Status),
}

impl From<ConfigError> for DemoError {
    fn from(err: ConfigError) -> Self {
        DemoError::Config(err)
    }
}

impl From<ClockError> for DemoError {
    fn from(err: ClockError) -> Self {
        DemoError::Clock(err)
    }
}

impl From<GpioError> for DemoError {
    fn from(err: GpioError) -> Self {
        DemoError::Gpio(err)
    }
}

impl From<NvicError> for DemoError {
    fn from(err: NvicError) -> Self {
        DemoError::Nvic(err)
    }
}

impl From<TrngError> for DemoError {
    fn from(err: TrngError) -> Self {
        DemoError::Trng(err)
    }
}

/// Call `ready` up to `limit` times; true as soon as it returns true.
pub fn poll_until(limit: u32, mut ready: impl FnMut() -> bool) -> bool {
    (0..limit).any(|_| ready())
}

/// Log `demo`'s error, if any, and pass a successful value through.
pub fn report<T>(demo: &'static str, result: Result<T, DemoError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{}: {:?}", demo, err);
            None
        }
    }
}

pub fn led_init<B: RegisterBus>(bus: B) -> Result<(), GpioError> {
    let mut gpio = Gpio::new(bus);
    gpio.set_low(LED)?;
    gpio.set_direction(LED, Direction::Output)
}

pub fn led_toggle<B: RegisterBus>(bus: B) -> Result<(), GpioError> {
    Gpio::new(bus).toggle(LED)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use hc32l021_ddl::hw::hc32l021::gpio::{BCLR, BSET, DIR, GPIO_BASE, OUT};
    use hc32l021_ddl::sim::SimBus;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::sync::Mutex;

    /// Collects warnings so tests can check what a failure reported.
    struct WarnLog(Mutex<Vec<String>>);

    impl Log for WarnLog {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Warn
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                if let Ok(mut lines) = self.0.lock() {
                    lines.push(record.args().to_string());
                }
            }
        }

        fn flush(&self) {}
    }

    static WARNINGS: WarnLog = WarnLog(Mutex::new(Vec::new()));

    fn warnings_about(demo: &str) -> Vec<String> {
        // Another test may have installed the logger already
        let _ = log::set_logger(&WARNINGS);
        log::set_max_level(LevelFilter::Warn);
        WARNINGS
            .0
            .lock()
            .map(|lines| {
                lines
                    .iter()
                    .filter(|line| line.starts_with(demo))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Simulated chip with GPIO set/clear strobes wired to `OUT`.
    pub(crate) fn board_bus() -> SimBus {
        let bus = SimBus::new();
        bus.write_one_to_set(GPIO_BASE + BSET, GPIO_BASE + OUT);
        bus.write_one_to_clear(GPIO_BASE + BCLR, GPIO_BASE + OUT);
        bus
    }

    pub(crate) fn led_is_on(bus: &SimBus) -> bool {
        bus.peek(GPIO_BASE + OUT) & (1 << 3) != 0
    }

    #[test]
    fn led_starts_off_and_toggles() {
        let bus = board_bus();
        bus.poke(GPIO_BASE + DIR, 0xFFFF);
        bus.poke(GPIO_BASE + OUT, 1 << 3);

        led_init(&bus).unwrap();
        assert!(!led_is_on(&bus));
        assert_eq!(bus.peek(GPIO_BASE + DIR), 0xFFF7);

        led_toggle(&bus).unwrap();
        assert!(led_is_on(&bus));
        led_toggle(&bus).unwrap();
        assert!(!led_is_on(&bus));
    }

    #[test]
    fn report_logs_failures_and_passes_values_through() {
        warnings_about("");
        assert_eq!(report("report_ok", Ok::<u32, DemoError>(7)), Some(7));
        assert!(warnings_about("report_ok").is_empty());

        let failed = report::<u16>("report_err", Err(DemoError::Timeout("ctrim end")));
        assert_eq!(failed, None);
        assert_eq!(
            warnings_about("report_err"),
            ["report_err: Timeout(\"ctrim end\")"]
        );
    }

    #[test]
    fn poll_gives_up_after_limit() {
        let mut calls = 0;
        assert!(!poll_until(5, || {
            calls += 1;
            false
        }));
        assert_eq!(calls, 5);

        let mut calls = 0;
        assert!(poll_until(5, || {
            calls += 1;
            calls == 2
        }));
        assert_eq!(calls, 2);
    }
}
