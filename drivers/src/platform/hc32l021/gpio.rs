//! HC32L021 GPIO Driver
//!
//! Implements [`GpioController`] over the port registers. Output changes go
//! through the `BSET`/`BCLR` strobes so no read-modify-write of `OUT` is
//! needed.

use crate::hal::gpio::{Direction, GpioController, PinLevel, PullMode};
use crate::hw::hc32l021::gpio::*;
use crate::hw::reg::RegisterBus;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Port {
    A = 0,
    B = 1,
}

/// A single pin, e.g. `Pin::new(Port::A, 3)` for PA03.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pin {
    pub port: Port,
    pub number: u8,
}

impl Pin {
    pub const fn new(port: Port, number: u8) -> Self {
        Self { port, number }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// Pin number beyond the 16 pins of a port.
    InvalidPin(Pin),
}

/// GPIO driver for all ports.
pub struct Gpio<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> Gpio<B> {
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Register address and bit mask of `pin`.
    fn locate(pin: Pin, offset: usize) -> Result<(usize, u32), GpioError> {
        if pin.number >= PINS_PER_PORT {
            return Err(GpioError::InvalidPin(pin));
        }
        let addr = GPIO_BASE + PORT_STRIDE * pin.port as usize + offset;
        Ok((addr, self::pin(pin.number).mask()))
    }

    fn set_bit(&self, pin: Pin, offset: usize, on: bool) -> Result<(), GpioError> {
        let (addr, mask) = Self::locate(pin, offset)?;
        if on {
            self.bus.set_bits(addr, mask);
        } else {
            self.bus.clear_bits(addr, mask);
        }
        Ok(())
    }

    fn bit(&self, pin: Pin, offset: usize) -> Result<bool, GpioError> {
        let (addr, mask) = Self::locate(pin, offset)?;
        Ok(self.bus.read(addr) & mask != 0)
    }

    /// Open-drain output instead of push-pull.
    pub fn set_open_drain(&mut self, pin: Pin, open_drain: bool) -> Result<(), GpioError> {
        self.set_bit(pin, OD, open_drain)
    }
}

impl<B: RegisterBus> GpioController for Gpio<B> {
    type Pin = Pin;
    type Error = GpioError;

    fn set_direction(&mut self, pin: Pin, direction: Direction) -> Result<(), GpioError> {
        self.set_bit(pin, DIR, direction == Direction::Input)
    }

    fn set_pull(&mut self, pin: Pin, pull: PullMode) -> Result<(), GpioError> {
        self.set_bit(pin, PU, pull == PullMode::Up)?;
        self.set_bit(pin, PD, pull == PullMode::Down)
    }

    fn set_high(&mut self, pin: Pin) -> Result<(), GpioError> {
        let (addr, mask) = Self::locate(pin, BSET)?;
        self.bus.write(addr, mask);
        Ok(())
    }

    fn set_low(&mut self, pin: Pin) -> Result<(), GpioError> {
        let (addr, mask) = Self::locate(pin, BCLR)?;
        self.bus.write(addr, mask);
        Ok(())
    }

    fn read(&self, pin: Pin) -> Result<PinLevel, GpioError> {
        self.bit(pin, IN).map(PinLevel::from)
    }

    fn output_level(&self, pin: Pin) -> Result<PinLevel, GpioError> {
        self.bit(pin, OUT).map(PinLevel::from)
    }
}
