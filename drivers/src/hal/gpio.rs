//! GPIO (General Purpose Input/Output) Hardware Abstraction Layer.

/// Pin logic level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinLevel {
    /// Logic low (0V or ground).
    Low,
    /// Logic high (VDD).
    High,
}

impl From<bool> for PinLevel {
    fn from(value: bool) -> Self {
        if value {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

impl From<PinLevel> for bool {
    fn from(level: PinLevel) -> bool {
        matches!(level, PinLevel::High)
    }
}

/// Internal pull resistor configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PullMode {
    /// No pull resistor (high impedance).
    None,
    /// Enable internal pull-up resistor.
    Up,
    /// Enable internal pull-down resistor.
    Down,
}

/// Pin direction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// GPIO controller trait.
///
/// # Type Parameters
///
/// - `Pin`: Platform-specific pin identifier
/// - `Error`: Error type for operations that can fail
pub trait GpioController {
    /// Platform-specific pin identifier.
    type Pin: Copy + Clone;

    /// Error type for GPIO operations.
    type Error: core::fmt::Debug;

    /// Configure a pin as input or output.
    fn set_direction(&mut self, pin: Self::Pin, direction: Direction) -> Result<(), Self::Error>;

    /// Configure the internal pull resistor for a pin.
    fn set_pull(&mut self, pin: Self::Pin, pull: PullMode) -> Result<(), Self::Error>;

    /// Set a pin to logic high.
    fn set_high(&mut self, pin: Self::Pin) -> Result<(), Self::Error>;

    /// Set a pin to logic low.
    fn set_low(&mut self, pin: Self::Pin) -> Result<(), Self::Error>;

    /// Read the current logic level of a pin.
    fn read(&self, pin: Self::Pin) -> Result<PinLevel, Self::Error>;

    /// Read back the driven output level of a pin.
    fn output_level(&self, pin: Self::Pin) -> Result<PinLevel, Self::Error>;

    /// Set the pin to a specific level.
    fn set_level(&mut self, pin: Self::Pin, level: PinLevel) -> Result<(), Self::Error> {
        match level {
            PinLevel::High => self.set_high(pin),
            PinLevel::Low => self.set_low(pin),
        }
    }

    /// Toggle the output state of a pin.
    fn toggle(&mut self, pin: Self::Pin) -> Result<(), Self::Error> {
        let level = self.output_level(pin)?;
        self.set_level(
            pin,
            if level == PinLevel::High {
                PinLevel::Low
            } else {
                PinLevel::High
            },
        )
    }
}
