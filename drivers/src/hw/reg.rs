//! Register access primitives.
//!
//! Drivers never dereference peripheral addresses themselves. Every access
//! goes through a [`RegisterBus`], which is [`Mmio`] on the chip and a
//! simulated register file in tests.

use core::ptr::{read_volatile, write_volatile};

/// A bit field inside a 32-bit register, described by position and width.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Field {
    shift: u32,
    width: u32,
}

impl Field {
    pub const fn new(shift: u32, width: u32) -> Self {
        Self { shift, width }
    }

    /// Single-bit field.
    pub const fn bit(shift: u32) -> Self {
        Self::new(shift, 1)
    }

    pub const fn shift(self) -> u32 {
        self.shift
    }

    pub const fn width(self) -> u32 {
        self.width
    }

    /// Largest value the field can hold.
    pub const fn max(self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// Field mask in register position.
    pub const fn mask(self) -> u32 {
        self.max() << self.shift
    }

    /// Extract the field from a register value.
    pub const fn get(self, reg: u32) -> u32 {
        (reg & self.mask()) >> self.shift
    }

    /// Shift `value` into register position, truncating it to the field width.
    pub const fn prep(self, value: u32) -> u32 {
        (value << self.shift) & self.mask()
    }

    /// Return `reg` with the field replaced by `value`.
    pub const fn set(self, reg: u32, value: u32) -> u32 {
        (reg & !self.mask()) | self.prep(value)
    }

    pub const fn fits(self, value: u32) -> bool {
        value <= self.max()
    }
}

/// Access to a 32-bit memory-mapped register space.
///
/// Implementors provide plain reads and writes; the read-modify-write
/// helpers are built on top of them and are not atomic with respect to
/// interrupts, same as the hardware.
pub trait RegisterBus {
    fn read(&self, addr: usize) -> u32;

    fn write(&self, addr: usize, value: u32);

    /// Replace the bits selected by `mask` with those of `value`.
    #[inline]
    fn modify(&self, addr: usize, mask: u32, value: u32) {
        let current = self.read(addr);
        self.write(addr, (current & !mask) | (value & mask));
    }

    #[inline]
    fn set_bits(&self, addr: usize, bits: u32) {
        self.modify(addr, bits, bits);
    }

    #[inline]
    fn clear_bits(&self, addr: usize, bits: u32) {
        self.modify(addr, bits, 0);
    }

    /// True if every bit of `bits` is set.
    #[inline]
    fn bits_set(&self, addr: usize, bits: u32) -> bool {
        self.read(addr) & bits == bits
    }

    #[inline]
    fn read_field(&self, addr: usize, field: Field) -> u32 {
        field.get(self.read(addr))
    }

    #[inline]
    fn write_field(&self, addr: usize, field: Field, value: u32) {
        self.modify(addr, field.mask(), field.prep(value));
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    #[inline]
    fn read(&self, addr: usize) -> u32 {
        (**self).read(addr)
    }

    #[inline]
    fn write(&self, addr: usize, value: u32) {
        (**self).write(addr, value)
    }
}

/// Volatile access to the physical address space.
#[derive(Debug, Copy, Clone)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Every address later passed to this bus must be a mapped, 32-bit
    /// accessible device register of the running chip.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for Mmio {
    #[inline(always)]
    fn read(&self, addr: usize) -> u32 {
        unsafe { read_volatile(addr as *const u32) }
    }

    #[inline(always)]
    fn write(&self, addr: usize, value: u32) {
        unsafe { write_volatile(addr as *mut u32, value) }
    }
}
