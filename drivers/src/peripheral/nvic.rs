//! ARMv6-M Nested Vectored Interrupt Controller Driver

use crate::hal::interrupt::{
    InterruptController, IrqNumber, Priority, PriorityInterruptController,
};
use crate::hw::cortex_m::nvic::*;
use crate::hw::reg::RegisterBus;

/// Lowest urgency a Cortex-M0+ line can be given.
pub const LOWEST_PRIORITY: Priority = (1 << PRIO_BITS) - 1;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NvicError {
    /// Line number beyond the 32 external lines.
    InvalidIrq(IrqNumber),
    /// Priority beyond the implemented priority bits.
    InvalidPriority(Priority),
}

/// NVIC driver.
pub struct Nvic<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> Nvic<B> {
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    fn line(irq: IrqNumber) -> Result<u32, NvicError> {
        if irq < IRQ_LINES {
            Ok(1 << irq)
        } else {
            Err(NvicError::InvalidIrq(irq))
        }
    }

    pub fn enable_irq(&self, irq: IrqNumber) -> Result<(), NvicError> {
        self.bus.write(ISER, Self::line(irq)?);
        Ok(())
    }

    pub fn disable_irq(&self, irq: IrqNumber) -> Result<(), NvicError> {
        self.bus.write(ICER, Self::line(irq)?);
        Ok(())
    }

    pub fn is_enabled(&self, irq: IrqNumber) -> Result<bool, NvicError> {
        Ok(self.bus.read(ISER) & Self::line(irq)? != 0)
    }

    pub fn set_pending(&self, irq: IrqNumber) -> Result<(), NvicError> {
        self.bus.write(ISPR, Self::line(irq)?);
        Ok(())
    }

    pub fn clear_pending(&self, irq: IrqNumber) -> Result<(), NvicError> {
        self.bus.write(ICPR, Self::line(irq)?);
        Ok(())
    }

    pub fn pending(&self, irq: IrqNumber) -> Result<bool, NvicError> {
        Ok(self.bus.read(ISPR) & Self::line(irq)? != 0)
    }

    /// Write the priority byte of `irq`. `IPR` is word-access only on
    /// ARMv6-M, so the neighbouring lines' bytes are read back and kept.
    pub fn set_irq_priority(&self, irq: IrqNumber, priority: Priority) -> Result<(), NvicError> {
        Self::line(irq)?;
        if priority > LOWEST_PRIORITY {
            return Err(NvicError::InvalidPriority(priority));
        }
        let byte_mask = 0xFF << (8 * (irq % 4));
        self.bus
            .modify(ipr(irq), byte_mask, u32::from(priority) << ipr_shift(irq));
        Ok(())
    }

    pub fn irq_priority(&self, irq: IrqNumber) -> Result<Priority, NvicError> {
        Self::line(irq)?;
        let word = self.bus.read(ipr(irq));
        Ok(((word >> ipr_shift(irq)) & u32::from(LOWEST_PRIORITY)) as Priority)
    }
}

// ============================================================================
// HAL Implementation
// ============================================================================

impl<B: RegisterBus> InterruptController for Nvic<B> {
    type Error = NvicError;

    fn enable(&mut self, irq: IrqNumber) -> Result<(), Self::Error> {
        self.enable_irq(irq)
    }

    fn disable(&mut self, irq: IrqNumber) -> Result<(), Self::Error> {
        self.disable_irq(irq)
    }

    fn is_pending(&self, irq: IrqNumber) -> Result<bool, Self::Error> {
        self.pending(irq)
    }

    fn next_pending(&self) -> Option<IrqNumber> {
        let active = self.bus.read(ISPR) & self.bus.read(ISER);
        (active != 0).then(|| active.trailing_zeros())
    }

    fn clear(&mut self, irq: IrqNumber) -> Result<(), Self::Error> {
        self.clear_pending(irq)
    }
}

impl<B: RegisterBus> PriorityInterruptController for Nvic<B> {
    fn set_priority(&mut self, irq: IrqNumber, priority: Priority) -> Result<(), Self::Error> {
        self.set_irq_priority(irq, priority)
    }

    fn get_priority(&self, irq: IrqNumber) -> Result<Priority, Self::Error> {
        self.irq_priority(irq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBus;

    fn nvic_bus() -> SimBus {
        let bus = SimBus::new();
        bus.write_one_to_set(ISER, ISER);
        bus.write_one_to_clear(ICER, ISER);
        bus.write_one_to_set(ISPR, ISPR);
        bus.write_one_to_clear(ICPR, ISPR);
        bus
    }

    #[test]
    fn enable_disable_touch_only_their_line() {
        let bus = nvic_bus();
        let mut nvic = Nvic::new(&bus);
        nvic.enable(3).unwrap();
        nvic.enable(27).unwrap();
        nvic.disable(3).unwrap();
        assert_eq!(bus.peek(ISER), 1 << 27);
        assert!(nvic.is_enabled(27).unwrap());
        assert!(!nvic.is_enabled(3).unwrap());
        assert_eq!(nvic.enable(32), Err(NvicError::InvalidIrq(32)));
    }

    #[test]
    fn priority_bytes_are_independent() {
        let bus = nvic_bus();
        let mut nvic = Nvic::new(&bus);
        nvic.set_priority(12, 1).unwrap();
        nvic.set_priority(13, 3).unwrap();
        nvic.set_priority(15, 2).unwrap();

        assert_eq!(bus.peek(ipr(12)), 0x80_00_C0_40);
        assert_eq!(nvic.get_priority(12), Ok(1));
        assert_eq!(nvic.get_priority(13), Ok(3));
        assert_eq!(nvic.get_priority(14), Ok(0));
        assert_eq!(nvic.get_priority(15), Ok(2));

        nvic.set_priority(13, 0).unwrap();
        assert_eq!(bus.peek(ipr(12)), 0x80_00_00_40);
        assert_eq!(nvic.set_priority(13, 4), Err(NvicError::InvalidPriority(4)));
    }

    #[test]
    fn next_pending_requires_enabled_line() {
        let bus = nvic_bus();
        let mut nvic = Nvic::new(&bus);
        nvic.set_pending(5).unwrap();
        nvic.set_pending(9).unwrap();
        assert_eq!(nvic.next_pending(), None);

        nvic.enable(9).unwrap();
        assert_eq!(nvic.next_pending(), Some(9));
        nvic.enable(5).unwrap();
        assert_eq!(nvic.next_pending(), Some(5));

        nvic.clear(5).unwrap();
        assert!(!nvic.is_pending(5).unwrap());
        assert_eq!(nvic.next_pending(), Some(9));
    }
}
