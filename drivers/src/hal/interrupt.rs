//! Interrupt Controller Hardware Abstraction Layer.

/// Interrupt number type.
pub type IrqNumber = u32;

/// Interrupt priority level.
///
/// Lower values preempt higher ones, as on every Cortex-M.
pub type Priority = u8;

/// Interrupt controller trait.
pub trait InterruptController {
    /// Error type for interrupt controller operations.
    type Error: core::fmt::Debug;

    /// Enable (unmask) an interrupt line.
    fn enable(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;

    /// Disable (mask) an interrupt line.
    fn disable(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;

    /// Check if an interrupt is currently pending.
    fn is_pending(&self, irq: IrqNumber) -> Result<bool, Self::Error>;

    /// Lowest-numbered line that is both pending and enabled, if any.
    fn next_pending(&self) -> Option<IrqNumber>;

    /// Clear a pending interrupt.
    fn clear(&mut self, irq: IrqNumber) -> Result<(), Self::Error> {
        let _ = irq;
        Ok(())
    }
}

/// Extension trait for interrupt controllers with priority support.
pub trait PriorityInterruptController: InterruptController {
    /// Set the priority of an interrupt line.
    fn set_priority(&mut self, irq: IrqNumber, priority: Priority) -> Result<(), Self::Error>;

    /// Get the priority of an interrupt line.
    fn get_priority(&self, irq: IrqNumber) -> Result<Priority, Self::Error>;
}
