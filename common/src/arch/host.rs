//! Host stand-in used by unit tests and the simulated register file.

use crate::sync::irq::IrqControl;

/// No interrupts exist on the host, so masking is a no-op.
pub struct HostIrq;

impl IrqControl for HostIrq {
    type State = ();

    #[inline(always)]
    fn disable() {}

    #[inline(always)]
    fn restore(_state: ()) {}
}
