//! HC32L021 Interrupt Dispatch
//!
//! Every vector entry point forwards to [`dispatch`], which looks the line
//! up in a process-wide [`VectorTable`]. Lines without a registered handler
//! fall through to a no-op.

use common::PlatformIrq;
use common::sync::{IrqSpinLock, critical_section};
use log::trace;

use crate::hal::interrupt::{IrqNumber, Priority};
use crate::hw::cortex_m::nvic::IRQ_LINES;
use crate::hw::reg::RegisterBus;
use crate::peripheral::nvic::{Nvic, NvicError};

/// External interrupt lines of the HC32L021.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum Irq {
    Porta = 0,
    Portb = 1,
    Portc = 2,
    Uart0 = 6,
    Uart1 = 7,
    Spi = 10,
    I2c = 12,
    /// Composite timer 0, shared by GTIM0.
    Ctim0 = 14,
    /// Composite timer 1, shared by GTIM1.
    Ctim1 = 15,
    Iwdt = 21,
    Rtc = 22,
    Adc = 23,
    Vc0 = 25,
    Vc1 = 26,
    Lvd = 27,
    FlashRam = 29,
    Ctrim = 30,
}

impl Irq {
    pub const ALL: [Irq; 17] = [
        Irq::Porta,
        Irq::Portb,
        Irq::Portc,
        Irq::Uart0,
        Irq::Uart1,
        Irq::Spi,
        Irq::I2c,
        Irq::Ctim0,
        Irq::Ctim1,
        Irq::Iwdt,
        Irq::Rtc,
        Irq::Adc,
        Irq::Vc0,
        Irq::Vc1,
        Irq::Lvd,
        Irq::FlashRam,
        Irq::Ctrim,
    ];

    pub const fn number(self) -> IrqNumber {
        self as IrqNumber
    }

    /// Line number back to `Irq`; `None` for reserved lines.
    pub fn from_number(number: IrqNumber) -> Option<Self> {
        Self::ALL.into_iter().find(|irq| irq.number() == number)
    }
}

/// Interrupt handler; receives the line that fired.
pub type IrqHandler = fn(Irq);

/// Handler slot per NVIC line.
pub struct VectorTable {
    handlers: [Option<IrqHandler>; IRQ_LINES as usize],
}

impl VectorTable {
    pub const fn new() -> Self {
        Self {
            handlers: [None; IRQ_LINES as usize],
        }
    }

    /// Install `handler`, returning the one it replaced.
    pub fn register(&mut self, irq: Irq, handler: IrqHandler) -> Option<IrqHandler> {
        self.handlers[irq.number() as usize].replace(handler)
    }

    pub fn unregister(&mut self, irq: Irq) -> Option<IrqHandler> {
        self.handlers[irq.number() as usize].take()
    }

    pub fn handler(&self, irq: Irq) -> Option<IrqHandler> {
        self.handlers[irq.number() as usize]
    }

    /// Run the handler for `irq`. Returns false if the default ran instead.
    pub fn dispatch(&self, irq: Irq) -> bool {
        run(irq, self.handler(irq))
    }
}

impl Default for VectorTable {
    fn default() -> Self {
        Self::new()
    }
}

fn default_handler(irq: Irq) {
    trace!("irq: unhandled {:?}", irq);
}

fn run(irq: Irq, handler: Option<IrqHandler>) -> bool {
    match handler {
        Some(handler) => {
            handler(irq);
            true
        }
        None => {
            default_handler(irq);
            false
        }
    }
}

static VECTORS: IrqSpinLock<VectorTable, PlatformIrq> = IrqSpinLock::new(VectorTable::new());

/// Install a handler in the global table.
pub fn register(irq: Irq, handler: IrqHandler) -> Option<IrqHandler> {
    VECTORS.with(|table| table.register(irq, handler))
}

pub fn unregister(irq: Irq) -> Option<IrqHandler> {
    VECTORS.with(|table| table.unregister(irq))
}

/// Run the globally registered handler for `irq`.
///
/// The table lock is released before the handler runs, so a handler may
/// register or unregister handlers itself.
pub fn dispatch(irq: Irq) -> bool {
    let handler = VECTORS.with(|table| table.handler(irq));
    run(irq, handler)
}

/// Clear any stale pending state of `irq`, set its priority, then enable or
/// disable the line.
pub fn enable_nvic<B: RegisterBus>(
    bus: B,
    irq: Irq,
    priority: Priority,
    enable: bool,
) -> Result<(), NvicError> {
    let nvic = Nvic::new(bus);
    let line = irq.number();

    critical_section::<PlatformIrq, _>(|| {
        nvic.clear_pending(line)?;
        nvic.set_irq_priority(line, priority)?;
        if enable {
            nvic.enable_irq(line)
        } else {
            nvic.disable_irq(line)
        }
    })
}

/// Device part of the vector table, placed after the core exceptions by the
/// `cortex-m-rt` linker script. Each populated slot forwards to [`dispatch`].
#[cfg(all(feature = "rt", target_arch = "arm", target_os = "none"))]
mod vectors {
    use super::{IRQ_LINES, Irq, dispatch};

    #[derive(Copy, Clone)]
    #[repr(C)]
    pub union Vector {
        handler: unsafe extern "C" fn(),
        reserved: usize,
    }

    macro_rules! vector_entries {
        ($($entry:ident => $irq:ident),* $(,)?) => {
            $(
                #[unsafe(no_mangle)]
                #[allow(non_snake_case)]
                pub extern "C" fn $entry() {
                    dispatch(Irq::$irq);
                }
            )*

            #[unsafe(link_section = ".vector_table.interrupts")]
            #[unsafe(no_mangle)]
            pub static __INTERRUPTS: [Vector; IRQ_LINES as usize] = {
                let mut table = [Vector { reserved: 0 }; IRQ_LINES as usize];
                $(
                    table[Irq::$irq.number() as usize] = Vector { handler: $entry };
                )*
                table
            };
        };
    }

    vector_entries! {
        PORTA_IRQHandler => Porta,
        PORTB_IRQHandler => Portb,
        PORTC_IRQHandler => Portc,
        UART0_IRQHandler => Uart0,
        UART1_IRQHandler => Uart1,
        SPI_IRQHandler => Spi,
        I2C_IRQHandler => I2c,
        CTIM0_IRQHandler => Ctim0,
        CTIM1_IRQHandler => Ctim1,
        IWDT_IRQHandler => Iwdt,
        RTC_IRQHandler => Rtc,
        ADC_IRQHandler => Adc,
        VC0_IRQHandler => Vc0,
        VC1_IRQHandler => Vc1,
        LVD_IRQHandler => Lvd,
        FLASH_RAM_IRQHandler => FlashRam,
        CTRIM_IRQHandler => Ctrim,
    }
}
