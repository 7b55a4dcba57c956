//! System control: clock sources, clock tree prescalers, peripheral gates.

use super::PERIPH_BASE;
use crate::hw::reg::Field;

pub const SYSCTRL_BASE: usize = PERIPH_BASE + 0x2000;

pub const CR0: usize = 0x00;
pub const CR1: usize = 0x04;
/// Write-protect key register guarding `CR0` and `CR1`.
pub const CR2: usize = 0x08;
pub const RC48M_CR: usize = 0x0C;
pub const RCL_CR: usize = 0x10;
pub const XTH_CR: usize = 0x14;
pub const XTL_CR: usize = 0x18;
pub const PERI_CLKEN0: usize = 0x20;

pub const CR2_KEY_FIRST: u32 = 0x5A5A;
pub const CR2_KEY_SECOND: u32 = 0xA5A5;

// CR0
pub const CR0_CLKSW: Field = Field::new(0, 3);
pub const CR0_HCLK_PRS: Field = Field::new(4, 3);
pub const CR0_PCLK_PRS: Field = Field::new(8, 2);

// CR1
pub const CR1_RC48M_EN: Field = Field::bit(0);
pub const CR1_XTH_EN: Field = Field::bit(1);
pub const CR1_RCL_EN: Field = Field::bit(2);
pub const CR1_XTL_EN: Field = Field::bit(3);

// RC48M_CR
pub const RC48M_TRIM: Field = Field::new(0, 12);
pub const RC48M_FSEL: Field = Field::new(12, 3);
pub const RC48M_STABLE: Field = Field::bit(15);

// RCL_CR
pub const RCL_TRIM: Field = Field::new(0, 10);
/// 0: 32.768 kHz, 1: 38.4 kHz.
pub const RCL_FSEL: Field = Field::bit(10);
pub const RCL_STABLE: Field = Field::bit(12);

// XTH_CR / XTL_CR
pub const XTH_DRIVER: Field = Field::new(0, 2);
pub const XTH_STABLE: Field = Field::bit(6);
pub const XTL_DRIVER: Field = Field::new(0, 2);
pub const XTL_STABLE: Field = Field::bit(6);

pub const RC48M_FREQ_HZ: [u32; 6] = [4_000_000, 8_000_000, 16_000_000, 24_000_000, 32_000_000, 48_000_000];
pub const RCL_FREQ_HZ: [u32; 2] = [32_768, 38_400];
pub const XTL_FREQ_HZ: u32 = 32_768;

bitflags::bitflags! {
    /// `PERI_CLKEN0` gate bits.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct PeriphClocks: u32 {
        const UART0 = 1 << 0;
        const UART1 = 1 << 1;
        const I2C = 1 << 4;
        const SPI = 1 << 6;
        const GTIM0 = 1 << 8;
        const GTIM1 = 1 << 9;
        const ADC = 1 << 16;
        const VC_LVD = 1 << 17;
        const TRNG = 1 << 20;
        const CTRIM = 1 << 22;
        const FLASH = 1 << 27;
        const GPIO = 1 << 28;
    }
}
