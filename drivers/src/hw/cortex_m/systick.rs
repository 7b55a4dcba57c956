use crate::hw::reg::Field;

pub const SYST_BASE: usize = 0xE000_E010;

pub const CSR: usize = 0x00;
pub const RVR: usize = 0x04;
pub const CVR: usize = 0x08;
pub const CALIB: usize = 0x0C;

pub const CSR_ENABLE: Field = Field::bit(0);
pub const CSR_TICKINT: Field = Field::bit(1);
/// 1: processor clock, 0: external reference.
pub const CSR_CLKSOURCE: Field = Field::bit(2);
pub const CSR_COUNTFLAG: Field = Field::bit(16);

pub const RVR_RELOAD: Field = Field::new(0, 24);
pub const CVR_CURRENT: Field = Field::new(0, 24);
