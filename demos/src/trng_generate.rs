//! Fill a buffer with 64-bit random numbers from the TRNG.

use hc32l021_ddl::RegisterBus;
use hc32l021_ddl::platform::hc32l021::sysctrl::{PeriphClocks, SysCtrl};
use hc32l021_ddl::platform::hc32l021::trng::Trng;
use log::info;

use crate::board::DemoError;

/// Seed the generator, fill `out`, then power the noise source down.
pub fn run<B: RegisterBus + Copy>(bus: B, out: &mut [u64]) -> Result<usize, DemoError> {
    SysCtrl::new(bus).periph_clock_enable(PeriphClocks::TRNG);

    let trng = Trng::new(bus);
    let result = fill(&trng, out);
    trng.disable();
    result?;

    info!("trng_generate: {} values", out.len());
    Ok(out.len())
}

fn fill<B: RegisterBus>(trng: &Trng<B>, out: &mut [u64]) -> Result<(), DemoError> {
    trng.init()?;
    for slot in out.iter_mut() {
        *slot = trng.random_u64()?;
    }
    Ok(())
}
