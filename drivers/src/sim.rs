//! Simulated register file.
//!
//! [`SimBus`] stores every written word in a sparse map (unwritten
//! addresses read as zero) and lets a test attach hooks to individual
//! addresses to model hardware side effects: self-clearing busy bits,
//! write-0-to-clear flag registers, free-running down counters.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use common::sync::SpinLock;

use crate::hw::reg::RegisterBus;

/// Backing storage handed to hooks so they can touch other registers.
#[derive(Debug, Default)]
pub struct RegisterFile {
    words: BTreeMap<usize, u32>,
}

impl RegisterFile {
    pub fn get(&self, addr: usize) -> u32 {
        self.words.get(&addr).copied().unwrap_or(0)
    }

    pub fn set(&mut self, addr: usize, value: u32) {
        self.words.insert(addr, value);
    }
}

/// Produces the value of a read; may update the file.
pub type ReadHook = Box<dyn FnMut(&mut RegisterFile) -> u32 + Send>;

/// Consumes a written value; responsible for storing whatever sticks.
pub type WriteHook = Box<dyn FnMut(&mut RegisterFile, u32) + Send>;

#[derive(Default)]
struct State {
    file: RegisterFile,
    read_hooks: BTreeMap<usize, ReadHook>,
    write_hooks: BTreeMap<usize, WriteHook>,
    reads: BTreeMap<usize, usize>,
    writes: Vec<(usize, u32)>,
}

/// A [`RegisterBus`] backed by memory instead of silicon.
#[derive(Default)]
pub struct SimBus {
    state: SpinLock<State>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value without running hooks or logging.
    pub fn poke(&self, addr: usize, value: u32) {
        self.state.lock().file.set(addr, value);
    }

    /// Read the stored value without running hooks or counting.
    pub fn peek(&self, addr: usize) -> u32 {
        self.state.lock().file.get(addr)
    }

    pub fn on_read(&self, addr: usize, hook: impl FnMut(&mut RegisterFile) -> u32 + Send + 'static) {
        self.state.lock().read_hooks.insert(addr, Box::new(hook));
    }

    pub fn on_write(&self, addr: usize, hook: impl FnMut(&mut RegisterFile, u32) + Send + 'static) {
        self.state.lock().write_hooks.insert(addr, Box::new(hook));
    }

    /// Number of bus reads of `addr` so far.
    pub fn read_count(&self, addr: usize) -> usize {
        self.state.lock().reads.get(&addr).copied().unwrap_or(0)
    }

    /// Every bus write so far, in order.
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.state.lock().writes.clone()
    }

    /// Bus writes to one address, in order.
    pub fn writes_to(&self, addr: usize) -> Vec<u32> {
        self.state
            .lock()
            .writes
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Model a write-0-to-clear register: each zero bit written to `clear`
    /// clears the same bit in `status`. The written word is kept in `clear`.
    pub fn write_zero_to_clear(&self, clear: usize, status: usize) {
        self.on_write(clear, move |file, value| {
            file.set(clear, value);
            let remaining = file.get(status) & value;
            file.set(status, remaining);
        });
    }

    /// Model a write-1-to-set register: ones written to `addr` are OR-ed
    /// into `target`, which may be `addr` itself.
    pub fn write_one_to_set(&self, addr: usize, target: usize) {
        self.on_write(addr, move |file, value| {
            let current = file.get(target);
            file.set(target, current | value);
        });
    }

    /// Model a write-1-to-clear register: ones written to `addr` clear the
    /// same bits of `target`.
    pub fn write_one_to_clear(&self, addr: usize, target: usize) {
        self.on_write(addr, move |file, value| {
            let current = file.get(target);
            file.set(target, current & !value);
        });
    }

    /// Model a free-running down counter in `value_addr` that loses `step`
    /// ticks per read and reloads from the 24-bit `reload_addr` after zero.
    pub fn down_counter(&self, value_addr: usize, reload_addr: usize, step: u32) {
        self.on_read(value_addr, move |file| {
            let current = u64::from(file.get(value_addr));
            let period = u64::from(file.get(reload_addr) & 0x00FF_FFFF) + 1;
            let step = u64::from(step) % period;
            let next = (current + period - step) % period;
            file.set(value_addr, next as u32);
            next as u32
        });
    }
}

impl RegisterBus for SimBus {
    fn read(&self, addr: usize) -> u32 {
        let mut guard = self.state.lock();
        let State {
            file,
            read_hooks,
            reads,
            ..
        } = &mut *guard;
        *reads.entry(addr).or_insert(0) += 1;
        match read_hooks.get_mut(&addr) {
            Some(hook) => hook(file),
            None => file.get(addr),
        }
    }

    fn write(&self, addr: usize, value: u32) {
        let mut guard = self.state.lock();
        let State {
            file,
            write_hooks,
            writes,
            ..
        } = &mut *guard;
        writes.push((addr, value));
        match write_hooks.get_mut(&addr) {
            Some(hook) => hook(file, value),
            None => file.set(addr, value),
        }
    }
}
