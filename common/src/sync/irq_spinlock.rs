use core::{
    cell::UnsafeCell,
    marker::PhantomData,
    sync::atomic::{AtomicBool, Ordering},
};

use super::irq::IrqControl;

/// IRQ-safe spinlock.
///
/// - Masks interrupts on lock
/// - Spins until acquired
/// - Restores interrupt state on drop
///
/// Safe to use from both thread mode and handler mode. Not fair, not
/// reentrant.
pub struct IrqSpinLock<T, I: IrqControl> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
    _irq: PhantomData<I>,
}

unsafe impl<T: Send, I: IrqControl> Send for IrqSpinLock<T, I> {}
unsafe impl<T: Send, I: IrqControl> Sync for IrqSpinLock<T, I> {}

impl<T, I: IrqControl> IrqSpinLock<T, I> {
    pub const fn new(data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
            _irq: PhantomData,
        }
    }

    /// Acquire the lock with interrupts masked.
    pub fn lock(&self) -> IrqSpinLockGuard<'_, T, I> {
        let irq_state = I::disable();

        while self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            core::hint::spin_loop();
        }

        IrqSpinLockGuard {
            lock: self,
            irq_state,
        }
    }

    /// Run `f` on the protected data inside one critical section.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }
}

/// Guard returned by `IrqSpinLock::lock`.
///
/// Restores interrupt state on drop.
pub struct IrqSpinLockGuard<'a, T, I: IrqControl> {
    lock: &'a IrqSpinLock<T, I>,
    irq_state: I::State,
}

impl<T, I: IrqControl> core::ops::Deref for IrqSpinLockGuard<'_, T, I> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*self.lock.data.get() }
    }
}

impl<T, I: IrqControl> core::ops::DerefMut for IrqSpinLockGuard<'_, T, I> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T, I: IrqControl> Drop for IrqSpinLockGuard<'_, T, I> {
    fn drop(&mut self) {
        // Release lock first
        self.lock.locked.store(false, Ordering::Release);

        I::restore(self.irq_state);
    }
}
