//! Memory mapped register access

/// 32 bit memory mapped register bus.
///
/// Every access goes through `&mut self`, the controller owning the bus is
/// the only one touching these addresses.
pub trait Mmio {
    fn read32(self: &mut Self, addr: usize) -> u32;

    fn write32(self: &mut Self, addr: usize, value: u32);

    /// Read, apply `f`, write back.
    #[inline]
    fn modify32<F>(self: &mut Self, addr: usize, f: F)
    where F: FnOnce(u32) -> u32,
    {
        let v = self.read32(addr);
        self.write32(addr, f(v));
    }
}


/// Direct volatile access to physical addresses
#[derive(Debug)]
pub struct Volatile {
    _private: (),
}

impl Volatile {
    /// # Safety
    ///
    /// Every address later passed to [`Mmio::read32`] / [`Mmio::write32`]
    /// must be a mapped, word aligned device register that nothing else
    /// accesses concurrently.
    pub unsafe fn new() -> Self {
        Volatile { _private: () }
    }
}

impl Mmio for Volatile {
    #[inline(always)]
    fn read32(self: &mut Self, addr: usize) -> u32 {
        unsafe { (addr as *const u32).read_volatile() }
    }

    #[inline(always)]
    fn write32(self: &mut Self, addr: usize, value: u32) {
        unsafe { (addr as *mut u32).write_volatile(value) }
    }
}

impl<T> Mmio for &mut T
where T: Mmio + ?Sized,
{
    #[inline]
    fn read32(self: &mut Self, addr: usize) -> u32 {
        (**self).read32(addr)
    }

    #[inline]
    fn write32(self: &mut Self, addr: usize, value: u32) {
        (**self).write32(addr, value)
    }
}
