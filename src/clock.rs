//! Parent clocks

/// Upstream clocks a DPLL depends on, in board description order
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum ParentClock {
    /// Multiplied / divided to produce the locked output
    Reference = 0,
    /// Passed straight through while the DPLL is bypassed
    Bypass = 1,
}

impl ParentClock {
    /// Index of the clock handle in the board description
    #[inline]
    pub fn index(self: &Self) -> usize {
        *self as usize
    }
}


/// Source of parent clock handles, usually the surrounding clock framework.
pub trait ClockProvider {
    /// Opaque clock handle
    type Clock;
    type Error;

    /// Acquire the parent clock listed at `index`.
    fn get_by_index(self: &mut Self, index: usize) -> Result<Self::Clock, Self::Error>;

    /// Current rate of an acquired clock, Hz
    fn get_rate(self: &mut Self, clk: &Self::Clock) -> u64;

    /// Give an acquired clock back.
    fn release(self: &mut Self, clk: Self::Clock) -> Result<(), Self::Error>;
}

impl<P> ClockProvider for &mut P
where P: ClockProvider + ?Sized,
{
    type Clock = P::Clock;
    type Error = P::Error;

    fn get_by_index(self: &mut Self, index: usize) -> Result<Self::Clock, Self::Error> {
        (**self).get_by_index(index)
    }

    fn get_rate(self: &mut Self, clk: &Self::Clock) -> u64 {
        (**self).get_rate(clk)
    }

    fn release(self: &mut Self, clk: Self::Clock) -> Result<(), Self::Error> {
        (**self).release(clk)
    }
}
