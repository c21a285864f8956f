//! Errors

use crate::{clock::ParentClock, register::RegisterIndex};

/// Driver errors
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Error {
    /// Register address is missing from the board description or unusable
    InvalidConfiguration(RegisterIndex),
    /// Reference clock runs at 0 Hz, nothing can be synthesized from it
    InvalidReferenceFrequency,
    /// Parent clock could not be acquired
    ClockAcquire(ParentClock),
    /// Parent clock could not be released
    ClockRelease(ParentClock),
    /// DPLL never reported lock after reprogramming.
    /// Downstream clocks may be unstable, the caller is expected to halt.
    LockTimeout,
}

impl Error {
    /// True for conditions that leave the hardware in an unknown state.
    pub fn is_fatal(self: &Self) -> bool {
        matches!(self, Error::LockTimeout)
    }
}
