#![cfg_attr(not(test), no_std)]

//! TI AM3 DPLL clock driver.
//!
//! Finds the integer multiplier / divider pair closest to a requested rate
//! and reprograms the DPLL through MN bypass, then waits for it to relock.
//!
//! ```ignore
//! let config = DpllConfig::new(Variant::Core, [Some(0x44e0_0488), Some(0x44e0_0420), Some(0x44e0_042c)]);
//! let mut dpll = Dpll::init(&config, unsafe { Volatile::new() }, clocks)?;
//! match dpll.set_rate(&mut delay, 1_000_000_000) {
//!     Err(e) if e.is_fatal() => loop {},
//!     r => r?,
//! };
//! ```

pub mod constants;
pub mod register;
pub mod errors;
pub mod config;
pub mod clock;
pub mod mmio;
pub mod poll;
pub mod frequency;
pub mod device;

#[cfg(test)]
mod mock;
