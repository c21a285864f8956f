//! Constants

/// Smallest multiplier (M) the DPLL accepts
pub const MULT_MIN: u16 = 2;

/// Largest multiplier (M), 11 bit field
pub const MULT_MAX: u16 = 2047;

/// Smallest divider, programmed as N = 0
pub const DIV_MIN: u8 = 1;

/// Largest divider, programmed as N = 127
pub const DIV_MAX: u8 = 128;

/// Status register polling interval, us
pub const POLL_INTERVAL_US: u16 = 10;

/// How long to wait for the DPLL to report bypass, us.
/// Expiry is reported but not fatal.
pub const BYPASS_TIMEOUT_US: u32 = 1_000_000;

/// How long to wait for the DPLL to report lock, us.
pub const LOCK_TIMEOUT_US: u32 = 1_000_000;

/// "ti,am3-dpll-core-clock" output ceiling, Hz
pub const CORE_MAX_RATE: u64 = 1_000_000_000;

/// "ti,am3-dpll-no-gate-clock" output ceiling, Hz
pub const NO_GATE_MAX_RATE: u64 = 1_000_000_000;

/// "ti,am3-dpll-no-gate-j-type-clock" output ceiling, Hz
pub const NO_GATE_J_TYPE_MAX_RATE: u64 = 2_000_000_000;
