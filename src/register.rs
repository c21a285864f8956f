//! AM3 DPLL registers

use core::marker::PhantomData;

use log::{debug, error};

use crate::errors::*;

/// Register marker types
macro_rules! gen_register_marker {
    ($(#[$meta:meta])* $r:ident) => {
        $(#[$meta])*
        #[derive(Debug,Copy,Clone)]
        pub struct $r {}
    }
}

gen_register_marker!(
    /// CM_CLKMODE_DPLL: mode request, DPLL_EN field
    ClkMode
);
gen_register_marker!(
    /// CM_IDLEST_DPLL: live lock status
    IdleSt
);
gen_register_marker!(
    /// CM_CLKSEL_DPLL: multiplier and divider
    ClkSel
);


/// Single 32 bit register word
#[derive(Debug,Copy,Clone)]
pub struct Reg<R> {
    /// Register word
    pub w: u32,
    phantom: PhantomData<R>,
}

/// Bit operations on 32bit words
impl<R> Reg<R> {
    #[inline]
    pub fn new(w: u32) -> Self {
        Reg { w, phantom: PhantomData }
    }

    #[inline]
    pub fn get<F>(self: &Self) -> F
    where F: Sized + BitField<R> + From<u32>
    {
        F::from(
            (self.w >> F::offset()) & F::mask()
        )
    }

    /// Replaces the field bits, everything else is kept as is.
    #[inline]
    pub fn set<F>(mut self: Self, f: F) -> Self
    where F: Sized + BitField<R>,
          u32: From<F>,
    {
        let fbits = (u32::from(f) & F::mask()) << F::offset();
        let rbits = self.w & (! ( F::mask() << F::offset() ));
        self.w = rbits | fbits;
        self
    }
}


/// Position of a register address in the board description
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum RegisterIndex {
    ClkMode = 0,
    IdleSt = 1,
    ClkSel = 2,
}

impl RegisterIndex {
    pub fn name(self: &Self) -> &'static str {
        match self {
            RegisterIndex::ClkMode => "clkmode",
            RegisterIndex::IdleSt => "idlest",
            RegisterIndex::ClkSel => "clksel",
        }
    }
}


/// Addresses of the three DPLL registers.
/// Set once from the board description, never reassigned.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct RegisterSet {
    pub clkmode: usize,
    pub idlest: usize,
    pub clksel: usize,
}

impl RegisterSet {

    /// Pick register addresses out of the board description,
    /// ordered clkmode, idlest, clksel.
    pub fn new(regs: &[Option<usize>; 3]) -> Result<Self, Error> {
        Ok(RegisterSet {
            clkmode: Self::lookup(regs, RegisterIndex::ClkMode)?,
            idlest: Self::lookup(regs, RegisterIndex::IdleSt)?,
            clksel: Self::lookup(regs, RegisterIndex::ClkSel)?,
        })
    }

    fn lookup(regs: &[Option<usize>; 3], idx: RegisterIndex) -> Result<usize, Error> {
        match regs[idx as usize] {
            // 32 bit registers, must be word aligned
            Some(addr) if addr != 0 && addr % 4 == 0 => {
                debug!("{}_reg={:#010x}", idx.name(), addr);
                Ok(addr)
            }
            _ => {
                error!("failed to get {} register", idx.name());
                Err(Error::InvalidConfiguration(idx))
            }
        }
    }
}

/// Type-indexed register address
pub trait RAddr<R> {
    fn addr(self: &Self) -> usize;
}

macro_rules! gen_register_index {
    ($r:ident, $f:tt) => {
        impl RAddr<$r> for RegisterSet {
            #[inline]
            fn addr(self: &Self) -> usize { self.$f }
        }
    }
}

gen_register_index!(ClkMode, clkmode);
gen_register_index!(IdleSt, idlest);
gen_register_index!(ClkSel, clksel);



/// Bit operations on 32bit words
pub trait BitField<R> {
    /// Number of bits in the bit field
    fn num_bits() -> u8;

    /// Offset from 0
    fn offset() -> u8;

    #[inline]
    fn mask() -> u32 {
        !(0xFFFFFFFFu32 << Self::num_bits())
    }
}

/// Generate BitField implementation
macro_rules! gen_bitfield_impl {
	($r:ty, $n:ident, $nb:tt, $off:tt) => {
        impl BitField<$r> for $n {
            #[inline] fn num_bits() -> u8 { $nb }
            #[inline] fn offset() -> u8 { $off }
        }
    }
}

/// Small bitfield-encoded numbers boilerplate
macro_rules! gen_bitfield_struct {
	($(#[$meta:meta])*, $r:ty, $n:ident, $v:ty, $nb:tt, $off:tt) => {
        $(#[$meta])*
        #[derive(Debug,Copy,Clone,PartialEq,Eq)]
        pub struct $n(pub $v);

        gen_bitfield_impl!($r, $n, $nb, $off);

        impl From<u32> for $n { #[inline] fn from(x: u32) -> Self { $n(x as $v) } }
        impl From<$n> for u32 { #[inline] fn from(x: $n) -> u32 { x.0 as u32 } }
	};
}



const DPLL_EN_MN_BYPASS: u8 = 0x4;
const DPLL_EN_LOW_POWER_BYPASS: u8 = 0x5;
const DPLL_EN_FAST_RELOCK_BYPASS: u8 = 0x6;
const DPLL_EN_LOCK: u8 = 0x7;

/// DPLL_EN, bits [2:0] of CM_CLKMODE_DPLL.
/// Writing it requests a mode, reading it reports the current one.
/// There is no shadow copy, the hardware is the only source of truth.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum DpllMode {
    /// Output follows the bypass clock, M and N may be changed
    MnBypass,
    /// Idle bypass, low power
    LowPowerBypass,
    /// Idle bypass, fast relock
    FastRelockBypass,
    /// Output is ref * M / (N + 1)
    Locked,
    /// Reserved encoding
    Unknown(u8),
}

impl DpllMode {
    /// Any of the three bypass variants
    pub fn is_bypass(self: &Self) -> bool {
        matches!(self,
            DpllMode::MnBypass | DpllMode::LowPowerBypass | DpllMode::FastRelockBypass)
    }
}

impl From<u32> for DpllMode {
    #[inline]
    fn from(x: u32) -> Self {
        match x as u8 {
            DPLL_EN_MN_BYPASS => DpllMode::MnBypass,
            DPLL_EN_LOW_POWER_BYPASS => DpllMode::LowPowerBypass,
            DPLL_EN_FAST_RELOCK_BYPASS => DpllMode::FastRelockBypass,
            DPLL_EN_LOCK => DpllMode::Locked,
            v => DpllMode::Unknown(v),
        }
    }
}

impl From<DpllMode> for u32 {
    #[inline]
    fn from(m: DpllMode) -> u32 {
        (match m {
            DpllMode::MnBypass => DPLL_EN_MN_BYPASS,
            DpllMode::LowPowerBypass => DPLL_EN_LOW_POWER_BYPASS,
            DpllMode::FastRelockBypass => DPLL_EN_FAST_RELOCK_BYPASS,
            DpllMode::Locked => DPLL_EN_LOCK,
            DpllMode::Unknown(v) => v,
        }) as u32
    }
}
gen_bitfield_impl!(ClkMode, DpllMode, 3, 0);


/// ST_DPLL_CLK, bit 0 of CM_IDLEST_DPLL
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum DpllClkStatus {
    /// DPLL is in bypass or still acquiring lock
    Bypassed,
    Locked,
}

impl From<u32> for DpllClkStatus {
    #[inline]
    fn from(x: u32) -> Self {
        if x & 1 == 0 { DpllClkStatus::Bypassed } else { DpllClkStatus::Locked }
    }
}

impl From<DpllClkStatus> for u32 {
    #[inline]
    fn from(s: DpllClkStatus) -> u32 { s as u32 }
}
gen_bitfield_impl!(IdleSt, DpllClkStatus, 1, 0);


gen_bitfield_struct!(
    /// DPLL multiplier, bits [18:8] of CM_CLKSEL_DPLL.
    /// 0 and 1 put the DPLL in bypass, 2 to 2047 are usable.
    , ClkSel, M, u16, 11, 8
);

gen_bitfield_struct!(
    /// DPLL divider minus one, bits [6:0] of CM_CLKSEL_DPLL.
    /// The reference is divided by N + 1.
    , ClkSel, N, u8, 7, 0
);
