//! Board description / hardware variants

use crate::constants::*;

/// DPLL flavours found on AM3 parts, they differ only in the output ceiling
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Variant {
    /// "ti,am3-dpll-core-clock"
    Core,
    /// "ti,am3-dpll-no-gate-clock"
    NoGate,
    /// "ti,am3-dpll-no-gate-j-type-clock"
    NoGateJType,
}

impl Variant {
    /// Match a board description compatible string.
    pub fn from_compatible(compatible: &str) -> Option<Self> {
        match compatible {
            "ti,am3-dpll-core-clock" => Some(Variant::Core),
            "ti,am3-dpll-no-gate-clock" => Some(Variant::NoGate),
            "ti,am3-dpll-no-gate-j-type-clock" => Some(Variant::NoGateJType),
            _ => None,
        }
    }

    /// Highest output rate this variant may be programmed for, Hz
    pub fn max_rate(self: &Self) -> u64 {
        match self {
            Variant::Core => CORE_MAX_RATE,
            Variant::NoGate => NO_GATE_MAX_RATE,
            Variant::NoGateJType => NO_GATE_J_TYPE_MAX_RATE,
        }
    }
}


/// Per-instance board data
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct DpllConfig {
    /// Requests above this are lowered to it
    pub max_rate: Option<u64>,
    /// clkmode, idlest, clksel addresses, `None` if the board data lacks one
    pub regs: [Option<usize>; 3],
}

impl DpllConfig {
    pub fn new(variant: Variant, regs: [Option<usize>; 3]) -> Self {
        DpllConfig { max_rate: Some(variant.max_rate()), regs }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatible_strings_select_ceiling() {
        let rate = |c: &str| Variant::from_compatible(c).map(|v| v.max_rate());
        assert_eq!(rate("ti,am3-dpll-core-clock"), Some(1_000_000_000));
        assert_eq!(rate("ti,am3-dpll-no-gate-clock"), Some(1_000_000_000));
        assert_eq!(rate("ti,am3-dpll-no-gate-j-type-clock"), Some(2_000_000_000));
        assert_eq!(rate("ti,am3-dpll-x2-clock"), None);
    }

    #[test]
    fn config_takes_variant_ceiling() {
        let c = DpllConfig::new(Variant::NoGateJType, [Some(4), Some(8), Some(12)]);
        assert_eq!(c.max_rate, Some(2_000_000_000));
        assert_eq!(c.regs, [Some(4), Some(8), Some(12)]);
    }
}
