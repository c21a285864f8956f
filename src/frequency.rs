//! Frequency calculations

use core::convert::TryFrom;

use log::warn;

use crate::{constants::*, errors::*};


/// Lower `rate` to the ceiling, if there is one.
pub fn clamp_rate(rate: u64, max_rate: Option<u64>) -> u64 {
    match max_rate {
        Some(max) if rate > max => {
            warn!("{} is too high a rate, lowered to {}", rate, max);
            max
        }
        _ => rate,
    }
}

/// floor(ref_rate * mult / div), saturating instead of wrapping.
#[inline]
pub fn scaled(ref_rate: u64, mult: u32, div: u32) -> u64 {
    let r = (ref_rate as u128) * (mult as u128) / (div as u128);
    u64::try_from(r).unwrap_or(u64::MAX)
}


/// Best integer multiplier / divider pair for a requested rate.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct Rounded {
    /// Achieved output rate, Hz
    pub rate: u64,
    /// M, 2 to 2047
    pub mult: u16,
    /// Divider, 1 to 128. Programmed as N = div - 1.
    pub div: u8,
}

impl Rounded {
    fn new(ref_rate: u64, mult: u16, div: u8) -> Self {
        Rounded { rate: scaled(ref_rate, mult as u32, div as u32), mult, div }
    }

    /// Search every divider, smallest first, and for each divider the
    /// multipliers from smallest up, for the output closest to `rate`.
    ///
    /// Output = floor(ref_rate * mult / div).
    /// Only a strictly smaller error replaces the current best, so on ties
    /// the smallest divider, then the smallest multiplier, wins.
    /// `rate` is lowered to `max_rate` first, and no output above
    /// `max_rate` is ever picked.
    pub fn search(ref_rate: u64, rate: u64, max_rate: Option<u64>) -> Result<Self, Error> {
        if ref_rate == 0 {
            return Err(Error::InvalidReferenceFrequency);
        }
        let rate = clamp_rate(rate, max_rate);
        let ceiling = max_rate.unwrap_or(u64::MAX);

        let mut best: Option<(u64, Rounded)> = None;

        for div in DIV_MIN..=DIV_MAX {
            if let Some((0, _)) = best {
                break;
            }
            for mult in MULT_MIN..=MULT_MAX {
                let candidate = Rounded::new(ref_rate, mult, div);
                if candidate.rate > ceiling {
                    break;
                }
                let err = candidate.rate.abs_diff(rate);
                match best {
                    Some((err_min, _)) if err >= err_min => {
                        // output only grows with mult from here on
                        if candidate.rate > rate {
                            break;
                        }
                    }
                    _ => {
                        best = Some((err, candidate));
                        if err == 0 {
                            break;
                        }
                    }
                }
            }
        }

        match best {
            Some((_, rounded)) => Ok(rounded),
            None => {
                // even ref * 2 / 128 is over the ceiling
                let slowest = Rounded::new(ref_rate, MULT_MIN, DIV_MAX);
                warn!("no rate under {}, using {}", ceiling, slowest.rate);
                Ok(slowest)
            }
        }
    }
}
