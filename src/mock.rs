//! Simulated DPLL registers, parent clocks and delay for tests

use std::vec::Vec;

use embedded_hal::blocking::delay::DelayUs;

use crate::{clock::ClockProvider, mmio::Mmio, register::DpllMode};

/// AM335x MPU DPLL register addresses
pub const CLKMODE: usize = 0x44e0_0488;
pub const IDLEST: usize = 0x44e0_0420;
pub const CLKSEL: usize = 0x44e0_042c;

pub const REGS: [Option<usize>; 3] = [Some(CLKMODE), Some(IDLEST), Some(CLKSEL)];

#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Access {
    Read(usize),
    Write(usize, u32),
}

/// Register file that reacts to mode requests like the real DPLL,
/// `settle_reads` status reads after the request.
#[derive(Debug)]
pub struct SimDpll {
    pub clkmode: u32,
    pub idlest: u32,
    pub clksel: u32,
    /// Status follows lock requests
    pub locks: bool,
    /// Status follows bypass requests
    pub bypasses: bool,
    pub settle_reads: u32,
    pub log: Vec<Access>,
    pending: Option<(u32, u32)>,
}

impl Default for SimDpll {
    fn default() -> Self {
        SimDpll {
            clkmode: 0x7,
            idlest: 0x1,
            // M = 41, N = 0, plus a reserved bit that must survive
            clksel: 0x0080_0000 | (41 << 8),
            locks: true,
            bypasses: true,
            settle_reads: 2,
            log: Vec::new(),
            pending: None,
        }
    }
}

impl SimDpll {
    pub fn writes_to(&self, addr: usize) -> Vec<u32> {
        self.log.iter().filter_map(|a| match *a {
            Access::Write(w, v) if w == addr => Some(v),
            _ => None,
        }).collect()
    }

    /// Position of the n-th write to `addr` in the access log
    pub fn write_pos(&self, addr: usize, n: usize) -> Option<usize> {
        self.log.iter().enumerate()
            .filter(|(_, a)| matches!(a, Access::Write(w, _) if *w == addr))
            .nth(n)
            .map(|(i, _)| i)
    }
}

impl Mmio for SimDpll {
    fn read32(&mut self, addr: usize) -> u32 {
        self.log.push(Access::Read(addr));
        match addr {
            CLKMODE => self.clkmode,
            IDLEST => {
                if let Some((bit, left)) = self.pending {
                    if left == 0 {
                        self.idlest = (self.idlest & !1) | bit;
                        self.pending = None;
                    } else {
                        self.pending = Some((bit, left - 1));
                    }
                }
                self.idlest
            }
            CLKSEL => self.clksel,
            _ => panic!("read from unmapped register {:#x}", addr),
        }
    }

    fn write32(&mut self, addr: usize, value: u32) {
        self.log.push(Access::Write(addr, value));
        match addr {
            CLKMODE => {
                self.clkmode = value;
                let mode = DpllMode::from(value & 0x7);
                let bit = if mode == DpllMode::Locked && self.locks {
                    Some(1)
                } else if mode.is_bypass() && self.bypasses {
                    Some(0)
                } else {
                    None
                };
                self.pending = bit.map(|b| (b, self.settle_reads));
            }
            IDLEST => panic!("idlest is read only"),
            CLKSEL => self.clksel = value,
            _ => panic!("write to unmapped register {:#x}", addr),
        }
    }
}


/// Reference (index 0) and bypass (index 1) clocks
#[derive(Debug,Default)]
pub struct TestClocks {
    pub rates: [u64; 2],
    pub held: [bool; 2],
    pub fail_get: Option<usize>,
    pub fail_release: Option<usize>,
}

impl TestClocks {
    pub fn new(ref_rate: u64, bypass_rate: u64) -> Self {
        TestClocks { rates: [ref_rate, bypass_rate], ..Default::default() }
    }
}

impl ClockProvider for TestClocks {
    type Clock = usize;
    type Error = ();

    fn get_by_index(&mut self, index: usize) -> Result<usize, ()> {
        if self.fail_get == Some(index) || index > 1 {
            return Err(());
        }
        self.held[index] = true;
        Ok(index)
    }

    fn get_rate(&mut self, clk: &usize) -> u64 {
        assert!(self.held[*clk], "rate of a clock that is not held");
        self.rates[*clk]
    }

    fn release(&mut self, clk: usize) -> Result<(), ()> {
        if self.fail_release == Some(clk) {
            return Err(());
        }
        self.held[clk] = false;
        Ok(())
    }
}


/// Delay that only keeps count
#[derive(Debug,Default)]
pub struct CountingDelay {
    pub calls: u32,
    pub total_us: u32,
}

impl DelayUs<u16> for CountingDelay {
    fn delay_us(&mut self, us: u16) {
        self.calls += 1;
        self.total_us += us as u32;
    }
}
