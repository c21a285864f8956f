//! DPLL clock controller

use core::convert::Infallible;

use embedded_hal::blocking::delay::DelayUs;
use log::{debug, error};

use crate::{
    clock::*,
    config::DpllConfig,
    constants::*,
    errors::*,
    frequency::*,
    mmio::Mmio,
    poll::*,
    register::*,
};

/// One AM3 DPLL.
///
/// Owns its three registers and both parent clock handles. Every method is
/// synchronous, waiting is done by busy polling the status register.
pub struct Dpll<BUS, CLK>
where CLK: ClockProvider,
{
    bus: BUS,
    clocks: CLK,
    clk_ref: CLK::Clock,
    clk_bypass: CLK::Clock,
    regs: RegisterSet,
    max_rate: Option<u64>,
    last_rounded: Option<Rounded>,
}


impl<BUS, CLK> Dpll<BUS, CLK>
where BUS: Mmio,
      CLK: ClockProvider,
{
    /// Takes register addresses from `config` and acquires the reference
    /// (index 0) and bypass (index 1) clocks.
    ///
    /// Hardware is not touched.
    pub fn init(
        config: &DpllConfig,
        bus: BUS,
        mut clocks: CLK,
    ) -> Result<Self, Error> {
        let regs = RegisterSet::new(&config.regs)?;

        let clk_ref = clocks.get_by_index(ParentClock::Reference.index())
            .map_err(|_| {
                error!("failed to get reference clock");
                Error::ClockAcquire(ParentClock::Reference)
            })?;

        let clk_bypass = match clocks.get_by_index(ParentClock::Bypass.index()) {
            Ok(clk) => clk,
            Err(_) => {
                error!("failed to get bypass clock");
                if clocks.release(clk_ref).is_err() {
                    error!("failed to release reference clock");
                }
                return Err(Error::ClockAcquire(ParentClock::Bypass));
            }
        };

        Ok(Dpll {
            bus,
            clocks,
            clk_ref,
            clk_bypass,
            regs,
            max_rate: config.max_rate,
            last_rounded: None,
        })
    }

    /// Releases the bypass clock, then the reference clock, and hands
    /// the bus and clock provider back.
    pub fn teardown(self: Self) -> Result<(BUS, CLK), Error> {
        let Dpll { bus, mut clocks, clk_ref, clk_bypass, .. } = self;

        clocks.release(clk_bypass).map_err(|_| {
            error!("failed to release bypass clock");
            Error::ClockRelease(ParentClock::Bypass)
        })?;

        clocks.release(clk_ref).map_err(|_| {
            error!("failed to release reference clock");
            Error::ClockRelease(ParentClock::Reference)
        })?;

        Ok((bus, clocks))
    }

    /// Closest rate the DPLL can produce from the current reference rate.
    /// Remembers the multiplier / divider for the next [`Dpll::set_rate`].
    pub fn round_rate(self: &mut Self, rate: u64) -> Result<u64, Error> {
        self.round(rate).map(|r| r.rate)
    }

    /// Reprograms the DPLL for the rate [`Dpll::round_rate`] would return.
    ///
    /// The DPLL is put in MN bypass while M and N change, then relocked.
    /// Failing to confirm bypass is only logged. Failing to confirm lock
    /// returns [`Error::LockTimeout`], which is fatal: the caller should
    /// halt rather than run on an unconfirmed clock.
    pub fn set_rate<Delay>(
        self: &mut Self,
        delay: &mut Delay,
        rate: u64,
    ) -> Result<u64, Error>
    where Delay: DelayUs<u16>,
    {
        let rounded = self.round(rate)?;
        self.program(delay, &rounded)?;
        Ok(rounded.rate)
    }

    /// Current output rate, read back from the hardware.
    ///
    /// The bypass clock rate while bypassed, ref * M / (N + 1) otherwise.
    pub fn get_rate(self: &mut Self) -> u64 {
        if self.mode().is_bypass() {
            let rate = self.clocks.get_rate(&self.clk_bypass);
            debug!("rate={}", rate);
            return rate;
        }

        let clksel: Reg<ClkSel> = self.read();
        let m: M = clksel.get();
        let n: N = clksel.get();
        let ref_rate = self.clocks.get_rate(&self.clk_ref);

        let rate = scaled(ref_rate, m.0 as u32, n.0 as u32 + 1);
        debug!("rate={}", rate);
        rate
    }

    /// Mode currently reported by CM_CLKMODE_DPLL
    pub fn mode(self: &mut Self) -> DpllMode {
        self.read::<ClkMode>().get()
    }

    pub fn is_locked(self: &mut Self) -> bool {
        self.read::<IdleSt>().get::<DpllClkStatus>() == DpllClkStatus::Locked
    }

    /// Result of the latest rate search
    pub fn last_rounded(self: &Self) -> Option<Rounded> {
        self.last_rounded
    }

    pub fn max_rate(self: &Self) -> Option<u64> {
        self.max_rate
    }

    fn round(self: &mut Self, rate: u64) -> Result<Rounded, Error> {
        let ref_rate = self.clocks.get_rate(&self.clk_ref);
        let rounded = Rounded::search(ref_rate, rate, self.max_rate)?;

        debug!("rate={}, best_rate={}, mult={}, div={}",
               rate, rounded.rate, rounded.mult, rounded.div);
        self.last_rounded = Some(rounded);
        Ok(rounded)
    }

    fn program<Delay>(self: &mut Self, delay: &mut Delay, rounded: &Rounded) -> Result<(), Error>
    where Delay: DelayUs<u16>,
    {
        let clksel: Reg<ClkSel> = self.read();

        self.request_mode(DpllMode::MnBypass);
        if self.wait_status(delay, DpllClkStatus::Bypassed, BYPASS_TIMEOUT_US).is_err() {
            error!("failed bypassing dpll");
        }

        let clksel = clksel
            .set(M(rounded.mult))
            .set(N(rounded.div - 1));
        self.write(clksel);

        self.request_mode(DpllMode::Locked);
        self.wait_status(delay, DpllClkStatus::Locked, LOCK_TIMEOUT_US)
            .map_err(|_| {
                error!("failed locking dpll");
                Error::LockTimeout
            })
    }

    fn wait_status<Delay>(
        self: &mut Self,
        delay: &mut Delay,
        want: DpllClkStatus,
        timeout_us: u32,
    ) -> Result<(), PollError<Infallible>>
    where Delay: DelayUs<u16>,
    {
        poll(delay, POLL_INTERVAL_US, timeout_us, || {
            if self.read::<IdleSt>().get::<DpllClkStatus>() == want {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        })
    }

    /// Rewrites DPLL_EN only
    fn request_mode(self: &mut Self, mode: DpllMode) {
        let addr = RAddr::<ClkMode>::addr(&self.regs);
        self.bus.modify32(addr, |w| Reg::<ClkMode>::new(w).set(mode).w);
    }

    #[inline]
    fn read<R>(self: &mut Self) -> Reg<R>
    where RegisterSet: RAddr<R>,
    {
        let addr = RAddr::<R>::addr(&self.regs);
        Reg::new(self.bus.read32(addr))
    }

    #[inline]
    fn write<R>(self: &mut Self, r: Reg<R>)
    where RegisterSet: RAddr<R>,
    {
        let addr = RAddr::<R>::addr(&self.regs);
        self.bus.write32(addr, r.w);
    }
}
