//! Bounded busy polling

use embedded_hal::blocking::delay::DelayUs;

/// Why [`poll`] gave up
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum PollError<E> {
    /// The check kept returning `WouldBlock` for the whole timeout
    Timeout,
    /// The check failed outright
    Other(E),
}

/// Retries a non-blocking check every `interval_us` until it completes or
/// `timeout_us` worth of intervals have elapsed.
///
/// The check always runs at least once, and once more after the last delay,
/// so a zero timeout still gets a single look at the hardware.
pub fn poll<T, E, D, F>(
    delay: &mut D,
    interval_us: u16,
    timeout_us: u32,
    mut check: F,
) -> Result<T, PollError<E>>
where D: DelayUs<u16>,
      F: FnMut() -> nb::Result<T, E>,
{
    // a zero interval still has to make progress towards the timeout
    let step = u32::from(interval_us.max(1));
    let mut waited: u32 = 0;

    loop {
        match check() {
            Ok(v) => return Ok(v),
            Err(nb::Error::Other(e)) => return Err(PollError::Other(e)),
            Err(nb::Error::WouldBlock) => {}
        }

        if waited >= timeout_us {
            return Err(PollError::Timeout);
        }

        delay.delay_us(interval_us);
        waited = waited.saturating_add(step);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::CountingDelay;

    #[test]
    fn ready_immediately_does_not_delay() {
        let mut delay = CountingDelay::default();
        let r: Result<u8, PollError<()>> = poll(&mut delay, 10, 100, || Ok(7));
        assert_eq!(r, Ok(7));
        assert_eq!(delay.calls, 0);
    }

    #[test]
    fn completes_after_a_few_retries() {
        let mut delay = CountingDelay::default();
        let mut n = 0;
        let r: Result<(), PollError<()>> = poll(&mut delay, 10, 100, || {
            n += 1;
            if n < 4 { Err(nb::Error::WouldBlock) } else { Ok(()) }
        });
        assert_eq!(r, Ok(()));
        assert_eq!(n, 4);
        assert_eq!(delay.total_us, 30);
    }

    #[test]
    fn gives_up_after_timeout() {
        let mut delay = CountingDelay::default();
        let mut n = 0;
        let r: Result<(), PollError<()>> = poll(&mut delay, 10, 100, || {
            n += 1;
            Err(nb::Error::WouldBlock)
        });
        assert_eq!(r, Err(PollError::Timeout));
        assert_eq!(delay.total_us, 100);
        assert_eq!(n, 11);
    }

    #[test]
    fn check_error_is_passed_through() {
        let mut delay = CountingDelay::default();
        let r: Result<(), PollError<&str>> = poll(&mut delay, 10, 100, || Err(nb::Error::Other("gone")));
        assert_eq!(r, Err(PollError::Other("gone")));
    }

    #[test]
    fn zero_timeout_checks_once() {
        let mut delay = CountingDelay::default();
        let mut n = 0;
        let r: Result<(), PollError<()>> = poll(&mut delay, 0, 0, || {
            n += 1;
            Err(nb::Error::WouldBlock)
        });
        assert_eq!(r, Err(PollError::Timeout));
        assert_eq!(n, 1);
        assert_eq!(delay.calls, 0);
    }
}
