//! Size-proportional pause between sending a command and reading its reply

use std::time::Duration;
use tracing::trace;

/// Transfer rate the bridge is assumed to sustain
pub const DEFAULT_BYTES_PER_SECOND: u32 = 0x8000;

/// Fixed-ratio flow control.
///
/// The bridge gives no acknowledgement before its reply is ready, so the
/// client waits `size / bytes_per_second` seconds before receiving. Every
/// read and write goes through [`Throttle::pause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    bytes_per_second: u32,
}

impl Throttle {
    /// Creates a throttle for the given rate; a rate of 0 disables the pause
    pub const fn new(bytes_per_second: u32) -> Self {
        Throttle { bytes_per_second }
    }

    pub const fn bytes_per_second(&self) -> u32 {
        self.bytes_per_second
    }

    /// Delay to wait before receiving the reply to a `size`-byte transfer
    pub fn delay_for(&self, size: usize) -> Duration {
        if self.bytes_per_second == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(size as f64 / f64::from(self.bytes_per_second))
    }

    /// Sleeps for [`Throttle::delay_for`]
    pub async fn pause(&self, size: usize) {
        let delay = self.delay_for(size);
        if delay.is_zero() {
            return;
        }
        trace!(size, delay_us = delay.as_micros() as u64, "throttling transfer");
        tokio::time::sleep(delay).await;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Throttle::new(DEFAULT_BYTES_PER_SECOND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_scales_with_size() {
        let throttle = Throttle::default();
        assert_eq!(throttle.delay_for(0), Duration::ZERO);
        assert_eq!(throttle.delay_for(0x8000), Duration::from_secs(1));
        assert_eq!(throttle.delay_for(0x4000), Duration::from_millis(500));
        assert!(throttle.delay_for(12) < throttle.delay_for(0x344));
    }

    #[test]
    fn test_zero_rate_disables() {
        let throttle = Throttle::new(0);
        assert_eq!(throttle.delay_for(1 << 20), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_sleeps_for_delay() {
        let throttle = Throttle::default();
        let start = tokio::time::Instant::now();
        throttle.pause(0x4000).await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
