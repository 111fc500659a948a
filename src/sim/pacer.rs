//! Frame pacing
//!
//! Converts a monotonic nanosecond timestamp stream into bounded
//! per-frame deltas, and decides when a frame has already blown its
//! budget and should skip presentation.

use crate::consts::{FRAME_BUDGET_SECS, MAX_FRAME_GAP_NANOS};

/// Delta producer over a caller-supplied timestamp stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct FramePacer {
    prev: Option<u64>,
}

impl FramePacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed since the previous call.
    ///
    /// The first call, a gap longer than a second (app resumed after a
    /// pause), and a non-monotonic timestamp all yield zero so the
    /// simulation never takes a catch-up jump.
    pub fn delta(&mut self, timestamp_nanos: u64) -> f32 {
        let prev = self.prev.replace(timestamp_nanos);
        let Some(prev) = prev else {
            return 0.0;
        };
        if timestamp_nanos < prev {
            log::warn!(
                "timestamp went backwards: {timestamp_nanos} < {prev}, treating as zero delta"
            );
            return 0.0;
        }
        let gap = timestamp_nanos - prev;
        if gap > MAX_FRAME_GAP_NANOS {
            return 0.0;
        }
        gap as f32 / 1e9
    }

    /// True when the work done since `frame_start` already exceeds the
    /// per-frame budget, so presentation should be skipped this frame.
    pub fn over_budget(frame_start_nanos: u64, now_nanos: u64) -> bool {
        let spent = now_nanos.saturating_sub(frame_start_nanos) as f32 / 1e9;
        spent > FRAME_BUDGET_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NANOS_60FPS: u64 = 16_666_667;

    #[test]
    fn test_first_delta_is_zero() {
        let mut pacer = FramePacer::new();
        assert_eq!(pacer.delta(123_456), 0.0);
    }

    #[test]
    fn test_steady_stream_yields_frame_deltas() {
        let mut pacer = FramePacer::new();
        pacer.delta(0);
        let dt = pacer.delta(NANOS_60FPS);
        assert!((dt - 1.0 / 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_long_gap_yields_zero_then_resumes() {
        let mut pacer = FramePacer::new();
        pacer.delta(0);
        assert_eq!(pacer.delta(2_000_000_000), 0.0);
        let dt = pacer.delta(2_000_000_000 + NANOS_60FPS);
        assert!(dt > 0.0);
    }

    #[test]
    fn test_backwards_timestamp_yields_zero() {
        let mut pacer = FramePacer::new();
        pacer.delta(1_000_000);
        assert_eq!(pacer.delta(500_000), 0.0);
    }

    #[test]
    fn test_over_budget() {
        assert!(!FramePacer::over_budget(0, 10_000_000));
        assert!(FramePacer::over_budget(0, 20_000_000));
    }
}
