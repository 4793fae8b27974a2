//! Aggregate counters for a capture run.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub frames: u64,
    pub detections: u64,
    pub elapsed_ms: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed frame and its detection count.
    pub fn record(&mut self, detections: usize) {
        self.frames += 1;
        self.detections += detections as u64;
    }

    /// Average detections per frame.
    pub fn per_frame(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.detections as f64 / self.frames as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_frame_average() {
        let mut stats = RunStats::new();
        assert_eq!(stats.per_frame(), 0.0);

        stats.record(2);
        stats.record(0);
        stats.record(4);
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.detections, 6);
        assert_eq!(stats.per_frame(), 2.0);
    }
}
