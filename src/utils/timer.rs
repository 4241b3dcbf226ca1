//! Timer utilities
//!
//! Measures check durations and render-step laps.

use std::time::{Duration, Instant};

/// Measures one labelled operation
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: String,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Stop timer and return elapsed milliseconds
    pub fn stop(self) -> u64 {
        let elapsed = self.elapsed_ms();
        tracing::debug!("{}: {}ms", self.label, elapsed);
        elapsed
    }
}

/// Stopwatch with lap timing
#[derive(Debug)]
pub struct Stopwatch {
    start: Instant,
    laps: Vec<(String, Duration)>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            laps: Vec::new(),
        }
    }

    /// Record a lap at the current cumulative time
    pub fn lap(&mut self, label: impl Into<String>) {
        self.laps.push((label.into(), self.start.elapsed()));
    }

    /// Duration of each lap, not cumulative
    pub fn lap_times(&self) -> Vec<(&str, Duration)> {
        let mut prev = Duration::ZERO;
        self.laps
            .iter()
            .map(|(label, cumulative)| {
                let lap = cumulative.saturating_sub(prev);
                prev = *cumulative;
                (label.as_str(), lap)
            })
            .collect()
    }

    /// One `label: Nms` line per lap, then the total
    pub fn format(&self) -> String {
        let mut output = String::new();
        for (label, duration) in self.lap_times() {
            output.push_str(&format!("{}: {}ms\n", label, duration.as_millis()));
        }
        output.push_str(&format!("Total: {}ms", self.start.elapsed().as_millis()));
        output
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_timer() {
        let timer = Timer::start("check");
        sleep(Duration::from_millis(10));
        assert!(timer.stop() >= 10);
    }

    #[test]
    fn test_stopwatch_laps() {
        let mut sw = Stopwatch::new();
        sleep(Duration::from_millis(10));
        sw.lap("launch");
        sleep(Duration::from_millis(10));
        sw.lap("navigate");

        let laps = sw.lap_times();
        assert_eq!(laps.len(), 2);
        assert_eq!(laps[1].0, "navigate");
        assert!(laps[1].1 >= Duration::from_millis(10));

        let formatted = sw.format();
        assert!(formatted.starts_with("launch: "));
        assert!(formatted.contains("\nTotal: "));
    }
}
