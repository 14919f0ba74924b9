//! Running latency averages

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use ph_core::MetricsSnapshot;

#[derive(Debug, Default, Clone, Copy)]
struct MetricsState {
    retrieval_count: u64,
    retrieval_total_ms: f64,
    generation_count: u64,
    generation_total_ms: f64,
}

/// Thread-safe tracker of retrieval and generation latency.
///
/// Count and total are updated together under one lock, so concurrent writers
/// never lose an update and readers never see a count without its duration.
#[derive(Debug, Default)]
pub struct MetricsTracker {
    state: Mutex<MetricsState>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // The state is plain counters, always consistent, so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, MetricsState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_retrieval(&self, duration_ms: f64) {
        let mut state = self.lock();
        state.retrieval_count += 1;
        state.retrieval_total_ms += duration_ms;
    }

    pub fn record_generation(&self, duration_ms: f64) {
        let mut state = self.lock();
        state.generation_count += 1;
        state.generation_total_ms += duration_ms;
    }

    /// Averages since creation or the last reset; zero when nothing was recorded
    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = *self.lock();
        MetricsSnapshot {
            avg_retrieval_latency_ms: mean(state.retrieval_total_ms, state.retrieval_count),
            avg_generation_latency_ms: mean(state.generation_total_ms, state.generation_count),
            retrieval_count: state.retrieval_count,
            generation_count: state.generation_count,
        }
    }

    pub fn reset(&self) {
        *self.lock() = MetricsState::default();
    }
}

fn mean(total: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

/// Milliseconds elapsed since `start`
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_fresh_tracker_reports_zero() {
        let snapshot = MetricsTracker::new().snapshot();
        assert_eq!(snapshot, MetricsSnapshot::default());
        assert_eq!(snapshot.avg_retrieval_latency_ms, 0.0);
        assert!(!snapshot.avg_generation_latency_ms.is_nan());
    }

    #[test]
    fn test_averages() {
        let tracker = MetricsTracker::new();
        tracker.record_retrieval(2.0);
        tracker.record_retrieval(4.0);
        tracker.record_generation(10.0);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.retrieval_count, 2);
        assert_eq!(snapshot.avg_retrieval_latency_ms, 3.0);
        assert_eq!(snapshot.generation_count, 1);
        assert_eq!(snapshot.avg_generation_latency_ms, 10.0);
    }

    #[test]
    fn test_reset() {
        let tracker = MetricsTracker::new();
        tracker.record_generation(1.5);
        tracker.reset();
        assert_eq!(tracker.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let tracker = MetricsTracker::new();

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..1000 {
                        tracker.record_retrieval(1.0);
                        tracker.record_generation(2.0);
                    }
                });
            }
        });

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.retrieval_count, 8000);
        assert_eq!(snapshot.generation_count, 8000);
        assert_eq!(snapshot.avg_retrieval_latency_ms, 1.0);
        assert_eq!(snapshot.avg_generation_latency_ms, 2.0);
    }
}
