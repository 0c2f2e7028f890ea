//! Per-session counters with periodic snapshot emission through the logger.

use std::time::Duration;

use serde_json::json;

use crate::logging::{LogEvent, LogLevel, event_with_fields, json_kv};

#[derive(Debug, Default, Clone)]
pub struct SessionMetrics {
    chunks: u64,
    frames: u64,
    redraws: u64,
    focus_changes: u64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// One chunk handed to the input router.
    pub fn record_chunk(&mut self) {
        self.chunks = self.chunks.saturating_add(1);
    }

    /// One draw-loop wakeup, whether or not anything was written.
    pub fn record_frame(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    /// One widget line actually sent to the channel.
    pub fn record_redraw(&mut self) {
        self.redraws = self.redraws.saturating_add(1);
    }

    pub fn record_focus_change(&mut self) {
        self.focus_changes = self.focus_changes.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            chunks: self.chunks,
            frames: self.frames,
            redraws: self.redraws,
            focus_changes: self.focus_changes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub chunks: u64,
    pub frames: u64,
    pub redraws: u64,
    pub focus_changes: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        event_with_fields(
            LogLevel::Info,
            target,
            "session_metrics",
            [
                json_kv("uptime_ms", json!(self.uptime_ms)),
                json_kv("chunks", json!(self.chunks)),
                json_kv("frames", json!(self.frames)),
                json_kv("redraws", json!(self.redraws)),
                json_kv("focus_changes", json!(self.focus_changes)),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_into_snapshots() {
        let mut metrics = SessionMetrics::new();
        metrics.record_chunk();
        metrics.record_chunk();
        metrics.record_frame();
        metrics.record_redraw();
        metrics.record_focus_change();

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.uptime_ms, 1500);
        assert_eq!(snapshot.chunks, 2);
        assert_eq!(snapshot.frames, 1);
        assert_eq!(snapshot.redraws, 1);
        assert_eq!(snapshot.focus_changes, 1);

        let event = snapshot.to_log_event("foyer::session.metrics");
        assert_eq!(event.message, "session_metrics");
        assert_eq!(event.fields.get("chunks"), Some(&json!(2)));
    }
}
