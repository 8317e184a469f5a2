use crate::layout::MoveRejection;
use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

#[derive(Debug, Default, Clone)]
pub struct DragMetrics {
    drag_starts: u64,
    moves_accepted: u64,
    rejected_out_of_bounds: u64,
    rejected_collisions: u64,
    rejected_unknown: u64,
    commits: u64,
    cancels: u64,
    reflows: u64,
}

impl DragMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_start(&mut self) {
        self.drag_starts = self.drag_starts.saturating_add(1);
    }

    pub fn record_move(&mut self) {
        self.moves_accepted = self.moves_accepted.saturating_add(1);
    }

    pub fn record_rejection(&mut self, rejection: &MoveRejection) {
        match rejection {
            MoveRejection::OutOfBounds { .. } => {
                self.rejected_out_of_bounds = self.rejected_out_of_bounds.saturating_add(1);
            }
            MoveRejection::Collision { .. } => {
                self.rejected_collisions = self.rejected_collisions.saturating_add(1);
            }
            MoveRejection::UnknownItem(_) => {
                self.rejected_unknown = self.rejected_unknown.saturating_add(1);
            }
        }
    }

    pub fn record_commit(&mut self) {
        self.commits = self.commits.saturating_add(1);
    }

    pub fn record_cancel(&mut self) {
        self.cancels = self.cancels.saturating_add(1);
    }

    pub fn record_reflow(&mut self) {
        self.reflows = self.reflows.saturating_add(1);
    }

    pub fn snapshot(&self) -> DragMetricSnapshot {
        DragMetricSnapshot {
            drag_starts: self.drag_starts,
            moves_accepted: self.moves_accepted,
            rejected_out_of_bounds: self.rejected_out_of_bounds,
            rejected_collisions: self.rejected_collisions,
            rejected_unknown: self.rejected_unknown,
            commits: self.commits,
            cancels: self.cancels,
            reflows: self.reflows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragMetricSnapshot {
    pub drag_starts: u64,
    pub moves_accepted: u64,
    pub rejected_out_of_bounds: u64,
    pub rejected_collisions: u64,
    pub rejected_unknown: u64,
    pub commits: u64,
    pub cancels: u64,
    pub reflows: u64,
}

impl DragMetricSnapshot {
    pub fn moves_rejected(&self) -> u64 {
        self.rejected_out_of_bounds
            .saturating_add(self.rejected_collisions)
            .saturating_add(self.rejected_unknown)
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "drag_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("drag_starts".to_string(), json!(self.drag_starts));
        map.insert("moves_accepted".to_string(), json!(self.moves_accepted));
        map.insert(
            "rejected_out_of_bounds".to_string(),
            json!(self.rejected_out_of_bounds),
        );
        map.insert(
            "rejected_collisions".to_string(),
            json!(self.rejected_collisions),
        );
        map.insert("rejected_unknown".to_string(), json!(self.rejected_unknown));
        map.insert("commits".to_string(), json!(self.commits));
        map.insert("cancels".to_string(), json!(self.cancels));
        map.insert("reflows".to_string(), json!(self.reflows));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_split_by_reason() {
        let mut metrics = DragMetrics::new();
        metrics.record_rejection(&MoveRejection::OutOfBounds {
            start_column: 0,
            start_row: 1,
        });
        metrics.record_rejection(&MoveRejection::Collision {
            with: "b".to_string(),
        });
        metrics.record_move();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.rejected_out_of_bounds, 1);
        assert_eq!(snapshot.rejected_collisions, 1);
        assert_eq!(snapshot.moves_rejected(), 2);
        assert_eq!(snapshot.moves_accepted, 1);
    }

    #[test]
    fn snapshot_log_event_carries_counters() {
        let mut metrics = DragMetrics::new();
        metrics.record_start();
        metrics.record_commit();
        let event = metrics.snapshot().to_log_event("dynamic_grid::drag.metrics");
        assert_eq!(event.message, "drag_metrics");
        assert_eq!(event.field("drag_starts"), Some(&json!(1)));
        assert_eq!(event.field("commits"), Some(&json!(1)));
        assert_eq!(event.field("reflows"), Some(&json!(0)));
    }
}
