//! Drag sessions over a [`Layout`].
//!
//! The controller keeps the latest committed layout and at most one active
//! drag. Every drag sample is measured against the samples captured at drag
//! start and applied to the item as it was at drag start, so rounding never
//! accumulates across samples. Calls must be serialized by the caller.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::{LayoutError, Result};
use crate::geometry::Axes;
use crate::layout::{Item, Layout, LayoutSnapshot, MoveOutcome, MoveRejection};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::DragMetrics;
use crate::settings::{ItemSettings, LayoutSettings};

/// Configuration knobs for the drag controller.
#[derive(Debug, Clone)]
pub struct DragConfig {
    /// Drags are ignored unless enabled.
    pub allow_drag: bool,
    /// Optional structured logger for drag lifecycle events.
    pub logger: Option<Logger>,
    /// Counters shared with whoever holds the handle.
    pub metrics: Option<Arc<Mutex<DragMetrics>>>,
    /// Target field used on emitted events.
    pub log_target: String,
    /// Log every rejected sample. Off by default since pointer moves are frequent.
    pub log_rejections: bool,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            allow_drag: false,
            logger: None,
            metrics: None,
            log_target: "dynamic_grid::drag".to_string(),
            log_rejections: false,
        }
    }
}

impl DragConfig {
    pub fn draggable() -> Self {
        Self {
            allow_drag: true,
            ..Self::default()
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn log_rejections(mut self, enabled: bool) -> Self {
        self.log_rejections = enabled;
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(DragMetrics::new())));
        }
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<DragMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// State captured when a drag begins.
#[derive(Debug, Clone)]
pub struct DragSession {
    item: Item,
    origin_mouse: Axes,
    origin_scroll: Axes,
    layout_at_start: Layout,
}

impl DragSession {
    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn origin_mouse(&self) -> Axes {
        self.origin_mouse
    }

    pub fn origin_scroll(&self) -> Axes {
        self.origin_scroll
    }
}

#[derive(Debug)]
pub struct DragController {
    layout: Layout,
    config: DragConfig,
    session: Option<DragSession>,
}

impl DragController {
    pub fn new(layout: Layout, config: DragConfig) -> Self {
        Self {
            layout,
            config,
            session: None,
        }
    }

    pub fn from_settings(settings: &LayoutSettings, config: DragConfig) -> Result<Self> {
        Ok(Self::new(Layout::create(settings)?, config))
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut DragConfig {
        &mut self.config
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Begin dragging `id`. Returns `false` when dragging is disabled.
    ///
    /// A session already in progress is replaced; its moves stay committed.
    pub fn start_drag(&mut self, id: &str, mouse: Axes, scroll: Axes) -> Result<bool> {
        if !self.config.allow_drag {
            return Ok(false);
        }
        let item = self
            .layout
            .item(id)
            .cloned()
            .ok_or_else(|| LayoutError::ItemNotFound(id.to_string()))?;

        self.emit(
            LogLevel::Info,
            "drag.start",
            [
                json_kv("item", id),
                json_kv("start_column", item.start_column()),
                json_kv("start_row", item.start_row()),
            ],
        );
        self.with_metrics(|metrics| metrics.record_start());
        self.session = Some(DragSession {
            item,
            origin_mouse: mouse,
            origin_scroll: scroll,
            layout_at_start: self.layout.clone(),
        });
        Ok(true)
    }

    /// Feed a pointer/scroll sample. Returns `true` when the layout changed.
    pub fn drag(&mut self, mouse: Axes, scroll: Axes) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };

        let outcome = self.layout.try_move_item(
            &session.item,
            mouse,
            session.origin_mouse,
            scroll,
            session.origin_scroll,
        );
        let id = session.item.id().to_string();

        match outcome {
            MoveOutcome::Moved(next) => {
                if let Some(item) = next.item(&id) {
                    self.emit(
                        LogLevel::Debug,
                        "drag.moved",
                        [
                            json_kv("item", id.as_str()),
                            json_kv("start_column", item.start_column()),
                            json_kv("start_row", item.start_row()),
                        ],
                    );
                }
                self.with_metrics(|metrics| metrics.record_move());
                self.layout = next;
                true
            }
            MoveOutcome::Unchanged => false,
            MoveOutcome::Rejected(rejection) => {
                if self.config.log_rejections {
                    self.emit(
                        LogLevel::Debug,
                        "drag.rejected",
                        rejection_fields(&id, &rejection),
                    );
                }
                self.with_metrics(|metrics| metrics.record_rejection(&rejection));
                false
            }
        }
    }

    /// Finish the drag, returning the snapshot to hand to the collaborator.
    pub fn end_drag(&mut self) -> Option<LayoutSnapshot> {
        let session = self.session.take()?;
        let changed = session.layout_at_start.fingerprint() != self.layout.fingerprint();
        self.emit(
            LogLevel::Info,
            "drag.end",
            [
                json_kv("item", session.item.id()),
                json_kv("changed", changed),
            ],
        );
        self.with_metrics(|metrics| metrics.record_commit());
        Some(self.layout.to_object())
    }

    /// Abandon the drag and restore the layout from drag start.
    pub fn cancel_drag(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        self.emit(
            LogLevel::Info,
            "drag.cancel",
            [json_kv("item", session.item.id())],
        );
        self.with_metrics(|metrics| metrics.record_cancel());
        self.layout = session.layout_at_start;
        true
    }

    /// Reflow every item toward the top-left. Ends any drag in progress.
    pub fn apply_auto_position(&mut self) -> LayoutSnapshot {
        self.session = None;
        self.layout = self.layout.apply_auto_position();
        self.emit(
            LogLevel::Info,
            "layout.reflow",
            [json_kv("items", self.layout.len())],
        );
        self.with_metrics(|metrics| metrics.record_reflow());
        self.layout.to_object()
    }

    /// Add an item; `false` when the id already exists or the footprint is invalid.
    pub fn add_item(&mut self, definition: ItemSettings) -> bool {
        let next = self.layout.add_item(definition);
        let added = next.len() != self.layout.len();
        self.layout = next;
        added
    }

    /// Rebuild from new settings, dropping any drag in progress.
    pub fn replace_settings(&mut self, settings: &LayoutSettings) -> Result<()> {
        self.layout = Layout::create(settings)?;
        self.session = None;
        Ok(())
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        fields: impl IntoIterator<Item = (String, Value)>,
    ) {
        if let Some(logger) = &self.config.logger {
            let event = event_with_fields(level, &self.config.log_target, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn with_metrics(&self, record: impl FnOnce(&mut DragMetrics)) {
        if let Some(metrics) = &self.config.metrics {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }
}

fn rejection_fields(id: &str, rejection: &MoveRejection) -> Vec<(String, Value)> {
    let mut fields = vec![json_kv("item", id)];
    match rejection {
        MoveRejection::UnknownItem(_) => fields.push(json_kv("reason", "unknown_item")),
        MoveRejection::OutOfBounds {
            start_column,
            start_row,
        } => {
            fields.push(json_kv("reason", "out_of_bounds"));
            fields.push(json_kv("start_column", *start_column));
            fields.push(json_kv("start_row", *start_row));
        }
        MoveRejection::Collision { with } => {
            fields.push(json_kv("reason", "collision"));
            fields.push(json_kv("with", with.as_str()));
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;

    fn controller(config: DragConfig) -> DragController {
        let settings = LayoutSettings::fixed(85.0, 85.0, 5.0, 10, 10)
            .with_visible_width(1000.0)
            .with_item(ItemSettings::placed("a", 1, 1, 1, 1))
            .with_item(ItemSettings::placed("b", 4, 1, 1, 1));
        DragController::from_settings(&settings, config).unwrap()
    }

    fn origin_of(controller: &DragController, id: &str) -> (u32, u32) {
        let item = controller.layout().item(id).unwrap();
        (item.start_column(), item.start_row())
    }

    #[test]
    fn disabled_drag_is_ignored() {
        let mut controller = controller(DragConfig::default());
        assert!(!controller.start_drag("a", Axes::zero(), Axes::zero()).unwrap());
        assert!(!controller.drag(Axes::new(90.0, 0.0), Axes::zero()));
        assert!(controller.end_drag().is_none());
    }

    #[test]
    fn unknown_item_cannot_start() {
        let mut controller = controller(DragConfig::draggable());
        let err = controller
            .start_drag("missing", Axes::zero(), Axes::zero())
            .unwrap_err();
        assert!(matches!(err, LayoutError::ItemNotFound(ref id) if id == "missing"));
    }

    #[test]
    fn deltas_are_measured_from_drag_start() {
        let mut controller = controller(DragConfig::draggable());
        controller
            .start_drag("a", Axes::new(10.0, 10.0), Axes::zero())
            .unwrap();

        assert!(controller.drag(Axes::new(100.0, 10.0), Axes::zero()));
        assert_eq!(origin_of(&controller, "a"), (2, 1));

        // same cell as the previous sample
        assert!(!controller.drag(Axes::new(110.0, 20.0), Axes::zero()));

        // back over the start position
        assert!(controller.drag(Axes::new(10.0, 10.0), Axes::zero()));
        assert_eq!(origin_of(&controller, "a"), (1, 1));
    }

    #[test]
    fn blocked_sample_keeps_last_accepted_position() {
        let mut controller = controller(DragConfig::draggable());
        controller.start_drag("a", Axes::zero(), Axes::zero()).unwrap();
        assert!(controller.drag(Axes::new(180.0, 0.0), Axes::zero()));
        assert!(!controller.drag(Axes::new(270.0, 0.0), Axes::zero()));
        assert_eq!(origin_of(&controller, "a"), (3, 1));

        let snapshot = controller.end_drag().unwrap();
        assert_eq!(snapshot[0].start_column, 3);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn cancel_restores_layout_from_drag_start() {
        let mut controller = controller(DragConfig::draggable());
        let before = controller.layout().clone();
        controller.start_drag("a", Axes::zero(), Axes::zero()).unwrap();
        controller.drag(Axes::new(90.0, 90.0), Axes::zero());
        assert!(controller.cancel_drag());
        assert_eq!(controller.layout(), &before);
        assert!(!controller.cancel_drag());
    }

    #[test]
    fn lifecycle_is_logged_and_counted() {
        let sink = Arc::new(MemorySink::new());
        let mut config = DragConfig::draggable()
            .with_logger(Logger::shared(sink.clone()))
            .log_rejections(true);
        config.enable_metrics();
        let metrics = config.metrics_handle().unwrap();
        let mut controller = controller(config);

        controller.start_drag("a", Axes::zero(), Axes::zero()).unwrap();
        controller.drag(Axes::new(-90.0, 0.0), Axes::zero());
        controller.drag(Axes::new(270.0, 0.0), Axes::zero());
        controller.drag(Axes::new(90.0, 0.0), Axes::zero());
        controller.end_drag();
        controller.apply_auto_position();

        assert_eq!(
            sink.messages(),
            [
                "drag.start",
                "drag.rejected",
                "drag.rejected",
                "drag.moved",
                "drag.end",
                "layout.reflow"
            ]
        );
        let snapshot = metrics.lock().unwrap().snapshot();
        assert_eq!(snapshot.drag_starts, 1);
        assert_eq!(snapshot.rejected_out_of_bounds, 1);
        assert_eq!(snapshot.rejected_collisions, 1);
        assert_eq!(snapshot.moves_accepted, 1);
        assert_eq!(snapshot.commits, 1);
        assert_eq!(snapshot.reflows, 1);
    }

    #[test]
    fn add_item_reports_whether_it_landed() {
        let mut controller = controller(DragConfig::default());
        assert!(controller.add_item(ItemSettings::unplaced("c", 2, 1)));
        assert!(!controller.add_item(ItemSettings::unplaced("c", 2, 1)));
        assert_eq!(origin_of(&controller, "c"), (2, 1));
    }

    #[test]
    fn replace_settings_drops_session() {
        let mut controller = controller(DragConfig::draggable());
        controller.start_drag("a", Axes::zero(), Axes::zero()).unwrap();
        let settings = LayoutSettings::fixed(50.0, 50.0, 0.0, 4, 4);
        controller.replace_settings(&settings).unwrap();
        assert!(!controller.is_dragging());
        assert!(controller.layout().is_empty());
    }
}
