use dynamic_grid::{
    Axes, DragConfig, DragController, ItemSettings, ItemSnapshot, JsonLinesSink, Layout, LayoutError,
    LayoutMode, LayoutSettings, Logger, MoveOutcome, MoveRejection,
};

fn board() -> LayoutSettings {
    LayoutSettings::fixed(85.0, 85.0, 5.0, 10, 10).with_visible_width(1000.0)
}

#[test]
fn unpositioned_item_lands_beside_pinned_one() {
    let settings = board()
        .with_item(ItemSettings::placed("a", 1, 1, 2, 2))
        .with_item(ItemSettings::unplaced("b", 5, 2));
    let layout = Layout::create(&settings).unwrap();

    let a = layout.item("a").unwrap();
    let b = layout.item("b").unwrap();
    assert_eq!((b.start_column(), b.start_row()), (3, 1));
    assert!(!a.has_collision(b));

    let span = layout.span_of(a);
    assert_eq!(span.width, 175.0);
    assert_eq!(span.x, 0.0);
    assert!(layout.span_of(b).right() <= layout.width_of_visible_area());
}

#[test]
fn responsive_mode_from_json() {
    let raw = r#"{
        "mode": "horizontallyResponsive",
        "sliceHeight": 85,
        "gap": 5,
        "totalColumns": 10,
        "totalRows": 10,
        "availableWidth": 500,
        "widthOfVisibleArea": 500
    }"#;
    let layout = Layout::create(&LayoutSettings::from_json(raw).unwrap()).unwrap();
    assert_eq!(layout.mode(), LayoutMode::HorizontallyResponsive);
    assert_eq!(layout.slice_width(), 50.0);
    assert_eq!(layout.width(), 550.0);
}

#[test]
fn fixed_mode_without_width_is_a_configuration_error() {
    let raw = r#"{
        "mode": "fixed",
        "sliceHeight": 85,
        "gap": 5,
        "totalColumns": 10,
        "totalRows": 10,
        "widthOfVisibleArea": 900
    }"#;
    let settings = LayoutSettings::from_json(raw).unwrap();
    let err = Layout::create(&settings).unwrap_err();
    assert!(matches!(err, LayoutError::MissingSliceWidth));
    assert_eq!(
        err.to_string(),
        "fixed layout requires a non-zero slice width"
    );
}

#[test]
fn pinned_overlaps_are_accepted_at_creation() {
    let settings = board()
        .with_item(ItemSettings::placed("a", 1, 1, 2, 2))
        .with_item(ItemSettings::placed("b", 2, 2, 2, 2));
    let layout = Layout::create(&settings).unwrap();
    assert_eq!(layout.len(), 2);
}

#[test]
fn duplicate_ids_keep_the_first_definition() {
    let settings = board()
        .with_item(ItemSettings::placed("a", 3, 3, 1, 1))
        .with_item(ItemSettings::placed("a", 1, 1, 2, 2))
        .with_item(ItemSettings::unplaced("a", 4, 4));
    let layout = Layout::create(&settings).unwrap();
    assert_eq!(layout.len(), 1);
    assert_eq!(layout.item("a").unwrap().start_column(), 3);
}

#[test]
fn moving_into_a_neighbour_is_a_no_op() {
    let layout = Layout::create(
        &board()
            .with_item(ItemSettings::placed("a", 1, 1, 2, 2))
            .with_item(ItemSettings::placed("b", 3, 1, 2, 2)),
    )
    .unwrap();
    let a = layout.item("a").unwrap().clone();

    let outcome = layout.try_move_item(
        &a,
        Axes::new(90.0, 0.0),
        Axes::zero(),
        Axes::zero(),
        Axes::zero(),
    );
    assert_eq!(
        outcome,
        MoveOutcome::Rejected(MoveRejection::Collision {
            with: "b".to_string()
        })
    );

    let unchanged = layout.move_item(
        &a,
        Axes::new(0.0, -90.0),
        Axes::zero(),
        Axes::zero(),
        Axes::zero(),
    );
    assert_eq!(unchanged, layout);
}

#[test]
fn extent_grows_with_moves_and_shrinks_after_reflow() {
    let layout = Layout::create(&board().with_item(ItemSettings::placed("a", 1, 1, 1, 1))).unwrap();
    let a = layout.item("a").unwrap().clone();
    let far = layout.move_item(
        &a,
        Axes::new(900.0, 1080.0),
        Axes::zero(),
        Axes::zero(),
        Axes::zero(),
    );
    assert_eq!(far.item("a").unwrap().start_column(), 11);
    assert_eq!(far.total_columns(), 14);
    assert_eq!(far.total_rows(), 16);

    let compacted = far.apply_auto_position();
    assert_eq!(compacted.total_columns(), 10);
    assert_eq!(compacted.total_rows(), 10);
}

#[test]
fn snapshot_survives_json_persistence() {
    let layout = Layout::create(
        &board()
            .with_item(ItemSettings::unplaced("chart", 4, 2))
            .with_item(ItemSettings::unplaced("table", 6, 3))
            .with_item(ItemSettings::unplaced("kpi", 2, 1)),
    )
    .unwrap();

    let stored = serde_json::to_string(&layout.to_object()).unwrap();
    let restored = board().with_items(serde_json::from_str::<Vec<ItemSnapshot>>(&stored).unwrap());
    let rebuilt = Layout::create(&restored).unwrap();
    assert_eq!(rebuilt.to_object(), layout.to_object());
    assert_eq!(rebuilt.fingerprint(), layout.fingerprint());
}

#[test]
fn drag_session_emits_json_lines() {
    let sink = std::sync::Arc::new(JsonLinesSink::new(Vec::<u8>::new()));
    let config = DragConfig::draggable().with_logger(Logger::shared(sink.clone()));
    let settings = board().with_item(ItemSettings::placed("a", 1, 1, 1, 1));
    let mut controller = DragController::from_settings(&settings, config).unwrap();

    controller
        .start_drag("a", Axes::new(40.0, 40.0), Axes::new(0.0, 300.0))
        .unwrap();
    // pointer still, viewport scrolled down by two rows
    assert!(controller.drag(Axes::new(40.0, 40.0), Axes::new(0.0, 480.0)));
    let snapshot = controller.end_drag().unwrap();
    assert_eq!(snapshot[0].start_row, 3);

    drop(controller);
    let sink = std::sync::Arc::try_unwrap(sink).ok().unwrap();
    let output = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let messages: Vec<String> = output
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["message"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(messages, ["drag.start", "drag.moved", "drag.end"]);
}
