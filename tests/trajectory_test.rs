use tracklabel_rs::trajectory::{Ingest, to_percent, to_pixel};
use tracklabel_rs::{
    Behavior, BehaviorClassifier, ClassMap, DetectionBuilder, FrameSize, TrajectoryAggregator,
};

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;

fn detection(
    frame: u32,
    identity: Option<u64>,
    class_id: u32,
    cx: f64,
    cy: f64,
) -> tracklabel_rs::Detection {
    let mut builder = DetectionBuilder::new()
        .frame(frame)
        .class_id(class_id)
        .frame_size(WIDTH, HEIGHT)
        .xywh(cx, cy, 80.0, 160.0);
    if let Some(id) = identity {
        builder = builder.identity(id);
    }
    builder.build()
}

#[test]
fn test_coordinate_round_trip() {
    let frames = [FrameSize::new(WIDTH, HEIGHT), FrameSize::new(640, 480), FrameSize::new(1, 1)];
    for frame in frames {
        let (fw, fh) = (frame.width as f64, frame.height as f64);
        for i in 0..50 {
            let t = i as f64 / 50.0;
            let (cx, cy, w, h) = (fw * t, fh * (1.0 - t), fw * t / 3.0 + 0.5, fh * t / 7.0 + 0.25);
            let pct = to_percent(cx, cy, w, h, fw, fh);
            let [rx, ry, rw, rh] = to_pixel(&pct, fw, fh);
            let tol = 1e-9 * fw.max(fh).max(1.0);
            assert!((rx - cx).abs() < tol);
            assert!((ry - cy).abs() < tol);
            assert!((rw - w).abs() < tol);
            assert!((rh - h).abs() < tol);
        }
    }
}

#[test]
fn test_monotonic_samples() {
    let map = ClassMap::coco_traffic();
    let mut aggregator = TrajectoryAggregator::new(Some(&map), 30.0);
    for frame in 0..40u32 {
        let mut batch = vec![detection(frame, Some(1), 0, 100.0 + frame as f64, 500.0)];
        if frame % 3 == 0 {
            batch.push(detection(frame, Some(2), 2, 900.0, 500.0 - frame as f64));
        }
        if frame % 5 == 0 {
            batch.push(detection(frame, None, 2, 10.0, 10.0));
        }
        aggregator.push_frame(batch);
    }

    let aggregation = aggregator.finish();
    assert_eq!(aggregation.trajectories.len(), 2);
    for trajectory in &aggregation.trajectories {
        assert!(!trajectory.samples.is_empty());
        for pair in trajectory.samples.windows(2) {
            assert!(pair[0].frame_index < pair[1].frame_index);
        }
    }
    assert_eq!(aggregation.stats.untracked, 8);
}

#[test]
fn test_first_label_wins() {
    let map: ClassMap = [(3, "Car"), (7, "Truck")].into_iter().collect();
    let mut aggregator = TrajectoryAggregator::new(Some(&map), 25.0);
    for (frame, class_id) in [3, 3, 7, 3].into_iter().enumerate() {
        let outcome = aggregator.push(detection(frame as u32, Some(42), class_id, 500.0, 500.0));
        assert!(outcome.is_kept());
    }

    let aggregation = aggregator.finish();
    let trajectory = &aggregation.trajectories[0];
    assert_eq!(trajectory.class_id, 3);
    assert_eq!(trajectory.class_label.as_deref(), Some("Car"));
    assert_eq!(trajectory.samples.len(), 4);
}

#[test]
fn test_static_on_zero_span() {
    let classifier = BehaviorClassifier::new(0.0);

    let mut aggregator = TrajectoryAggregator::new(None, 30.0);
    aggregator.push(detection(5, Some(1), 0, 10.0, 10.0));
    let single = aggregator.finish().trajectories.remove(0);
    assert_eq!(classifier.classify(&single), Behavior::Static);

    let mut twin = single.clone();
    let mut moved = twin.samples[0];
    moved.x += 60.0;
    moved.y += 30.0;
    twin.samples.push(moved);
    assert_eq!(twin.frame_span(), 0);
    assert_eq!(classifier.classify(&twin), Behavior::Static);
}

#[test]
fn test_threshold_boundary() {
    // Endpoints (0, 0) and (5, 0) in percent space over a 10-frame span.
    let frame = FrameSize::new(100, 100);
    let start = DetectionBuilder::new()
        .frame(0)
        .identity(1)
        .frame_size(frame.width, frame.height)
        .tlwh(0.0, 0.0, 10.0, 10.0)
        .build();
    let end = DetectionBuilder::new()
        .frame(10)
        .identity(1)
        .frame_size(frame.width, frame.height)
        .tlwh(5.0, 0.0, 10.0, 10.0)
        .build();

    let mut aggregator = TrajectoryAggregator::new(None, 30.0);
    assert_eq!(aggregator.push(start), Ingest::Started);
    assert_eq!(aggregator.push(end), Ingest::Appended);
    let trajectory = aggregator.finish().trajectories.remove(0);

    let motion = BehaviorClassifier::new(1.0).measure(&trajectory).unwrap();
    assert_eq!(motion.span, 10);
    assert!((motion.speed - 0.5).abs() < 1e-12);

    for (sensitivity, expected) in [
        (0.0, Behavior::Moving),
        (4.99, Behavior::Moving),
        (5.0, Behavior::Static),
        (5.01, Behavior::Static),
        (10.0, Behavior::Static),
    ] {
        let classifier = BehaviorClassifier::new(sensitivity);
        assert_eq!(
            classifier.classify(&trajectory),
            expected,
            "sensitivity {}",
            sensitivity
        );
    }
}

#[test]
fn test_unmapped_class_does_not_disturb_others() {
    let map = ClassMap::coco_traffic();
    let mut aggregator = TrajectoryAggregator::new(Some(&map), 30.0);
    aggregator.push_frame(vec![
        detection(0, Some(1), 0, 100.0, 100.0),
        detection(0, Some(2), 56, 300.0, 300.0),
    ]);
    aggregator.push_frame(vec![
        detection(1, Some(2), 56, 310.0, 300.0),
        detection(1, Some(1), 0, 110.0, 100.0),
    ]);

    let aggregation = aggregator.finish();
    assert_eq!(aggregation.trajectories.len(), 1);
    assert_eq!(aggregation.trajectories[0].identity, 1);
    assert_eq!(aggregation.trajectories[0].samples.len(), 2);
    assert_eq!(aggregation.stats.unmapped_class, 2);
}
