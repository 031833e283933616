use std::sync::mpsc;
use std::time::Duration;

use image::{Rgb, RgbImage};

use lots_o_hats::config::PlacementConfig;
use lots_o_hats::{
    FrameSource, HeadlessDisplay, LiveConfig, LiveSource, OverlayAsset, OverlayContext,
    OverlayError, ReplayBackend, SourceId, StreamDriver, StreamMode,
};

fn context() -> OverlayContext {
    let hat = OverlayAsset::new(0, RgbImage::from_pixel(10, 16, Rgb([0, 200, 0])));
    OverlayContext::new(PlacementConfig::default(), vec![hat])
}

fn detector() -> ReplayBackend {
    ReplayBackend::from_values(vec![
        0.0, 1.0, 0.95, 0.25, 0.5, 0.5, 0.75, //
        0.0, 1.0, 0.3, 0.0, 0.0, 0.5, 0.5,
    ])
}

fn synthetic(frame_limit: Option<u64>) -> FrameSource {
    let config = LiveConfig {
        frame_limit,
        ..LiveConfig::synthetic("front", 64, 48)
    };
    FrameSource::Live(LiveSource::new(config).expect("synthetic source"))
}

#[test]
fn live_run_stops_on_cancel_signal() {
    let ctx = context();
    let mut detector = detector();
    let (tx, rx) = mpsc::channel();
    let mut display = HeadlessDisplay::from_receiver(rx);
    tx.send(()).expect("send cancel");

    let summary = StreamDriver::new(&ctx, &mut detector, &mut display, synthetic(None))
        .with_frame_interval(Duration::from_millis(1))
        .run()
        .expect("run");

    assert_eq!(summary.frames, 1);
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.composited, 1);
    assert_eq!(display.frames_shown(), 1);
    drop(tx);
}

#[test]
fn closed_device_is_fatal() {
    let ctx = context();
    let mut detector = detector();
    let (tx, rx) = mpsc::channel::<()>();
    let mut display = HeadlessDisplay::from_receiver(rx);

    let result = StreamDriver::new(&ctx, &mut detector, &mut display, synthetic(Some(4)))
        .with_frame_interval(Duration::ZERO)
        .run();

    match result {
        Err(OverlayError::Capture { device, reason }) => {
            assert_eq!(device, "stub://front");
            assert_eq!(reason, "device closed");
        }
        other => panic!("expected capture error, got {other:?}"),
    }
    assert_eq!(display.frames_shown(), 4);
    assert_eq!(detector.calls(), 4);
    drop(tx);
}

#[test]
fn still_image_is_processed_once_and_snapshotted() {
    let dir = tempfile::tempdir().expect("temp dir");
    let frame_path = dir.path().join("party.png");
    let snapshot_path = dir.path().join("out.png");
    RgbImage::from_pixel(64, 48, Rgb([10, 10, 10]))
        .save(&frame_path)
        .expect("save frame");

    let ctx = context();
    let mut detector = detector();
    let (tx, rx) = mpsc::channel();
    let mut display = HeadlessDisplay::from_receiver(rx).with_snapshot(&snapshot_path);
    tx.send(()).expect("send cancel");

    let source = FrameSource::open(&SourceId::parse(frame_path.to_str().expect("utf-8")))
        .expect("open still");
    assert_eq!(source.mode(), StreamMode::Static);
    let summary = StreamDriver::new(&ctx, &mut detector, &mut display, source)
        .run()
        .expect("run");

    assert_eq!(summary.frames, 1);
    assert_eq!(detector.calls(), 1);

    // ROI (16,24)-(32,36); the 16x25 overlay hangs from row 36.
    let written = image::open(&snapshot_path).expect("decode").to_rgb8();
    assert_eq!(written.get_pixel(24, 30), &Rgb([10, 210, 10]));
    assert_eq!(written.get_pixel(24, 40), &Rgb([10, 10, 10]));
    drop(tx);
}

#[test]
fn missing_still_image_is_an_asset_error() {
    let ctx = context();
    let mut detector = detector();
    let (_tx, rx) = mpsc::channel();
    let mut display = HeadlessDisplay::from_receiver(rx);

    let source = FrameSource::open(&SourceId::parse("does/not/exist.png")).expect("open");
    let result = StreamDriver::new(&ctx, &mut detector, &mut display, source).run();

    assert!(matches!(result, Err(OverlayError::AssetRead { .. })));
    assert_eq!(display.frames_shown(), 0);
}
