use image::{Rgb, RgbImage};

use lots_o_hats::config::PlacementConfig;
use lots_o_hats::overlay::cycle::select_placement;
use lots_o_hats::overlay::{paste_overlay, scale_overlay};
use lots_o_hats::{Canvas, DetectionFeed, OverlayAsset, OverlayConfig, OverlayContext, PixelRect};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// 100 columns by 160 rows of white.
fn white_hat() -> RgbImage {
    RgbImage::from_pixel(100, 160, WHITE)
}

#[test]
fn hat_lands_above_a_centred_roi() {
    for translate_y in [0.0, 0.75] {
        let mut canvas = Canvas::blank(1000, 1000);
        let roi = PixelRect::new(200, 200, 300, 300);

        assert!(paste_overlay(&white_hat(), &roi, 0.0, translate_y, &mut canvas));

        assert_eq!(canvas.pixel(250, 200), Some(&WHITE), "translate_y={translate_y}");
    }
}

#[test]
fn hat_clipped_at_the_top_edge() {
    for translate_y in [0.0, 0.75] {
        let mut canvas = Canvas::blank(1000, 1000);
        let roi = PixelRect::new(900, 0, 990, 100);

        assert!(paste_overlay(&white_hat(), &roi, 0.0, translate_y, &mut canvas));

        assert_eq!(canvas.pixel(945, 10), Some(&WHITE), "translate_y={translate_y}");
    }
}

#[test]
fn scaling_keeps_aspect_ratio() {
    let asset = OverlayAsset::new(0, white_hat());
    let scaled = scale_overlay(&asset, 100, 1.5).expect("scale");
    assert_eq!(scaled.dimensions(), (150, 240));
}

#[test]
fn parameters_cycle_independently() {
    let assets = vec![
        OverlayAsset::new(0, white_hat()),
        OverlayAsset::new(1, white_hat()),
    ];
    let single = PlacementConfig {
        scale_x: vec![1.5],
        ..PlacementConfig::default()
    };
    for j in 0..3 {
        let params = select_placement(j, &single, &assets).expect("params");
        assert_eq!(params.scale_x, 1.5);
    }

    let paired = PlacementConfig {
        scale_x: vec![1.5, 0.5],
        translate_x_pct: vec![0.1, 0.2, 0.3],
        translate_y_pct: vec![0.75],
    };
    let picks: Vec<_> = (0..4)
        .map(|j| {
            let p = select_placement(j, &paired, &assets).expect("params");
            (p.asset.index, p.scale_x, p.translate_x_pct)
        })
        .collect();
    assert_eq!(
        picks,
        vec![(0, 1.5, 0.1), (1, 0.5, 0.2), (0, 1.5, 0.3), (1, 0.5, 0.1)]
    );
}

#[test]
fn overlay_adds_onto_existing_pixels() {
    let mut canvas = Canvas::new(RgbImage::from_pixel(1000, 1000, Rgb([100, 30, 0])));
    let hat = RgbImage::from_pixel(100, 160, Rgb([100, 240, 7]));
    let roi = PixelRect::new(200, 200, 300, 300);

    assert!(paste_overlay(&hat, &roi, 0.0, 0.0, &mut canvas));

    assert_eq!(canvas.pixel(250, 200), Some(&Rgb([200, 255, 7])));
    assert_eq!(canvas.pixel(250, 400), Some(&Rgb([100, 30, 0])));
}

#[test]
fn identical_inputs_produce_identical_canvases() {
    let ctx = OverlayContext::new(
        PlacementConfig {
            scale_x: vec![1.5, 0.8],
            translate_x_pct: vec![0.0, 0.1],
            translate_y_pct: vec![0.75],
        },
        vec![
            OverlayAsset::new(0, white_hat()),
            OverlayAsset::new(
                1,
                RgbImage::from_fn(37, 23, |x, y| Rgb([x as u8 * 5, y as u8 * 9, 3])),
            ),
        ],
    );
    let feed = DetectionFeed::new(vec![
        0.0, 1.0, 0.97, 0.125, 0.25, 0.375, 0.5, //
        0.0, 1.0, 0.51, 0.5, 0.0, 0.75, 0.125, //
        0.0, 1.0, 0.2, 0.0, 0.0, 1.0, 1.0, //
        0.0, 1.0, 0.9, 0.875, 0.75, 1.0, 1.0,
    ]);

    let mut first = Canvas::blank(640, 480);
    let mut second = Canvas::blank(640, 480);
    let report = ctx.apply(&feed, &mut first).expect("first pass");
    ctx.apply(&feed, &mut second).expect("second pass");

    assert_eq!(report.accepted, 3);
    assert_eq!(first.image().as_raw(), second.image().as_raw());
    assert_ne!(first, Canvas::blank(640, 480));
}

#[test]
fn configured_assets_flow_through_a_pass() {
    let dir = tempfile::tempdir().expect("temp dir");
    white_hat()
        .save(dir.path().join("crown.png"))
        .expect("save hat");
    let config_path = dir.path().join("crown.json");
    std::fs::write(
        &config_path,
        r#"{"accessories": ["crown.png"], "scaleX": 1.0, "translateYPct": 0.0}"#,
    )
    .expect("write config");

    let config = OverlayConfig::load(&config_path).expect("load config");
    let ctx = OverlayContext::from_config(&config).expect("load assets");
    let mut canvas = Canvas::blank(800, 800);
    // ROI (200,200)-(300,300)
    let feed = DetectionFeed::new(vec![0.0, 1.0, 0.99, 0.25, 0.25, 0.375, 0.375]);

    let report = ctx.apply(&feed, &mut canvas).expect("pass");

    assert_eq!(report.composited, 1);
    assert_eq!(canvas.pixel(250, 199), Some(&WHITE));
    assert_eq!(canvas.pixel(250, 310), Some(&Rgb([0, 0, 0])));
}

#[test]
fn extreme_tuning_from_config_places_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    white_hat()
        .save(dir.path().join("a.png"))
        .expect("save hat");
    let config_path = dir.path().join("far.json");
    std::fs::write(
        &config_path,
        r#"{"accessories": ["a.png"], "translateXPct": [1e12], "scaleX": [1e12, 1.0]}"#,
    )
    .expect("write config");

    let config = OverlayConfig::load(&config_path).expect("load config");
    let ctx = OverlayContext::from_config(&config).expect("load assets");
    let mut canvas = Canvas::blank(800, 800);
    let feed = DetectionFeed::new(vec![
        0.0, 1.0, 0.99, 0.25, 0.25, 0.375, 0.375, //
        0.0, 1.0, 0.99, 0.5, 0.5, 0.625, 0.625,
    ]);

    let report = ctx.apply(&feed, &mut canvas).expect("pass");

    assert_eq!(report.accepted, 2);
    assert_eq!(report.composited, 0);
    assert_eq!(canvas, Canvas::blank(800, 800));
}
