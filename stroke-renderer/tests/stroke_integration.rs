//! End-to-end stroke rendering through the [`Canvas`] facade.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;
use stroke_core::{BrushSettings, PointerEvent, RawSample, Rgb, StrokeSummary, Tool, Transition};
use stroke_renderer::{Canvas, CanvasConfig, RenderError};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn line_brush() -> BrushSettings {
    BrushSettings {
        size: 10.0,
        spacing: 0.2,
        ..Default::default()
    }
}

fn canvas(width: u32, height: u32, settings: BrushSettings) -> Canvas {
    Canvas::seeded(
        CanvasConfig {
            width,
            height,
            background: Rgb::WHITE,
            settings,
        },
        7,
    )
    .unwrap()
}

#[test]
fn test_straight_line_end_to_end() {
    let mut c = canvas(200, 50, line_brush());

    assert_eq!(
        c.pointer_down(RawSample::new(0.0, 0.0)).unwrap(),
        Transition::Started
    );
    assert_eq!(
        c.pointer_move(RawSample::new(100.0, 0.0)).unwrap(),
        Transition::Continued { stamps: 50 }
    );
    assert_eq!(
        c.pointer_up(),
        Transition::Ended(StrokeSummary { stamps: 51 })
    );
    assert!(!c.is_drawing());

    let s = c.surface();
    for y in 0..=4 {
        for x in 0..=100 {
            assert_eq!(s.pixel(x, y), Some(BLACK), "pixel ({x}, {y})");
        }
    }
    for x in 0..200 {
        assert_eq!(s.pixel(x, 5), Some(WHITE), "row 5, x = {x}");
    }
    for y in 0..50 {
        for x in 105..200 {
            assert_eq!(s.pixel(x, y), Some(WHITE), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_tap_leaves_single_mark() {
    let mut c = canvas(40, 40, line_brush());
    c.pointer_down(RawSample::new(20.0, 20.0)).unwrap();
    assert_eq!(
        c.pointer_up(),
        Transition::Ended(StrokeSummary { stamps: 1 })
    );

    let s = c.surface();
    assert_eq!(s.pixel(20, 20), Some(BLACK));
    assert_eq!(s.pixel(26, 20), Some(WHITE));
    assert_eq!(s.pixel(20, 14), Some(WHITE));
}

#[test]
fn test_dense_samples_match_single_segment() {
    let mut whole = canvas(120, 20, line_brush());
    whole.pointer_down(RawSample::new(0.0, 10.0)).unwrap();
    whole.pointer_move(RawSample::new(100.0, 10.0)).unwrap();
    let whole_summary = whole.pointer_up();

    let mut dense = canvas(120, 20, line_brush());
    dense.pointer_down(RawSample::new(0.0, 10.0)).unwrap();
    for x in 1..=100u8 {
        dense
            .pointer_move(RawSample::new(f32::from(x), 10.0))
            .unwrap();
    }
    let dense_summary = dense.pointer_up();

    assert_eq!(whole_summary, dense_summary);
    assert_eq!(whole.surface(), dense.surface());
}

#[test]
fn test_events_dispatch_through_handle() {
    let mut c = canvas(60, 60, line_brush());
    let script = [
        PointerEvent::Move(RawSample::new(5.0, 5.0)),
        PointerEvent::Down(RawSample::new(10.0, 10.0)),
        PointerEvent::Move(RawSample::new(30.0, 10.0)),
        PointerEvent::Leave,
        PointerEvent::Up,
    ];
    let transitions: Vec<_> = script.iter().map(|e| c.handle(e).unwrap()).collect();

    assert_eq!(transitions[0], Transition::Ignored);
    assert_eq!(transitions[1], Transition::Started);
    assert_eq!(transitions[2], Transition::Continued { stamps: 10 });
    assert_eq!(transitions[3], Transition::Ended(StrokeSummary { stamps: 11 }));
    assert_eq!(transitions[4], Transition::Ignored);
    // Hover did not paint.
    assert_eq!(c.surface().pixel(5, 5), Some(WHITE));
}

#[test]
fn test_host_operations_refused_mid_stroke() {
    let mut c = canvas(30, 30, line_brush());
    let png = c.export_png_base64().unwrap();

    c.pointer_down(RawSample::new(15.0, 15.0)).unwrap();
    let before = c.surface().clone();

    assert!(matches!(
        c.import_base64(&png),
        Err(RenderError::StrokeInProgress("import"))
    ));
    assert!(matches!(
        c.clear(),
        Err(RenderError::StrokeInProgress("clear"))
    ));
    assert!(matches!(
        c.resize(10, 10),
        Err(RenderError::StrokeInProgress("resize"))
    ));
    assert_eq!(*c.surface(), before);
    // Export is always allowed and reflects the stroke so far.
    assert_ne!(c.export_png_base64().unwrap(), png);

    c.pointer_up();
    c.import_base64(&png).unwrap();
    assert!(c.surface().as_raw().chunks_exact(4).all(|p| p == WHITE));
}

#[test]
fn test_completion_callback_fires_per_stroke() {
    let mut c = canvas(50, 50, line_brush());
    let ended = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ended);
    c.set_on_stroke_end(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    for _ in 0..3 {
        c.pointer_down(RawSample::new(10.0, 10.0)).unwrap();
        c.pointer_move(RawSample::new(20.0, 20.0)).unwrap();
        c.pointer_up();
    }
    c.pointer_up();

    assert_eq!(ended.load(Ordering::SeqCst), 3);
}

#[test]
fn test_eraser_restores_background() {
    let mut c = canvas(80, 30, line_brush());
    c.pointer_down(RawSample::new(10.0, 15.0)).unwrap();
    c.pointer_move(RawSample::new(70.0, 15.0)).unwrap();
    c.pointer_up();
    assert_eq!(c.surface().pixel(40, 15), Some(BLACK));

    c.set_settings(BrushSettings {
        tool: Tool::Eraser,
        size: 20.0,
        ..line_brush()
    })
    .unwrap();
    c.pointer_down(RawSample::new(0.0, 15.0)).unwrap();
    c.pointer_move(RawSample::new(80.0, 15.0)).unwrap();
    c.pointer_up();

    assert!(c.surface().as_raw().chunks_exact(4).all(|p| p == WHITE));
}

#[test]
fn test_invalid_settings_keep_previous_brush() {
    let mut c = canvas(10, 10, line_brush());
    let err = c.set_settings(BrushSettings {
        size: 0.0,
        ..Default::default()
    });
    assert!(matches!(err, Err(RenderError::Stroke(_))));
    assert_eq!(*c.settings(), line_brush());
}

#[test]
fn test_origin_translates_samples() {
    let mut c = canvas(20, 20, line_brush());
    c.set_origin(100.0, 200.0);
    c.pointer_down(RawSample::new(110.0, 210.0)).unwrap();
    c.pointer_up();

    assert_eq!(c.surface().pixel(10, 10), Some(BLACK));
    assert_eq!(c.surface().pixel(0, 0), Some(WHITE));
}

#[test]
fn test_export_import_round_trip() {
    let mut source = canvas(64, 48, line_brush());
    source
        .set_settings(BrushSettings {
            color: Rgb::new(200, 40, 10),
            hardness: 0.4,
            opacity: 0.7,
            ..line_brush()
        })
        .unwrap();
    source.pointer_down(RawSample::new(5.0, 5.0)).unwrap();
    source.pointer_move(RawSample::new(60.0, 40.0)).unwrap();
    source.pointer_up();

    let uri = source.export_data_uri().unwrap();
    assert!(uri.starts_with("data:image/png;base64,"));

    let mut target = canvas(64, 48, line_brush());
    target.import_base64(&uri).unwrap();
    assert_eq!(target.surface(), source.surface());
}

#[test]
fn test_resize_then_draw() {
    let mut c = canvas(10, 10, line_brush());
    c.resize(30, 20).unwrap();
    assert_eq!((c.surface().width(), c.surface().height()), (30, 20));

    c.pointer_down(RawSample::new(25.0, 15.0)).unwrap();
    c.pointer_up();
    assert_eq!(c.surface().pixel(25, 15), Some(BLACK));

    c.clear().unwrap();
    assert_eq!(c.surface().pixel(25, 15), Some(WHITE));
}

proptest! {
    #[test]
    fn prop_surface_stays_opaque(
        points in prop::collection::vec((-50.0f32..150.0, -50.0f32..150.0, 0.0f32..1.0), 1..20),
        size in 1.0f32..40.0,
        hardness in 0.0f32..=1.0,
        opacity in 0.0f32..=1.0,
        jitter in 0.0f32..=1.0,
    ) {
        let mut c = canvas(100, 100, BrushSettings {
            size,
            hardness,
            opacity,
            jitter,
            is_stylus: true,
            ..Default::default()
        });

        let (x, y, p) = points[0];
        c.pointer_down(RawSample::new(x, y).with_pressure(p)).unwrap();
        for &(x, y, p) in &points[1..] {
            c.pointer_move(RawSample::new(x, y).with_pressure(p)).unwrap();
        }
        c.pointer_up();

        prop_assert!(c.surface().as_raw().chunks_exact(4).all(|px| px[3] == 255));
    }
}
