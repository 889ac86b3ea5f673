//! End-to-end pipeline tests: text in, finalized scene, draw ops out.

use drawview::errors::ImageError;
use drawview::image::{DecodedImage, ImageDecoder};
use drawview::input::{ViewEvent, Viewer};
use drawview::render::{DrawOp, RecordingBackend, render_scene};
use drawview::view::{INIT_MAX_HEIGHT, INIT_MAX_WIDTH};
use drawview::{LayerSet, ViewTransform, load_scene};

struct FakeDecoder;

impl ImageDecoder for FakeDecoder {
    fn decode(&self, _path: &str) -> Result<DecodedImage, ImageError> {
        Ok(DecodedImage {
            width: 4,
            height: 2,
            rgb: vec![0; 24],
        })
    }
}

fn scene_from(input: &str) -> drawview::Scene {
    load_scene(input.as_bytes(), Box::new(FakeDecoder)).unwrap()
}

#[test]
fn worked_example_draw_ops() {
    let mut scene = scene_from(
        "Rectangle 0 0 100 50\n\
         Circle 200 200 10\n",
    );
    let bounds = scene.finalize().unwrap();
    assert_eq!((bounds.width(), bounds.height()), (230, 230));

    let mut backend = RecordingBackend::new();
    render_scene(&scene, &LayerSet::all_visible(), &mut backend);
    insta::assert_snapshot!(backend.dump(), @r#"
    style rgb(255,255,255) width=1 wire
    poly[4] wire z=0 (-10,-10) (220,-10) (220,220) (-10,220)
    style rgb(255,255,255) width=1 wire
    text (-10,-30) z=0 scale=0.09540 rot=0 "230 x 230"
    style rgb(255,255,255) width=1 wire
    poly[4] wire z=-100 (0,0) (100,0) (100,50) (0,50)
    style rgb(255,255,255) width=1 wire
    poly[128] wire z=-100
    "#);
}

#[test]
fn hidden_layers_drop_out_of_the_dump() {
    let mut scene = scene_from(
        "Layer 2\n\
         Rectangle 0 0 10 10\n\
         Layer 3\n\
         Rectangle 20 20 30 30\n",
    );
    scene.finalize().unwrap();

    let mut layers = LayerSet::all_visible();
    layers.toggle(2);
    let mut backend = RecordingBackend::new();
    render_scene(&scene, &layers, &mut backend);

    let depths: Vec<i32> = backend
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Polygon { z, .. } => Some(*z),
            _ => None,
        })
        .collect();
    // Border (layer 0) and the layer-3 rectangle survive; layer 2 is gone.
    assert_eq!(depths, vec![0, -300]);
}

#[test]
fn images_upload_then_draw_as_textured_quads() {
    let mut scene = scene_from("Scale 10\nImage 0 0 \"photo.png\"\n");
    scene.finalize().unwrap();

    let mut backend = RecordingBackend::new();
    scene.upload_textures(&mut backend);
    render_scene(&scene, &LayerSet::all_visible(), &mut backend);

    let uploads: Vec<&DrawOp> = backend
        .ops
        .iter()
        .filter(|op| matches!(op, DrawOp::CreateTexture { .. }))
        .collect();
    assert_eq!(uploads.len(), 1);
    assert!(matches!(
        uploads[0],
        DrawOp::CreateTexture {
            width: 4,
            height: 2,
            bytes: 24,
            ..
        }
    ));

    let quad = backend
        .ops
        .iter()
        .find(|op| matches!(op, DrawOp::TexturedQuad { .. }))
        .unwrap();
    let DrawOp::TexturedQuad { a, b, z, .. } = quad else {
        unreachable!()
    };
    // 4x2 pixels at scale 10.
    assert_eq!((a.x, a.y), (0, 0));
    assert_eq!((b.x, b.y), (40, 20));
    assert_eq!(*z, -100);
}

#[test]
fn state_only_input_finalizes_to_nothing() {
    let mut scene = scene_from("Color 255 0 0\nWidth 4\n// just comments\n");
    assert!(scene.finalize().is_none());
}

#[test]
fn interactive_session_round_trips_home() {
    let mut scene = scene_from("Rectangle 0 0 2000 2000\n");
    let bounds = scene.finalize().unwrap();

    let mut view = ViewTransform::new();
    let (w, h) = view.fit(&bounds, INIT_MAX_WIDTH, INIT_MAX_HEIGHT);
    assert!(w <= INIT_MAX_WIDTH && h <= INIT_MAX_HEIGHT);

    let mut viewer = Viewer::new(view);
    let cursor = glam::dvec2(w as f64 / 2.0, h as f64 / 2.0);
    let anchored = viewer.view.screen_to_model(cursor);
    viewer.handle(ViewEvent::ZoomIn { at: cursor, fine: false });
    viewer.handle(ViewEvent::ZoomIn { at: cursor, fine: true });
    let after = viewer.view.screen_to_model(cursor);
    assert!((anchored - after).length() < 1e-9);

    viewer.handle(ViewEvent::DragStart { at: cursor });
    viewer.handle(ViewEvent::DragMove {
        at: cursor + glam::dvec2(25.0, -10.0),
    });
    viewer.handle(ViewEvent::DragEnd);
    assert_ne!(viewer.view.pan, view.pan);

    viewer.handle(ViewEvent::Home);
    assert_eq!(viewer.view.zoom, view.zoom);
    assert_eq!(viewer.view.pan, view.pan);
}
