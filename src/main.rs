use std::fs::File;
use std::io::{self, BufReader};

use miette::Result;

use drawview::errors::SceneError;
use drawview::render::{RecordingBackend, render_scene};
use drawview::view::{INIT_MAX_HEIGHT, INIT_MAX_WIDTH};
use drawview::{LayerSet, MagickDecoder, SceneBuilder, ViewTransform};

/// Read a scene from the named file (or stdin), finalize it, and dump
/// the draw operations a backend would receive for the initial view.
fn main() -> Result<()> {
    let path = std::env::args().nth(1);

    let mut builder = SceneBuilder::new(Box::new(MagickDecoder));
    let title = match &path {
        Some(path) => {
            let file = File::open(path).map_err(SceneError::from)?;
            builder.read(BufReader::new(file))?;
            path.as_str()
        }
        None => {
            builder.read(io::stdin().lock())?;
            "stdin"
        }
    };

    let mut scene = builder.finish();
    let Some(bounds) = scene.finalize() else {
        // A scene with no geometry is valid input, not an error.
        println!("{title}: empty scene");
        return Ok(());
    };

    let mut view = ViewTransform::new();
    let (width, height) = view.fit(&bounds, INIT_MAX_WIDTH, INIT_MAX_HEIGHT);

    let mut backend = RecordingBackend::new();
    scene.upload_textures(&mut backend);
    render_scene(&scene, &LayerSet::all_visible(), &mut backend);

    println!(
        "{title}: {} x {} ({width}x{height} window, zoom {:.4})",
        bounds.width(),
        bounds.height(),
        view.zoom
    );
    print!("{}", backend.dump());
    Ok(())
}
