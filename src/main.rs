#![warn(clippy::all, rust_2018_idioms)]
// hide console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use raster_cell_editor::EditorConfig;
use raster_cell_editor::crs::Crs;
use raster_cell_editor::geometry::RasterBounds;
use raster_cell_editor::layer::LayerRef;
use raster_cell_editor::memory::MemoryRaster;
use raster_cell_editor::{RasterEditApp, demo_layers};

/// Loads an image given on the command line as an extra RGB raster.
fn image_layer(path: &str) -> Option<LayerRef> {
    let image = match image::open(path) {
        Ok(image) => image.to_rgb8(),
        Err(err) => {
            log::error!("Failed to open {}: {}", path, err);
            return None;
        }
    };
    let bounds = RasterBounds::new(0.0, 0.0, f64::from(image.width()), f64::from(image.height()));
    let name = std::path::Path::new(path)
        .file_stem()
        .map_or_else(|| path.to_owned(), |stem| stem.to_string_lossy().into_owned());
    let raster: LayerRef =
        MemoryRaster::from_rgb_image(&name, &image, bounds, Crs::new("EPSG:32634")).into_ref();
    Some(raster)
}

/// Reads the file passed with `--config <path>`, if any.
fn config_arg(args: &[String]) -> Option<EditorConfig> {
    let index = args.iter().position(|arg| arg == "--config")?;
    let path = args.get(index + 1)?;
    match EditorConfig::load(path) {
        Ok(config) => Some(config),
        Err(err) => {
            log::error!("Ignoring config {}: {}", path, err);
            None
        }
    }
}

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // Usage: raster_cell_editor [--config <path>] [image]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = config_arg(&args);

    let mut layers = demo_layers();
    let image_path = args
        .iter()
        .enumerate()
        .filter(|(i, arg)| *arg != "--config" && (*i == 0 || args[i - 1] != "--config"))
        .map(|(_, arg)| arg.as_str())
        .next();
    if let Some(layer) = image_path.and_then(image_layer) {
        layers.insert(0, layer);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Raster Cell Editor",
        native_options,
        Box::new(|cc| Ok(Box::new(RasterEditApp::new(cc, layers, config)))),
    )
}
