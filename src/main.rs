//! Headless renderer: renders one frame of a built-in scene and writes the
//! color buffer to an image file.
//!
//! Usage: `phong-raster [settings.ron]`

use log::{error, info};

use phong_raster::scene::{load_settings, Settings};
use phong_raster::{Renderer, Result, VERSION};

fn run() -> Result<()> {
    let settings = match std::env::args_os().nth(1) {
        Some(path) => load_settings(path)?,
        None => {
            info!("No settings file given, using defaults");
            Settings::default()
        }
    };

    let mut renderer = Renderer::from_settings(&settings)?;
    renderer.update(0.0);
    let stats = renderer.render();
    info!(
        "Rendered {} of {} triangles ({} pixels written)",
        stats.rasterized, stats.triangles, stats.pixels_written
    );

    renderer.save_buffer_to_image(&settings.output)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    info!("=== phong-raster v{} ===", VERSION);

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
