/// Softraster Terminal - textured mesh viewer
///
/// Loads an OBJ mesh and a texture, then renders them in the terminal.
/// Controls:
///   - Arrow Keys: Move the eye
///   - WASD: Move the look-at point
///   - F/G: Widen/narrow the field of view
///   - Q/ESC: Quit

use softraster_core::{Color, Mesh, RenderConfig, RenderContext, Texture};
use softraster_terminal::options::{LaunchOptions, DEFAULT_CONFIG, USAGE};
use softraster_terminal::TerminalApp;
use std::io;
use std::path::Path;

fn load_config(options: &LaunchOptions) -> RenderConfig {
    let path = match &options.config {
        Some(path) => path.as_path(),
        None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
        None => return RenderConfig::default(),
    };

    match RenderConfig::load(path) {
        Ok(config) => {
            log::info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            log::error!("Config {:?} not loaded, using defaults: {}", path, err);
            RenderConfig::default()
        }
    }
}

fn demo_context(mut config: RenderConfig) -> RenderContext {
    config.camera.eye = [2.5, 2.0, 4.0];
    config.camera.center = [0.0, 0.0, 0.0];
    let texture =
        Texture::checkerboard(8, 8, Color::new(230, 230, 230), Color::new(200, 60, 40));
    RenderContext::new(config, Mesh::cube(2.0), texture)
}

fn main() -> io::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let options = LaunchOptions::parse(std::env::args().skip(1)).map_err(|err| {
        eprintln!("{USAGE}");
        io::Error::new(io::ErrorKind::InvalidInput, err)
    })?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    println!("Softraster Terminal Renderer - Loading...");

    let mut config = load_config(&options);
    if let Some(mesh) = &options.mesh {
        config.assets.mesh = mesh.clone();
    }
    if let Some(texture) = &options.texture {
        config.assets.texture = texture.clone();
    }

    let context = if options.demo {
        demo_context(config)
    } else {
        RenderContext::load(config)
    };
    println!(
        "Loaded {} triangles, texture {}x{}",
        context.mesh().triangle_count(),
        context.texture().width(),
        context.texture().height()
    );

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    // Run the terminal app
    let mut app = TerminalApp::new(context)?;
    app.run()?;

    println!("Thank you for using Softraster Terminal Renderer!");
    Ok(())
}
