use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use tracing::{error, info};

use solarview::assets;
use solarview::file::read_registry;
use solarview::gui::Simulation;
use solarview::registry::Registry;
use solarview::store::RemoteStore;

/// Animated 3D solar-system viewer with remote configuration snapshots.
#[derive(Debug, Parser)]
struct Args {
    /// Body registry table; the built-in solar system is used when absent.
    #[arg(long)]
    bodies: Option<PathBuf>,
    /// Base URL of the configuration document store.
    #[arg(long, default_value = "http://localhost:8484")]
    store_url: String,
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt::init();

    let registry = match &args.bodies {
        Some(path) => match read_registry(path) {
            Ok(registry) => registry,
            Err(err) => {
                error!("could not load body registry from {}: {}", path.display(), err);
                std::process::exit(1);
            }
        },
        None => Registry::default_system(),
    };
    info!("composing a scene of {} bodies", registry.len());

    let mut window = Window::new("Solar System 3D");
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(60));

    // Model loading starts immediately; bodies join the scene as their
    // assets resolve, while the loop below is already rendering.
    let assets = assets::spawn_resolver(&registry);
    let store = Arc::new(RemoteStore::new(&args.store_url));

    let simulation = Simulation::new(&mut window, registry, assets, store);
    window.render_loop(simulation);
}
