//! Interactive Particle Viewer Example
//!
//! Renders a model as a particle field with an orbiting camera and a
//! live control panel. Pass a model path on the command line or drop a
//! .ply/.obj/.gltf/.glb file onto the window.

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();

    let initial_model = std::env::args().nth(1).map(Into::into);

    println!("particlize viewer");
    println!("=================");
    println!("Controls:");
    println!("  Mouse drag: orbit around the model");
    println!("  Scroll: zoom in/out");
    println!("  Drop a model file onto the window to load it");
    println!("  Use the panel for size, sprite, fog, scale and export");

    particlize_viewer::app::run(initial_model)?;
    Ok(())
}
