//! Builds a bend and a straight waveguide and prints them as JSON.
//!
//! Usage: `pcell-demo [session.json]`

use pcell_core::{Enclosure, Library, Result, SessionConfig};
use pcell_generic::{waveguide, BendCircular};
use serde_json::json;

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::new("demo")
            .with_layer("WG", 1, 0)
            .with_layer("SLAB", 2, 0),
    };
    let lib = Library::from_config(&config)?;
    let wg = lib.layer("WG")?;
    let enclosure = match lib.layer("SLAB") {
        Ok(slab) => Some(Enclosure::new().with_section(slab, 2.0)?),
        Err(_) => None,
    };

    let mut bend = BendCircular::new(1.0, 5.0, wg);
    if let Some(enclosure) = enclosure.clone() {
        bend = bend.with_enclosure(enclosure);
    }
    let bend = bend.build(&lib)?;
    let straight = waveguide(&lib, 1.0, 10.0, wg, enclosure.as_ref())?;

    let cells: Vec<_> = [bend, straight]
        .iter()
        .map(|cell| {
            json!({
                "cell": &**cell,
                "port_markers": cell.port_markers(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&cells)?);
    log::info!("{} cells in session '{}'", lib.cell_count(), lib.name);
    Ok(())
}
