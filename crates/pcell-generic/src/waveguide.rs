//! Straight waveguides in grid and physical units.
//!
//! A waveguide is a rectangle of core material with optional slab/exclude
//! bands around it:
//!
//! ```text
//!     ┌─────────────────────────────┐
//!     │        Slab/Exclude         │
//!     ├─────────────────────────────┤
//!  o1 │            Core             │ o2
//!     ├─────────────────────────────┤
//!     │        Slab/Exclude         │
//!     └─────────────────────────────┘
//! ```

use std::sync::Arc;

use pcell_core::error::ensure_positive;
use pcell_core::{
    extrude_backbone, straight_backbone, Cell, CellSignature, Enclosure, LayerKey, Library,
    PcellError, Point, Port, Result,
};

/// Straight waveguide in grid units.
///
/// `width` must be even so the core is centered on the x-axis.
pub fn waveguide_dbu(
    lib: &Library,
    width: i64,
    length: i64,
    layer: LayerKey,
    enclosure: Option<&Enclosure>,
) -> Result<Arc<Cell>> {
    if width <= 0 {
        return Err(PcellError::NonPositive {
            name: "width",
            value: width as f64,
        });
    }
    if width % 2 != 0 {
        return Err(PcellError::OddWidth { width });
    }
    if length <= 0 {
        return Err(PcellError::NonPositive {
            name: "length",
            value: length as f64,
        });
    }

    let signature = CellSignature::new("waveguide")
        .with("width", width)
        .with("length", length)
        .with("layer", layer)
        .with("enclosure", enclosure);

    lib.build_cached(signature, |cell| {
        let backbone = straight_backbone(lib.to_real(length))?;
        cell.add_shapes(extrude_backbone(
            &backbone,
            lib.to_real(width),
            layer,
            enclosure,
            lib.grid(),
        )?);
        cell.add_port(Port::place("o1", Point::new(0, 0), 180.0, width, layer)?)?;
        cell.add_port(Port::place("o2", Point::new(length, 0), 0.0, width, layer)?)?;
        Ok(())
    })
}

/// Straight waveguide in µm.
///
/// Width and length are snapped to the session grid and the grid-unit
/// builder does the work, so equal grid values share one cell.
pub fn waveguide(
    lib: &Library,
    width: f64,
    length: f64,
    layer: LayerKey,
    enclosure: Option<&Enclosure>,
) -> Result<Arc<Cell>> {
    let width = ensure_positive("width", width)?;
    let length = ensure_positive("length", length)?;
    waveguide_dbu(lib, lib.to_grid(width), lib.to_grid(length), layer, enclosure)
}
