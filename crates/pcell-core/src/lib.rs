//! # PCell Core
//!
//! Grid-exact geometry construction for photonic layout cells: arc and
//! straight backbones, per-layer extrusion with enclosure bands, cardinal
//! ports, and a signature-keyed cache that hands out one shared cell per
//! distinct parameter set.

pub mod backbone;
pub mod cache;
pub mod cell;
pub mod config;
pub mod enclosure;
pub mod error;
pub mod extrude;
pub mod geometry;
pub mod grid;
pub mod layer;
pub mod library;
pub mod port;
pub mod signature;
pub mod trans;

pub use backbone::{arc_backbone, straight_backbone, Backbone};
pub use cache::{build_cached, CellCache};
pub use cell::{Cell, CellId, Shapes};
pub use config::{LayerSpec, SessionConfig};
pub use enclosure::{Enclosure, Section};
pub use error::{PcellError, Result};
pub use extrude::{extrude, extrude_backbone};
pub use geometry::{BBox, DPoint, Point, Polygon};
pub use grid::{to_grid, to_real, Grid};
pub use layer::{Layer, LayerKey, LayerTable};
pub use library::Library;
pub use port::Port;
pub use signature::{CellSignature, ParamValue};
pub use trans::{Rotation, Trans};
