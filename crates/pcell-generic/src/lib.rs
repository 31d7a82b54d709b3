//! # PCell Generic
//!
//! Generic photonic cells built on `pcell-core`: straight waveguides (in grid
//! units and µm) and circular bends. Every builder goes through the
//! session's cell cache, so equal parameters yield one shared cell.

pub mod circular;
pub mod waveguide;

pub use circular::{bend_circular, BendCircular};
pub use waveguide::{waveguide, waveguide_dbu};
