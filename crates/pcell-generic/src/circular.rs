//! Circular bends. A circular bend has a constant radius.

use std::sync::Arc;

use pcell_core::error::ensure_positive;
use pcell_core::{
    arc_backbone, extrude, Cell, CellSignature, Enclosure, LayerKey, Library, PcellError, Point,
    Port, Rotation, Result,
};

/// Parameters of a circular bend (µm, degrees).
#[derive(Debug, Clone)]
pub struct BendCircular {
    /// Width of the core.
    pub width: f64,
    /// Radius of the backbone.
    pub radius: f64,
    pub layer: LayerKey,
    /// Claddings around the core.
    pub enclosure: Option<Enclosure>,
    /// Total angle of the bend.
    pub theta: f64,
    /// Angle between consecutive backbone points.
    pub theta_step: f64,
}

impl BendCircular {
    pub fn new(width: f64, radius: f64, layer: LayerKey) -> Self {
        Self {
            width,
            radius,
            layer,
            enclosure: None,
            theta: 90.0,
            theta_step: 1.0,
        }
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    pub fn with_theta_step(mut self, theta_step: f64) -> Self {
        self.theta_step = theta_step;
        self
    }

    pub fn with_enclosure(mut self, enclosure: Enclosure) -> Self {
        self.enclosure = Some(enclosure);
        self
    }

    pub fn build(&self, lib: &Library) -> Result<Arc<Cell>> {
        bend_circular(
            lib,
            self.width,
            self.radius,
            self.layer,
            self.enclosure.as_ref(),
            self.theta,
            self.theta_step,
        )
    }
}

/// Circular bend starting at the origin heading +x and turning left by `theta`.
///
/// Port `o1` sits at the origin facing 180°. Port `o2` sits at the exact arc
/// end facing `theta`, which must therefore be a multiple of 90°.
pub fn bend_circular(
    lib: &Library,
    width: f64,
    radius: f64,
    layer: LayerKey,
    enclosure: Option<&Enclosure>,
    theta: f64,
    theta_step: f64,
) -> Result<Arc<Cell>> {
    let width = ensure_positive("width", width)?;
    let radius = ensure_positive("radius", radius)?;
    let theta_step = ensure_positive("theta_step", theta_step)?;
    let theta = ensure_positive("theta", theta)?;
    if theta > 360.0 {
        return Err(PcellError::OutOfRange {
            name: "theta",
            value: theta,
            range: "(0, 360]",
        });
    }
    if width / 2.0 >= radius {
        return Err(PcellError::OutOfRange {
            name: "width",
            value: width,
            range: "(0, 2 * radius)",
        });
    }
    let end_rotation = Rotation::from_degrees(theta).ok_or(PcellError::UnsupportedAngle { theta })?;

    let signature = CellSignature::new("bend_circular")
        .with("width", width)
        .with("radius", radius)
        .with("layer", layer)
        .with("enclosure", enclosure)
        .with("theta", theta)
        .with("theta_step", theta_step);

    lib.build_cached(signature, |cell| {
        let backbone = arc_backbone(radius, theta, theta_step)?;
        cell.add_shapes(extrude(
            &backbone,
            width,
            layer,
            enclosure,
            0.0,
            theta,
            lib.grid(),
        )?);

        let port_width = lib.to_grid(width);
        cell.add_port(Port::place("o1", Point::new(0, 0), 180.0, port_width, layer)?)?;
        let end = lib.grid().point_to_grid(backbone.last());
        cell.add_port(Port::place(
            "o2",
            end,
            end_rotation.degrees(),
            port_width,
            layer,
        )?)?;
        Ok(())
    })
}
