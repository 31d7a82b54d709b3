//! Extrusion of a backbone into one grid-exact polygon per layer.

use crate::backbone::Backbone;
use crate::cell::Shapes;
use crate::enclosure::Enclosure;
use crate::error::{ensure_positive, PcellError, Result};
use crate::geometry::{DPoint, Point, Polygon};
use crate::grid::Grid;
use crate::layer::LayerKey;

/// Unit normals (left of travel) at every backbone point.
///
/// Interior points use the bisector of the incoming and outgoing segment
/// directions; the end points use `start_angle` / `end_angle` (degrees).
fn normals(points: &[DPoint], start_angle: f64, end_angle: f64) -> Result<Vec<(f64, f64)>> {
    let n = points.len();
    let mut out = Vec::with_capacity(n);
    let heading = |deg: f64| {
        let rad = deg.to_radians();
        (rad.cos(), rad.sin())
    };
    out.push(heading(start_angle));
    for i in 1..n - 1 {
        let (ix, iy) = points[i - 1]
            .direction_to(&points[i])
            .ok_or_else(|| coincident(i - 1))?;
        let (ox, oy) = points[i]
            .direction_to(&points[i + 1])
            .ok_or_else(|| coincident(i))?;
        let (tx, ty) = (ix + ox, iy + oy);
        let len = tx.hypot(ty);
        if len < 1e-12 {
            return Err(PcellError::DegenerateBackbone(format!(
                "path reverses on itself at point {}",
                i
            )));
        }
        out.push((tx / len, ty / len));
    }
    out.push(heading(end_angle));
    Ok(out.into_iter().map(|(tx, ty)| (-ty, tx)).collect())
}

fn coincident(i: usize) -> PcellError {
    PcellError::DegenerateBackbone(format!("points {} and {} coincide", i, i + 1))
}

/// Offsets the backbone by `±half_width` and closes the hull counter-clockwise.
/// Every vertex is quantized exactly once.
fn offset_polygon(
    points: &[DPoint],
    normals: &[(f64, f64)],
    half_width: f64,
    grid: &Grid,
) -> Polygon {
    let side = move |sign: f64| {
        points.iter().zip(normals).map(move |(p, (nx, ny))| {
            grid.point_to_grid(DPoint::new(
                p.x + sign * nx * half_width,
                p.y + sign * ny * half_width,
            ))
        })
    };
    let mut vertices: Vec<Point> = side(-1.0).collect();
    let mut left: Vec<Point> = side(1.0).collect();
    left.reverse();
    vertices.extend(left);
    vertices.dedup();
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    Polygon::new(vertices)
}

/// Extrudes `backbone` with a core of `width` on `layer`, plus one independent
/// band per enclosure section. Caps are oriented by `start_angle`/`end_angle`.
pub fn extrude(
    backbone: &Backbone,
    width: f64,
    layer: LayerKey,
    enclosure: Option<&Enclosure>,
    start_angle: f64,
    end_angle: f64,
    grid: &Grid,
) -> Result<Shapes> {
    let width = ensure_positive("width", width)?;
    let mut bands = vec![(layer, width / 2.0)];
    if let Some(enclosure) = enclosure {
        bands.extend(enclosure.half_widths(width)?);
    }

    let points = backbone.points();
    let normals = normals(points, start_angle, end_angle)?;

    let mut shapes = Shapes::new();
    for (band_layer, half_width) in bands {
        let polygon = offset_polygon(points, &normals, half_width, grid);
        log::debug!(
            "extruded layer {} (half-width {}): {} vertices",
            band_layer,
            half_width,
            polygon.vertex_count()
        );
        shapes.entry(band_layer).or_default().push(polygon);
    }
    Ok(shapes)
}

/// Extrudes with the backbone's own end headings.
pub fn extrude_backbone(
    backbone: &Backbone,
    width: f64,
    layer: LayerKey,
    enclosure: Option<&Enclosure>,
    grid: &Grid,
) -> Result<Shapes> {
    extrude(
        backbone,
        width,
        layer,
        enclosure,
        backbone.start_angle(),
        backbone.end_angle(),
        grid,
    )
}
