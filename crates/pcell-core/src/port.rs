use serde::{Deserialize, Serialize};

use crate::error::{PcellError, Result};
use crate::geometry::{Point, Polygon};
use crate::layer::LayerKey;
use crate::trans::{Rotation, Trans};

/// A named connection point on a cell boundary.
///
/// The port's transform places it on the grid and faces it outward: a port
/// with rotation `R0` points along +x.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub trans: Trans,
    /// Width in grid units.
    pub width: i64,
    pub layer: LayerKey,
}

impl Port {
    pub fn new(name: &str, trans: Trans, width: i64, layer: LayerKey) -> Result<Self> {
        if width <= 0 {
            return Err(PcellError::NonPositive {
                name: "port width",
                value: width as f64,
            });
        }
        Ok(Self {
            name: name.to_string(),
            trans,
            width,
            layer,
        })
    }

    /// Places a port at `position` facing `heading` (degrees).
    ///
    /// Only cardinal headings can be represented; anything else is reported
    /// as an unsupported angle rather than snapped.
    pub fn place(
        name: &str,
        position: Point,
        heading: f64,
        width: i64,
        layer: LayerKey,
    ) -> Result<Self> {
        let rot = Rotation::from_degrees(heading)
            .ok_or(PcellError::UnsupportedAngle { theta: heading })?;
        Self::new(name, Trans::new(rot, false, position.x, position.y), width, layer)
    }

    pub fn position(&self) -> Point {
        self.trans.disp
    }

    pub fn rotation(&self) -> Rotation {
        self.trans.rot
    }

    /// Facing direction in degrees, in `[0, 360)`.
    pub fn heading(&self) -> f64 {
        self.trans.rot.degrees()
    }

    /// The same port moved rigidly by `t`.
    pub fn transformed(&self, t: &Trans) -> Port {
        Port {
            trans: t.compose(&self.trans),
            ..self.clone()
        }
    }

    /// Two ports mate when they coincide in position, width and layer and face each other.
    pub fn mates_with(&self, other: &Port) -> bool {
        self.position() == other.position()
            && self.width == other.width
            && self.layer == other.layer
            && self.rotation().reversed() == other.rotation()
    }

    /// Triangular marker pointing out of the cell, for visual inspection.
    pub fn marker(&self) -> Polygon {
        let half = (self.width / 2).max(1);
        let local = Polygon::new(vec![
            Point::new(0, -half),
            Point::new(half, 0),
            Point::new(0, half),
        ]);
        self.trans.apply_polygon(&local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WG: LayerKey = LayerKey(1);

    #[test]
    fn test_place_cardinal() {
        let p = Port::place("o2", Point::new(5000, 5000), 90.0, 1000, WG).unwrap();
        assert_eq!(p.rotation(), Rotation::R90);
        assert_eq!(p.position(), Point::new(5000, 5000));
        assert!((p.heading() - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_place_rejects_non_cardinal() {
        assert!(matches!(
            Port::place("o2", Point::new(0, 0), 45.0, 1000, WG),
            Err(PcellError::UnsupportedAngle { .. })
        ));
        assert!(Port::place("o1", Point::new(0, 0), 0.0, 0, WG).is_err());
    }

    #[test]
    fn test_mating() {
        let a = Port::place("o2", Point::new(10, 0), 0.0, 100, WG).unwrap();
        let b = Port::place("o1", Point::new(10, 0), 180.0, 100, WG).unwrap();
        assert!(a.mates_with(&b));
        let c = Port::place("o1", Point::new(10, 0), 90.0, 100, WG).unwrap();
        assert!(!a.mates_with(&c));
    }

    #[test]
    fn test_transformed() {
        let p = Port::place("o1", Point::new(10, 0), 0.0, 100, WG).unwrap();
        let moved = p.transformed(&Trans::new(Rotation::R90, false, 0, 5));
        assert_eq!(moved.position(), Point::new(0, 15));
        assert_eq!(moved.rotation(), Rotation::R90);
        assert_eq!(moved.name, "o1");
    }

    #[test]
    fn test_marker_points_outward() {
        let p = Port::place("o1", Point::new(0, 0), 180.0, 1000, WG).unwrap();
        let marker = p.marker();
        let bb = marker.bbox().unwrap();
        assert_eq!(bb.min, Point::new(-500, -500));
        assert_eq!(bb.max, Point::new(0, 500));
    }
}
