//! Conversion between physical units (µm) and the integer fabrication grid.
//!
//! Rounding is half-away-from-zero (`f64::round`) everywhere. Two cells that
//! quantize the same physical coordinate must agree bit-exactly for their
//! ports to mate, so no other rounding mode is used anywhere in the crate.

use serde::{Deserialize, Serialize};

use crate::error::{PcellError, Result};
use crate::geometry::{DPoint, Point};

/// Rounds `value / scale` to the nearest grid unit, half away from zero.
pub fn to_grid(value: f64, scale: f64) -> i64 {
    (value / scale).round() as i64
}

/// Exact inverse multiply of [`to_grid`].
pub fn to_real(value: i64, scale: f64) -> f64 {
    value as f64 * scale
}

/// A validated grid scale: physical distance (µm) per database unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Grid {
    dbu: f64,
}

impl Grid {
    pub fn new(dbu: f64) -> Result<Self> {
        if !dbu.is_finite() || dbu <= 0.0 {
            return Err(PcellError::InvalidGridScale(dbu));
        }
        Ok(Self { dbu })
    }

    pub fn dbu(&self) -> f64 {
        self.dbu
    }

    pub fn to_grid(&self, value: f64) -> i64 {
        to_grid(value, self.dbu)
    }

    pub fn to_real(&self, value: i64) -> f64 {
        to_real(value, self.dbu)
    }

    pub fn point_to_grid(&self, p: DPoint) -> Point {
        Point::new(self.to_grid(p.x), self.to_grid(p.y))
    }

    pub fn point_to_real(&self, p: Point) -> DPoint {
        DPoint::new(self.to_real(p.x), self.to_real(p.y))
    }
}

impl Default for Grid {
    /// 1 nm grid on a µm user unit.
    fn default() -> Self {
        Self { dbu: 0.001 }
    }
}

impl TryFrom<f64> for Grid {
    type Error = PcellError;

    fn try_from(dbu: f64) -> Result<Self> {
        Self::new(dbu)
    }
}

impl From<Grid> for f64 {
    fn from(grid: Grid) -> f64 {
        grid.dbu
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(to_grid(0.0005, 0.001), 1);
        assert_eq!(to_grid(-0.0005, 0.001), -1);
        assert_eq!(to_grid(2.5, 1.0), 3);
        assert_eq!(to_grid(-2.5, 1.0), -3);
        assert_eq!(to_grid(5.0, 0.001), 5000);
    }

    #[test]
    fn test_round_trip_within_half_step() {
        for &scale in &[0.001, 0.005, 0.25, 1.0] {
            for i in -200..200 {
                let v = i as f64 * 0.0137 + 0.0003;
                let back = to_real(to_grid(v, scale), scale);
                assert!((back - v).abs() <= scale / 2.0 + 1e-12, "v={v} scale={scale}");
            }
        }
    }

    #[test]
    fn test_invalid_scale_rejected() {
        assert!(matches!(Grid::new(0.0), Err(PcellError::InvalidGridScale(_))));
        assert!(matches!(Grid::new(-0.001), Err(PcellError::InvalidGridScale(_))));
        assert!(matches!(Grid::new(f64::NAN), Err(PcellError::InvalidGridScale(_))));
        assert!(Grid::new(0.001).is_ok());
    }

    #[test]
    fn test_point_conversion() {
        let grid = Grid::default();
        let p = grid.point_to_grid(DPoint::new(5.0, -2.5));
        assert_eq!(p, Point::new(5000, -2500));
        let back = grid.point_to_real(p);
        assert!((back.x - 5.0).abs() < 1e-10);
        assert!((back.y + 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_grid_deserialize_validates() {
        let grid: Grid = serde_json::from_str("0.005").unwrap();
        assert_eq!(grid.dbu(), 0.005);
        assert!(serde_json::from_str::<Grid>("0").is_err());
    }
}
