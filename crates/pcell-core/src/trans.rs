use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Polygon};

/// Counter-clockwise quarter-turn rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn from_quarter_turns(turns: i64) -> Self {
        match turns.rem_euclid(4) {
            0 => Rotation::R0,
            1 => Rotation::R90,
            2 => Rotation::R180,
            _ => Rotation::R270,
        }
    }

    /// Exact multiples of 90 degrees only; anything else is not a cardinal heading.
    pub fn from_degrees(degrees: f64) -> Option<Self> {
        if !degrees.is_finite() {
            return None;
        }
        let turns = degrees / 90.0;
        if turns.fract() != 0.0 {
            return None;
        }
        Some(Self::from_quarter_turns(turns as i64))
    }

    pub fn quarter_turns(self) -> i64 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    pub fn degrees(self) -> f64 {
        self.quarter_turns() as f64 * 90.0
    }

    pub fn rotate(self, other: Rotation) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    pub fn inverse(self) -> Self {
        Self::from_quarter_turns(-self.quarter_turns())
    }

    /// Rotation by 180 degrees, i.e. the opposite heading.
    pub fn reversed(self) -> Self {
        self.rotate(Rotation::R180)
    }

    fn apply(self, p: Point) -> Point {
        match self {
            Rotation::R0 => p,
            Rotation::R90 => Point::new(-p.y, p.x),
            Rotation::R180 => Point::new(-p.x, -p.y),
            Rotation::R270 => Point::new(p.y, -p.x),
        }
    }
}

/// A rigid transform on the grid.
///
/// Applied as: mirror about the x-axis (if set), then rotate, then displace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Trans {
    pub rot: Rotation,
    pub mirror: bool,
    pub disp: Point,
}

impl Trans {
    pub fn new(rot: Rotation, mirror: bool, x: i64, y: i64) -> Self {
        Self {
            rot,
            mirror,
            disp: Point::new(x, y),
        }
    }

    pub fn translate(x: i64, y: i64) -> Self {
        Self::new(Rotation::R0, false, x, y)
    }

    pub fn identity() -> Self {
        Self::default()
    }

    fn apply_linear(&self, p: Point) -> Point {
        let p = if self.mirror { Point::new(p.x, -p.y) } else { p };
        self.rot.apply(p)
    }

    pub fn apply(&self, p: &Point) -> Point {
        let q = self.apply_linear(*p);
        q.translate(self.disp.x, self.disp.y)
    }

    pub fn apply_polygon(&self, polygon: &Polygon) -> Polygon {
        let mut vertices: Vec<Point> = polygon.vertices.iter().map(|p| self.apply(p)).collect();
        // A reflection flips winding; restore counter-clockwise order.
        if self.mirror {
            vertices.reverse();
        }
        Polygon::new(vertices)
    }

    /// `self.compose(other)` applies `other` first, then `self`.
    pub fn compose(&self, other: &Trans) -> Trans {
        let rot = if self.mirror {
            self.rot.rotate(other.rot.inverse())
        } else {
            self.rot.rotate(other.rot)
        };
        Trans {
            rot,
            mirror: self.mirror ^ other.mirror,
            disp: self.apply(&other.disp),
        }
    }

    pub fn inverse(&self) -> Trans {
        let linear = Trans {
            rot: if self.mirror { self.rot } else { self.rot.inverse() },
            mirror: self.mirror,
            disp: Point::default(),
        };
        let d = linear.apply(&self.disp);
        Trans {
            disp: Point::new(-d.x, -d.y),
            ..linear
        }
    }
}

impl fmt::Display for Trans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = if self.mirror { "m" } else { "r" };
        write!(
            f,
            "{}{} {},{}",
            m,
            self.rot.quarter_turns() * 90,
            self.disp.x,
            self.disp.y
        )
    }
}
