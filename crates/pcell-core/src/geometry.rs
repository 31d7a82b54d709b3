use serde::{Deserialize, Serialize};

/// A 2D point in physical units (µm). Transient; never stored in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DPoint {
    pub x: f64,
    pub y: f64,
}

impl DPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &DPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Unit vector pointing from `self` to `other`, or `None` if they coincide.
    pub fn direction_to(&self, other: &DPoint) -> Option<(f64, f64)> {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let len = dx.hypot(dy);
        if len == 0.0 {
            return None;
        }
        Some((dx / len, dy / len))
    }
}

/// A 2D point on the integer layout grid (database units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn translate(&self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// An axis-aligned bounding box in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self::new(*first, *first);
        for p in &points[1..] {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> i64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i64 {
        self.max.y - self.min.y
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

/// A closed polygon on the layout grid. The closing edge is implicit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle from two opposite corners.
    pub fn from_box(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        let (x1, x2) = (x1.min(x2), x1.max(x2));
        let (y1, y2) = (y1.min(y2), y1.max(y2));
        Self::new(vec![
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ])
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(&self.vertices)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Twice the signed area (shoelace). Positive for counter-clockwise hulls.
    pub fn area2(&self) -> i128 {
        let n = self.vertices.len();
        (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128
            })
            .sum()
    }

    /// Absolute area in square grid units.
    pub fn area(&self) -> f64 {
        (self.area2().abs() as f64) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = DPoint::new(0.0, 0.0);
        let b = DPoint::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_direction_to() {
        let (ux, uy) = DPoint::new(1.0, 1.0)
            .direction_to(&DPoint::new(1.0, 3.0))
            .unwrap();
        assert!(ux.abs() < 1e-12);
        assert!((uy - 1.0).abs() < 1e-12);
        assert!(DPoint::new(1.0, 1.0).direction_to(&DPoint::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_box_area() {
        let r = Polygon::from_box(10, 5, 0, 0);
        assert_eq!(r.area2(), 100);
        assert!((r.area() - 50.0).abs() < 1e-10);
        let bb = r.bbox().unwrap();
        assert_eq!((bb.width(), bb.height()), (10, 5));
    }

    #[test]
    fn test_bbox_union() {
        let a = BBox::new(Point::new(0, 0), Point::new(10, 10));
        let b = BBox::new(Point::new(5, -5), Point::new(15, 8));
        let u = a.union(&b);
        assert_eq!(u, BBox::new(Point::new(0, -5), Point::new(15, 10)));
        assert!(u.contains_point(&Point::new(15, -5)));
        assert!(!a.contains_point(&Point::new(11, 0)));
    }

    #[test]
    fn test_bbox_empty() {
        assert!(BBox::from_points(&[]).is_none());
    }
}
