//! Centerline generation for path-like cells.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, PcellError, Result};
use crate::geometry::DPoint;

/// Upper bound on the number of points an arc may be sampled with.
pub const MAX_ARC_SAMPLES: usize = 1_000_000;

/// A directed centerline in physical units with explicit end headings (degrees).
///
/// Deserialization goes through [`Backbone::new`], so every backbone holds at
/// least two points and no coincident neighbours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BackboneData")]
pub struct Backbone {
    points: Vec<DPoint>,
    start_angle: f64,
    end_angle: f64,
}

impl Backbone {
    /// Builds a backbone whose end headings follow the first and last segment.
    pub fn new(points: Vec<DPoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(PcellError::DegenerateBackbone(format!(
                "need at least 2 points, got {}",
                points.len()
            )));
        }
        for (i, w) in points.windows(2).enumerate() {
            if w[0] == w[1] {
                return Err(PcellError::DegenerateBackbone(format!(
                    "points {} and {} coincide at ({}, {})",
                    i,
                    i + 1,
                    w[0].x,
                    w[0].y
                )));
            }
        }
        let n = points.len();
        let start_angle = segment_angle(&points[0], &points[1]);
        let end_angle = segment_angle(&points[n - 2], &points[n - 1]);
        Ok(Self {
            points,
            start_angle,
            end_angle,
        })
    }

    /// Overrides the end headings, e.g. with the exact tangent of an arc.
    pub fn with_angles(mut self, start_angle: f64, end_angle: f64) -> Self {
        self.start_angle = start_angle;
        self.end_angle = end_angle;
        self
    }

    pub fn points(&self) -> &[DPoint] {
        &self.points
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> DPoint {
        self.points[0]
    }

    pub fn last(&self) -> DPoint {
        self.points[self.points.len() - 1]
    }

    /// Sum of segment lengths.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }
}

#[derive(Deserialize)]
struct BackboneData {
    points: Vec<DPoint>,
    start_angle: f64,
    end_angle: f64,
}

impl TryFrom<BackboneData> for Backbone {
    type Error = PcellError;

    fn try_from(data: BackboneData) -> Result<Self> {
        for (name, value) in [("start_angle", data.start_angle), ("end_angle", data.end_angle)] {
            if !value.is_finite() {
                return Err(PcellError::NonFinite { name, value });
            }
        }
        Ok(Backbone::new(data.points)?.with_angles(data.start_angle, data.end_angle))
    }
}

fn segment_angle(a: &DPoint, b: &DPoint) -> f64 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

/// Two-point backbone `[(0,0), (length,0)]`.
pub fn straight_backbone(length: f64) -> Result<Backbone> {
    let length = ensure_positive("length", length)?;
    Ok(Backbone::new(vec![DPoint::new(0.0, 0.0), DPoint::new(length, 0.0)])?.with_angles(0.0, 0.0))
}

/// Number of samples for an arc: `round(|angle_total| / angle_step) + 1`, at least 2.
///
/// Fails when the count would exceed [`MAX_ARC_SAMPLES`].
pub fn arc_sample_count(angle_total: f64, angle_step: f64) -> Result<usize> {
    let steps = (angle_total.abs() / angle_step).round();
    let count = if steps.is_finite() && steps < MAX_ARC_SAMPLES as f64 {
        (steps as usize).checked_add(1)
    } else {
        None
    };
    match count {
        Some(n) if n <= MAX_ARC_SAMPLES => Ok(n.max(2)),
        _ => Err(PcellError::OutOfRange {
            name: "angle_step",
            value: angle_step,
            range: "at most 1000000 samples per arc",
        }),
    }
}

/// Circular arc starting at the origin and tangent to the x-axis, with its
/// center at `(0, radius)`.
///
/// Angles are in degrees. A positive `angle_total` heads +x and turns left; a
/// negative one heads -x and turns right. Both `0` and `angle_total` are
/// sampled exactly, so the last point is the closed-form arc position at
/// `angle_total`, and the end headings follow the direction of travel.
pub fn arc_backbone(radius: f64, angle_total: f64, angle_step: f64) -> Result<Backbone> {
    let radius = ensure_positive("radius", radius)?;
    let angle_step = ensure_positive("angle_step", angle_step)?;
    if !angle_total.is_finite() {
        return Err(PcellError::NonFinite {
            name: "angle_total",
            value: angle_total,
        });
    }
    if angle_total == 0.0 {
        return Err(PcellError::DegenerateBackbone(
            "arc with a total angle of 0".to_string(),
        ));
    }

    let n = arc_sample_count(angle_total, angle_step)?;
    let last = (n - 1) as f64;
    let points = (0..n)
        .map(|i| {
            let theta = (angle_total * (i as f64 / last)).to_radians();
            DPoint::new(radius * theta.sin(), radius * (1.0 - theta.cos()))
        })
        .collect();
    let (start_angle, end_angle) = if angle_total > 0.0 {
        (0.0, angle_total)
    } else {
        (180.0, angle_total + 180.0)
    };
    Ok(Backbone::new(points)?.with_angles(start_angle, end_angle))
}
