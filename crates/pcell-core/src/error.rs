use std::io;
use thiserror::Error;

use crate::layer::LayerKey;

/// Errors raised while configuring a session or building a cell.
#[derive(Error, Debug)]
pub enum PcellError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid session configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid grid scale {0}: dbu must be a finite positive number")]
    InvalidGridScale(f64),

    #[error("Parameter '{name}' must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("Parameter '{name}' must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("Parameter '{name}' = {value} is outside {range}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("Width {width} dbu must be even so the core is centered on the backbone")]
    OddWidth { width: i64 },

    #[error(
        "Enclosure offset {offset} on layer {layer} inverts the band (half-width {half_width})"
    )]
    InvertedEnclosure {
        layer: LayerKey,
        offset: f64,
        half_width: f64,
    },

    #[error("Degenerate backbone: {0}")]
    DegenerateBackbone(String),

    #[error("No port defined for a bend of {theta} degrees (only multiples of 90 are supported)")]
    UnsupportedAngle { theta: f64 },

    #[error("Unknown layer '{0}'")]
    UnknownLayer(String),

    #[error("Duplicate port name '{0}'")]
    DuplicatePort(String),
}

pub type Result<T> = std::result::Result<T, PcellError>;

/// Rejects NaN/infinite values and anything `<= 0`.
pub fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(PcellError::NonFinite { name, value });
    }
    if value <= 0.0 {
        return Err(PcellError::NonPositive { name, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("width", 0.5).unwrap(), 0.5);
        assert!(matches!(
            ensure_positive("width", 0.0),
            Err(PcellError::NonPositive { name: "width", .. })
        ));
        assert!(matches!(
            ensure_positive("radius", f64::NAN),
            Err(PcellError::NonFinite { name: "radius", .. })
        ));
    }

    #[test]
    fn test_error_names_parameter() {
        let err = ensure_positive("radius", -2.0).unwrap_err();
        assert_eq!(err.to_string(), "Parameter 'radius' must be positive, got -2");
    }
}
