//! Canonical cache keys for parametric cells.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::enclosure::Enclosure;
use crate::error::{PcellError, Result};
use crate::layer::LayerKey;

/// One builder parameter.
///
/// Floats compare by exact value: no tolerance, `-0.0 == 0.0`, and NaN is
/// rejected by [`CellSignature::validate`].
#[derive(Debug, Clone, Serialize)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Layer(LayerKey),
    Enclosure(Option<Enclosure>),
}

impl ParamValue {
    fn float_bits(value: f64) -> u64 {
        if value == 0.0 {
            0.0f64.to_bits()
        } else {
            value.to_bits()
        }
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        use ParamValue::*;
        match (self, other) {
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => Self::float_bits(*a) == Self::float_bits(*b),
            (Bool(a), Bool(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Layer(a), Layer(b)) => a == b,
            (Enclosure(a), Enclosure(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ParamValue {}

impl Hash for ParamValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ParamValue::Int(v) => v.hash(state),
            ParamValue::Float(v) => Self::float_bits(*v).hash(state),
            ParamValue::Bool(v) => v.hash(state),
            ParamValue::Str(v) => v.hash(state),
            ParamValue::Layer(v) => v.hash(state),
            ParamValue::Enclosure(v) => v.hash(state),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Str(v) => write!(f, "{}", v),
            ParamValue::Layer(v) => write!(f, "{}", v.0),
            ParamValue::Enclosure(None) => write!(f, "None"),
            ParamValue::Enclosure(Some(enc)) => {
                let bands: Vec<String> = enc
                    .sections()
                    .iter()
                    .map(|s| format!("{}o{}", s.layer.0, s.offset))
                    .collect();
                write!(f, "{}", bands.join("-"))
            }
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<LayerKey> for ParamValue {
    fn from(v: LayerKey) -> Self {
        ParamValue::Layer(v)
    }
}

impl From<Option<&Enclosure>> for ParamValue {
    fn from(v: Option<&Enclosure>) -> Self {
        ParamValue::Enclosure(v.cloned())
    }
}

/// Builder identity plus its keyword parameters.
///
/// Parameters live in a sorted map, so the order in which they are supplied
/// never affects equality or hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CellSignature {
    builder: String,
    params: BTreeMap<String, ParamValue>,
}

impl CellSignature {
    pub fn new(builder: &str) -> Self {
        Self {
            builder: builder.to_string(),
            params: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn builder(&self) -> &str {
        &self.builder
    }

    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Rejects parameters that can never compare equal to themselves.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in &self.params {
            if let ParamValue::Float(v) = value {
                if v.is_nan() {
                    log::warn!("rejecting NaN parameter '{}' for {}", key, self.builder);
                    return Err(PcellError::NonFinite {
                        name: "signature parameter",
                        value: *v,
                    });
                }
            }
        }
        Ok(())
    }

    /// Human-readable cell name, e.g. `bend_circular_L1_R5_T90_TS1_W1`.
    pub fn cell_name(&self) -> String {
        let mut name = self.builder.clone();
        for (key, value) in &self.params {
            if let ParamValue::Enclosure(None) = value {
                continue;
            }
            name.push('_');
            name.push_str(&abbreviate(key));
            name.push_str(&value.to_string());
        }
        name
    }
}

impl fmt::Display for CellSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.builder)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        write!(f, ")")
    }
}

/// `theta_step` -> `TS`, `width` -> `W`.
fn abbreviate(key: &str) -> String {
    key.split('_')
        .filter_map(|part| part.chars().next())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(sig: &CellSignature) -> u64 {
        let mut h = DefaultHasher::new();
        sig.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_keyword_order_irrelevant() {
        let a = CellSignature::new("bend")
            .with("width", 1.0)
            .with("radius", 5.0);
        let b = CellSignature::new("bend")
            .with("radius", 5.0)
            .with("width", 1.0);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_exact_float_equality() {
        let a = CellSignature::new("bend").with("radius", 5.0);
        let b = CellSignature::new("bend").with("radius", 5.0 + 1e-12);
        assert_ne!(a, b);
        let z = CellSignature::new("bend").with("angle", -0.0);
        let z2 = CellSignature::new("bend").with("angle", 0.0);
        assert_eq!(z, z2);
        assert_eq!(hash_of(&z), hash_of(&z2));
    }

    #[test]
    fn test_types_do_not_alias() {
        let a = CellSignature::new("wg").with("width", 1i64);
        let b = CellSignature::new("wg").with("width", 1.0);
        assert_ne!(a, b);
        assert_ne!(
            CellSignature::new("wg").with("width", 1.0),
            CellSignature::new("bend").with("width", 1.0)
        );
    }

    #[test]
    fn test_nan_rejected() {
        let sig = CellSignature::new("bend").with("radius", f64::NAN);
        assert!(sig.validate().is_err());
    }

    #[test]
    fn test_cell_name() {
        let sig = CellSignature::new("bend_circular")
            .with("width", 1.0)
            .with("radius", 5.0)
            .with("layer", LayerKey(1))
            .with("enclosure", None::<&Enclosure>)
            .with("theta", 90.0)
            .with("theta_step", 1.0);
        assert_eq!(sig.cell_name(), "bend_circular_L1_R5_T90_TS1_W1");
        assert_eq!(
            sig.to_string(),
            "bend_circular(enclosure=None, layer=1, radius=5, theta=90, theta_step=1, width=1)"
        );
    }
}
