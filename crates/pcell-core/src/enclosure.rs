//! Per-layer cladding / exclusion bands around a core path.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{PcellError, Result};
use crate::layer::LayerKey;

/// One band: `offset` (µm) is added to the core half-width on `layer`.
/// Positive grows outward, negative shrinks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Section {
    pub layer: LayerKey,
    pub offset: f64,
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.layer == other.layer && self.offset.to_bits() == other.offset.to_bits()
    }
}

impl Eq for Section {}

impl Hash for Section {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.layer.hash(state);
        self.offset.to_bits().hash(state);
    }
}

/// A set of independent enclosure sections.
///
/// Sections are kept sorted by `(layer, offset)` so two enclosures listing
/// the same bands in a different order compare (and hash) equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Enclosure {
    sections: Vec<Section>,
}

impl Enclosure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sections(sections: impl IntoIterator<Item = (LayerKey, f64)>) -> Result<Self> {
        let mut enclosure = Self::new();
        for (layer, offset) in sections {
            enclosure.add_section(layer, offset)?;
        }
        Ok(enclosure)
    }

    pub fn with_section(mut self, layer: LayerKey, offset: f64) -> Result<Self> {
        self.add_section(layer, offset)?;
        Ok(self)
    }

    pub fn add_section(&mut self, layer: LayerKey, offset: f64) -> Result<()> {
        if !offset.is_finite() {
            return Err(PcellError::NonFinite {
                name: "enclosure offset",
                value: offset,
            });
        }
        // -0.0 and 0.0 are the same band.
        let offset = if offset == 0.0 { 0.0 } else { offset };
        let section = Section { layer, offset };
        let idx = self.sections.partition_point(|s| {
            (s.layer, s.offset).partial_cmp(&(layer, offset)) == Some(std::cmp::Ordering::Less)
        });
        self.sections.insert(idx, section);
        Ok(())
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Half-width of each band for a core of `width`, failing on the first
    /// band that would collapse or invert.
    pub fn half_widths(&self, width: f64) -> Result<Vec<(LayerKey, f64)>> {
        self.sections
            .iter()
            .map(|s| {
                let half_width = width / 2.0 + s.offset;
                if half_width <= 0.0 {
                    return Err(PcellError::InvertedEnclosure {
                        layer: s.layer,
                        offset: s.offset,
                        half_width,
                    });
                }
                Ok((s.layer, half_width))
            })
            .collect()
    }
}
