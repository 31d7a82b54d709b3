use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PcellError, Result};

/// Opaque layer key. The core never interprets its value; meaning comes
/// from the session's [`LayerTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerKey(pub u32);

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for LayerKey {
    fn from(value: u32) -> Self {
        LayerKey(value)
    }
}

/// A technology layer known to the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub key: LayerKey,
    pub name: String,
    pub gds_layer: u16,
    pub gds_datatype: u16,
    #[serde(default)]
    pub description: String,
}

impl Layer {
    pub fn new(key: LayerKey, name: &str, gds_layer: u16, gds_datatype: u16) -> Self {
        Self {
            key,
            name: name.to_string(),
            gds_layer,
            gds_datatype,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }
}

/// The session's layer table: resolves names and GDS pairs to [`LayerKey`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerTable {
    layers: Vec<Layer>,
}

impl LayerTable {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Registers a layer, replacing any previous entry with the same name.
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.retain(|l| l.name != layer.name);
        self.layers.push(layer);
    }

    /// Appends a layer under the next free key and returns that key.
    pub fn define(&mut self, name: &str, gds_layer: u16, gds_datatype: u16) -> LayerKey {
        let key = LayerKey(
            self.layers
                .iter()
                .map(|l| l.key.0 + 1)
                .max()
                .unwrap_or(0),
        );
        self.add_layer(Layer::new(key, name, gds_layer, gds_datatype));
        key
    }

    pub fn resolve(&self, name: &str) -> Result<LayerKey> {
        self.layers
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.key)
            .ok_or_else(|| PcellError::UnknownLayer(name.to_string()))
    }

    pub fn get_layer(&self, key: LayerKey) -> Option<&Layer> {
        self.layers.iter().find(|l| l.key == key)
    }

    pub fn get_layer_by_gds(&self, gds_layer: u16, gds_datatype: u16) -> Option<&Layer> {
        self.layers
            .iter()
            .find(|l| l.gds_layer == gds_layer && l.gds_datatype == gds_datatype)
    }

    pub fn all_layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}
