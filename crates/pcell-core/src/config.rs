use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Session configuration, normally supplied by the surrounding PDK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub name: String,
    /// Physical distance (µm) per grid unit.
    #[serde(default = "default_dbu")]
    pub dbu: f64,
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
}

/// One entry of the layer table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    pub layer: u16,
    #[serde(default)]
    pub datatype: u16,
    #[serde(default)]
    pub description: String,
}

fn default_dbu() -> f64 {
    0.001 // 1nm grid
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            dbu: default_dbu(),
            layers: Vec::new(),
        }
    }
}

impl SessionConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_layer(mut self, name: &str, layer: u16, datatype: u16) -> Self {
        self.layers.push(LayerSpec {
            name: name.to_string(),
            layer,
            datatype,
            description: String::new(),
        });
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PcellError;

    #[test]
    fn test_defaults_applied() {
        let cfg = SessionConfig::from_json(r#"{"name": "demo", "layers": [{"name": "WG", "layer": 1}]}"#)
            .unwrap();
        assert_eq!(cfg.name, "demo");
        assert!((cfg.dbu - 0.001).abs() < 1e-15);
        assert_eq!(cfg.layers[0].datatype, 0);
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = SessionConfig::new("demo").with_layer("WG", 1, 0).with_layer("SLAB", 2, 0);
        let back = SessionConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(back.layers.len(), 2);
        assert_eq!(back.layers[1].name, "SLAB");
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            SessionConfig::from_json("{\"dbu\": 0.001}"),
            Err(PcellError::Config(_))
        ));
        assert!(matches!(
            SessionConfig::load("/nonexistent/session.json"),
            Err(PcellError::Io(_))
        ));
    }
}
