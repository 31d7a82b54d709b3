use std::sync::Arc;

use crate::cache::{build_cached, CellCache};
use crate::cell::Cell;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::layer::{Layer, LayerKey, LayerTable};
use crate::signature::CellSignature;

/// A design session: grid scale, layer table and the cell cache.
///
/// Builders take the library explicitly; independent libraries (e.g. one per
/// test) never share cells.
#[derive(Debug)]
pub struct Library {
    pub name: String,
    grid: Grid,
    layers: LayerTable,
    cache: CellCache,
}

impl Library {
    /// Fails at session setup if `dbu` is not a positive finite number.
    pub fn new(name: &str, dbu: f64) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            grid: Grid::new(dbu)?,
            layers: LayerTable::new(),
            cache: CellCache::new(),
        })
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let mut lib = Self::new(&config.name, config.dbu)?;
        for (i, spec) in config.layers.iter().enumerate() {
            let layer = Layer::new(LayerKey(i as u32), &spec.name, spec.layer, spec.datatype)
                .with_description(&spec.description);
            lib.layers.add_layer(layer);
        }
        log::info!(
            "session '{}' ready: dbu {} µm, {} layers",
            lib.name,
            lib.grid.dbu(),
            lib.layers.layer_count()
        );
        Ok(lib)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn dbu(&self) -> f64 {
        self.grid.dbu()
    }

    pub fn layers(&self) -> &LayerTable {
        &self.layers
    }

    /// Resolves a layer name through the session's layer table.
    pub fn layer(&self, name: &str) -> Result<LayerKey> {
        self.layers.resolve(name)
    }

    pub fn cache(&self) -> &CellCache {
        &self.cache
    }

    pub fn to_grid(&self, value: f64) -> i64 {
        self.grid.to_grid(value)
    }

    pub fn to_real(&self, value: i64) -> f64 {
        self.grid.to_real(value)
    }

    pub fn build_cached<F>(&self, signature: CellSignature, build: F) -> Result<Arc<Cell>>
    where
        F: FnOnce(&mut Cell) -> Result<()>,
    {
        build_cached(&self.cache, signature, build)
    }

    pub fn cell_count(&self) -> usize {
        self.cache.len()
    }

    pub fn find_cell_by_name(&self, name: &str) -> Option<Arc<Cell>> {
        self.cache.cells().into_iter().find(|c| c.name == name)
    }
}
