use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{PcellError, Result};
use crate::geometry::{BBox, Polygon};
use crate::layer::LayerKey;
use crate::port::Port;
use crate::signature::CellSignature;

/// Polygons grouped by layer.
pub type Shapes = BTreeMap<LayerKey, Vec<Polygon>>;

/// Unique instance identifier, handed to the layout kernel.
pub type CellId = Uuid;

/// A parametric layout cell: per-layer polygons plus named ports.
///
/// Identity is the [`CellSignature`]; once published through the cache a
/// cell is shared and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct Cell {
    pub id: CellId,
    pub name: String,
    signature: CellSignature,
    shapes: Shapes,
    ports: Vec<Port>,
}

impl Cell {
    pub fn new(signature: CellSignature) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: signature.cell_name(),
            signature,
            shapes: Shapes::new(),
            ports: Vec::new(),
        }
    }

    pub fn signature(&self) -> &CellSignature {
        &self.signature
    }

    pub fn add_polygon(&mut self, layer: LayerKey, polygon: Polygon) {
        self.shapes.entry(layer).or_default().push(polygon);
    }

    pub fn add_shapes(&mut self, shapes: Shapes) {
        for (layer, polygons) in shapes {
            self.shapes.entry(layer).or_default().extend(polygons);
        }
    }

    pub fn add_port(&mut self, port: Port) -> Result<()> {
        if self.port(&port.name).is_some() {
            return Err(PcellError::DuplicatePort(port.name));
        }
        self.ports.push(port);
        Ok(())
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Ports in creation order.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn shapes(&self) -> &Shapes {
        &self.shapes
    }

    pub fn layers(&self) -> impl Iterator<Item = LayerKey> + '_ {
        self.shapes.keys().copied()
    }

    pub fn polygons_on_layer(&self, layer: LayerKey) -> &[Polygon] {
        self.shapes.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn layer_bbox(&self, layer: LayerKey) -> Option<BBox> {
        self.polygons_on_layer(layer)
            .iter()
            .filter_map(Polygon::bbox)
            .reduce(|a, b| a.union(&b))
    }

    /// Bounding box of all geometry in this cell.
    pub fn bbox(&self) -> Option<BBox> {
        self.shapes
            .keys()
            .filter_map(|&layer| self.layer_bbox(layer))
            .reduce(|a, b| a.union(&b))
    }

    pub fn polygon_count(&self) -> usize {
        self.shapes.values().map(Vec::len).sum()
    }

    /// Diagnostic markers for every port, keyed by the port's layer.
    ///
    /// Returned as new geometry; the cell itself (and its identity) is untouched.
    pub fn port_markers(&self) -> Shapes {
        let mut markers = Shapes::new();
        for port in &self.ports {
            markers.entry(port.layer).or_default().push(port.marker());
        }
        markers
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

impl Eq for Cell {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    const WG: LayerKey = LayerKey(1);
    const SLAB: LayerKey = LayerKey(2);

    fn sample() -> Cell {
        Cell::new(CellSignature::new("sample").with("width", 1.0))
    }

    #[test]
    fn test_cell_add_geometry() {
        let mut cell = sample();
        cell.add_polygon(WG, Polygon::from_box(0, 0, 100, 50));
        cell.add_polygon(SLAB, Polygon::from_box(-10, -10, 110, 60));
        assert_eq!(cell.polygon_count(), 2);
        assert_eq!(cell.polygons_on_layer(WG).len(), 1);
        assert!(cell.polygons_on_layer(LayerKey(9)).is_empty());
        assert_eq!(cell.name, "sample_W1");
    }

    #[test]
    fn test_cell_bbox() {
        let mut cell = sample();
        cell.add_polygon(WG, Polygon::from_box(0, 0, 100, 50));
        cell.add_polygon(SLAB, Polygon::from_box(50, 25, 200, 75));
        let bb = cell.bbox().unwrap();
        assert_eq!(bb.min, Point::new(0, 0));
        assert_eq!(bb.max, Point::new(200, 75));
        assert_eq!(cell.layer_bbox(WG).unwrap().max, Point::new(100, 50));
    }

    #[test]
    fn test_duplicate_port_rejected() {
        let mut cell = sample();
        let p = Port::place("o1", Point::new(0, 0), 180.0, 100, WG).unwrap();
        cell.add_port(p.clone()).unwrap();
        assert!(matches!(cell.add_port(p), Err(PcellError::DuplicatePort(_))));
        assert_eq!(cell.ports().len(), 1);
    }

    #[test]
    fn test_port_markers_leave_cell_untouched() {
        let mut cell = sample();
        cell.add_polygon(WG, Polygon::from_box(0, -50, 1000, 50));
        cell.add_port(Port::place("o1", Point::new(0, 0), 180.0, 100, WG).unwrap())
            .unwrap();
        cell.add_port(Port::place("o2", Point::new(1000, 0), 0.0, 100, WG).unwrap())
            .unwrap();
        let markers = cell.port_markers();
        assert_eq!(markers[&WG].len(), 2);
        assert_eq!(cell.polygon_count(), 1);
    }

    #[test]
    fn test_equality_is_signature() {
        let a = sample();
        let b = sample();
        assert_ne!(a.id, b.id);
        assert_eq!(a, b);
    }
}
