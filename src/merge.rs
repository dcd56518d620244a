//! Root-level overlay merging for raw configuration documents.
//!
//! Layers are merged key-by-key at the root: a key present in the
//! overlay replaces the base value wholesale, including entire project
//! substructures. There is deliberately no deep merging — a user who
//! redefines `CMIP6` redefines all of it.

use serde_json::{Map, Value};

/// Overlay one raw document over another; overlay keys win.
pub fn overlay(base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    let mut merged = base;
    for (key, value) in overlay {
        merged.insert(key, value);
    }
    merged
}

/// Merge documents in order, later ones taking precedence.
pub fn overlay_all(layers: impl IntoIterator<Item = Map<String, Value>>) -> Map<String, Value> {
    layers.into_iter().fold(Map::new(), overlay)
}
