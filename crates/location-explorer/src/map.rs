/// Map-facing projections: marker colours, viewport, and category selection.
use std::collections::BTreeSet;

use explorer_common::mcp_api::MapMarkerInfo;

use crate::model::Entity;

pub const FALLBACK_COLOR: &str = "#6c757d";

const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("Camping", "#28a745"),
    ("Backpacking", "#6f42c1"),
    ("Winter activities", "#17a2b8"),
    ("Hiking", "#fd7e14"),
    ("Water activities", "#007bff"),
    ("Rock climbing", "#dc3545"),
    ("Cycling", "#20c997"),
    ("Educational", "#ffc107"),
    ("Service", "#6c757d"),
];

pub fn category_color(category: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map_or(FALLBACK_COLOR, |(_, color)| *color)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

impl Default for MapViewport {
    /// Northern California overview.
    fn default() -> Self {
        Self {
            latitude: 38.5,
            longitude: -121.0,
            zoom: 8,
        }
    }
}

impl MapViewport {
    pub fn centered_on(entity: &Entity) -> Self {
        Self {
            latitude: entity.latitude,
            longitude: entity.longitude,
            zoom: 12,
        }
    }
}

/// Markers for entities whose category is selected, in feed order.
pub fn markers(entities: &[Entity], selected: &BTreeSet<String>) -> Vec<MapMarkerInfo> {
    entities
        .iter()
        .filter(|e| selected.contains(&e.category))
        .map(|e| MapMarkerInfo {
            id: e.id.clone(),
            name: e.name.clone(),
            latitude: e.latitude,
            longitude: e.longitude,
            category: e.category.clone(),
            color: category_color(&e.category).to_string(),
        })
        .collect()
}
