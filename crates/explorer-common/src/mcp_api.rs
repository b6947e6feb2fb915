use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListLocationsParams {
    /// Exact category name such as "Hiking". Omit to match every category.
    pub category: Option<String>,
    /// Exact subcategory name such as "Day Hikes". Omit to match every subcategory.
    pub subcategory: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchLocationsParams {
    /// Case-insensitive text matched against name, description, category and subcategory.
    pub query: String,
    /// Maximum number of results to return (default: 25, max: 200).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetLocationParams {
    /// Location ID as it appears in the feed's `id` column.
    pub location_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct MapMarkersParams {
    /// Categories to show. Omit to show every category; an empty list shows nothing.
    pub categories: Option<Vec<String>>,
    /// Location ID to centre the map on. Omit for the default viewport.
    pub center_on: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocationInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub subcategory: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FilterInfo {
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubcategoryInfo {
    pub name: String,
    pub location_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryInfo {
    pub name: String,
    pub location_count: usize,
    pub subcategories: Vec<SubcategoryInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocationListResponse {
    pub filter: FilterInfo,
    pub total: usize,
    pub locations: Vec<LocationInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchLocationsResponse {
    pub query: String,
    /// Number of matches before `limit` was applied.
    pub total: usize,
    pub results: Vec<LocationInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocationDetailResponse {
    pub location: LocationInfo,
    /// Category view that lists this location.
    pub drill_down: FilterInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MapMarkerInfo {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    /// Hex colour such as "#28a745".
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MapMarkersResponse {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom: u8,
    pub markers: Vec<MapMarkerInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReloadFeedResponse {
    /// A newer snapshot was installed by this reload.
    pub installed: bool,
    /// Feed content differs from the previously installed snapshot.
    pub changed: bool,
    pub generation: u64,
    pub revision: String,
    pub location_count: usize,
}
