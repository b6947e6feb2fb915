/// MCP server implementation for the location explorer.
///
/// Exposes six tools:
/// - `list_categories`: Category/subcategory menu with counts
/// - `list_locations`: Locations filtered by category and subcategory
/// - `search_locations`: Case-insensitive text search
/// - `get_location`: Look up a location by ID
/// - `map_markers`: Coloured markers and viewport for selected categories
/// - `reload_feed`: Re-fetch the spreadsheet feed
use std::collections::BTreeSet;
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::info;

use crate::loader::FeedLoader;
use crate::map::{self, MapViewport};
use crate::search::{self, CategoryFilter};
use crate::store::{FeedSnapshot, FeedStore, ReloadOutcome};
use explorer_common::mcp_api::{
    CategoriesResponse, GetLocationParams, ListLocationsParams, LocationDetailResponse,
    LocationInfo, LocationListResponse, MapMarkersParams, MapMarkersResponse,
    ReloadFeedResponse, SearchLocationsParams, SearchLocationsResponse,
};

const DEFAULT_SEARCH_LIMIT: u32 = 25;
const MAX_SEARCH_LIMIT: u32 = 200;

#[derive(Clone)]
pub struct LocationExplorerServer {
    store: Arc<FeedStore>,
    loader: Arc<FeedLoader>,
    tool_router: ToolRouter<LocationExplorerServer>,
}

impl LocationExplorerServer {
    pub fn new(store: Arc<FeedStore>, loader: Arc<FeedLoader>) -> Self {
        Self {
            store,
            loader,
            tool_router: Self::tool_router(),
        }
    }

    async fn current(&self) -> Result<Arc<FeedSnapshot>, String> {
        self.store
            .snapshot()
            .await
            .ok_or_else(|| "feed not loaded: call reload_feed to retry".to_string())
    }
}

#[tool_router]
impl LocationExplorerServer {
    #[tool(description = "List every location category with its subcategories and location counts, sorted alphabetically.")]
    async fn list_categories(&self) -> Result<Json<CategoriesResponse>, String> {
        let snapshot = self.current().await?;
        Ok(Json(CategoriesResponse {
            categories: snapshot.index.summaries(),
        }))
    }

    #[tool(description = "List locations, optionally restricted to an exact category and/or subcategory (case-sensitive). With no filter every location is returned.")]
    async fn list_locations(
        &self,
        Parameters(params): Parameters<ListLocationsParams>,
    ) -> Result<Json<LocationListResponse>, String> {
        let snapshot = self.current().await?;
        let filter = CategoryFilter {
            category: non_blank(params.category),
            subcategory: non_blank(params.subcategory),
        };

        let locations: Vec<LocationInfo> = match filter.category.as_deref() {
            Some(category) => snapshot
                .index
                .items(category, filter.subcategory.as_deref())
                .iter()
                .map(LocationInfo::from)
                .collect(),
            None => search::filter(&snapshot.entities, &filter)
                .iter()
                .map(LocationInfo::from)
                .collect(),
        };

        Ok(Json(LocationListResponse {
            filter: filter.into(),
            total: locations.len(),
            locations,
        }))
    }

    #[tool(description = "Search locations by name, description, category or subcategory. Matching is a case-insensitive substring match.")]
    async fn search_locations(
        &self,
        Parameters(params): Parameters<SearchLocationsParams>,
    ) -> Result<Json<SearchLocationsResponse>, String> {
        let query = params.query.trim().to_string();
        if query.is_empty() {
            return Err("query must not be empty".to_string());
        }

        let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(MAX_SEARCH_LIMIT) as usize;

        let snapshot = self.current().await?;
        let matches = search::search(&snapshot.entities, &query);

        Ok(Json(SearchLocationsResponse {
            query,
            total: matches.len(),
            results: matches.iter().take(limit).map(LocationInfo::from).collect(),
        }))
    }

    #[tool(description = "Get a single location by ID, together with the category view that lists it.")]
    async fn get_location(
        &self,
        Parameters(params): Parameters<GetLocationParams>,
    ) -> Result<Json<LocationDetailResponse>, String> {
        let location_id = params.location_id.trim().to_string();
        if location_id.is_empty() {
            return Err("location_id must not be empty".to_string());
        }

        let snapshot = self.current().await?;
        let entity = search::find_by_id(&snapshot.entities, &location_id)
            .ok_or_else(|| format!("location not found: {location_id}"))?;

        Ok(Json(LocationDetailResponse {
            location: LocationInfo::from(entity),
            drill_down: search::drill_down_target(entity).into(),
        }))
    }

    #[tool(description = "Map markers for the selected categories (all categories when omitted), each with its display colour, plus the map centre and zoom. Pass center_on to focus a specific location.")]
    async fn map_markers(
        &self,
        Parameters(params): Parameters<MapMarkersParams>,
    ) -> Result<Json<MapMarkersResponse>, String> {
        let snapshot = self.current().await?;

        let selected: BTreeSet<String> = match params.categories {
            Some(categories) => categories.into_iter().collect(),
            None => snapshot.index.categories().map(str::to_string).collect(),
        };

        let viewport = match non_blank(params.center_on) {
            Some(id) => search::find_by_id(&snapshot.entities, &id)
                .map(MapViewport::centered_on)
                .ok_or_else(|| format!("location not found: {id}"))?,
            None => MapViewport::default(),
        };

        Ok(Json(MapMarkersResponse {
            center_latitude: viewport.latitude,
            center_longitude: viewport.longitude,
            zoom: viewport.zoom,
            markers: map::markers(&snapshot.entities, &selected),
        }))
    }

    #[tool(description = "Re-fetch the spreadsheet feed and rebuild the category index. Use this to retry after a load failure or to pick up sheet edits.")]
    async fn reload_feed(&self) -> Result<Json<ReloadFeedResponse>, String> {
        info!("reload_feed tool invoked");

        let outcome = self
            .store
            .reload(self.loader.load())
            .await
            .map_err(|e| format!("reload failed: {e}"))?;

        let response = match outcome {
            ReloadOutcome::Installed {
                generation,
                revision,
                changed,
                location_count,
            } => ReloadFeedResponse {
                installed: true,
                changed,
                generation,
                revision,
                location_count,
            },
            ReloadOutcome::Superseded { generation, .. } => {
                let snapshot = self.current().await?;
                ReloadFeedResponse {
                    installed: false,
                    changed: false,
                    generation,
                    revision: snapshot.revision.clone(),
                    location_count: snapshot.entities.len(),
                }
            }
        };

        Ok(Json(response))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[tool_handler]
impl ServerHandler for LocationExplorerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "location-explorer".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Location explorer MCP server. Serves points of interest loaded from a \
                 spreadsheet feed. Use list_categories to browse the category menu, \
                 list_locations to drill into a category or subcategory, search_locations \
                 for free-text lookup, get_location for a single entry, map_markers for \
                 map display, and reload_feed to refresh or retry the feed."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::StatusCode;

    use crate::loader::LoadedFeed;
    use crate::loader::tests::{SAMPLE_CSV, loader_for, spawn_feed};

    async fn loaded_server() -> LocationExplorerServer {
        let store = Arc::new(FeedStore::new());
        store
            .reload(async { LoadedFeed::from_text(SAMPLE_CSV) })
            .await
            .expect("reload");
        LocationExplorerServer::new(store, Arc::new(loader_for("http://127.0.0.1:9")))
    }

    #[test]
    fn tools_publish_output_schemas() {
        let tools = LocationExplorerServer::tool_router().list_all();
        for name in [
            "list_categories",
            "list_locations",
            "search_locations",
            "get_location",
            "map_markers",
            "reload_feed",
        ] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }

    #[tokio::test]
    async fn reads_fail_before_first_load() {
        let server = LocationExplorerServer::new(
            Arc::new(FeedStore::new()),
            Arc::new(loader_for("http://127.0.0.1:9")),
        );
        let err = server.list_categories().await.err().expect("must fail");
        assert!(err.contains("reload_feed"));
    }

    #[tokio::test]
    async fn list_locations_applies_filter() {
        let server = loaded_server().await;
        let Json(all) = server
            .list_locations(Parameters(ListLocationsParams::default()))
            .await
            .expect("list");
        assert_eq!(all.total, 2);

        let Json(hiking) = server
            .list_locations(Parameters(ListLocationsParams {
                category: Some("Hiking".to_string()),
                subcategory: Some("Day Hikes".to_string()),
            }))
            .await
            .expect("list");
        assert_eq!(hiking.total, 1);
        assert_eq!(hiking.locations[0].id, "1");
        assert_eq!(hiking.filter.subcategory.as_deref(), Some("Day Hikes"));
    }

    #[tokio::test]
    async fn search_rejects_blank_query_and_applies_limit() {
        let server = loaded_server().await;
        let err = server
            .search_locations(Parameters(SearchLocationsParams {
                query: "  ".to_string(),
                limit: None,
            }))
            .await
            .err()
            .expect("blank query");
        assert_eq!(err, "query must not be empty");

        let Json(found) = server
            .search_locations(Parameters(SearchLocationsParams {
                query: "LAKE".to_string(),
                limit: Some(10),
            }))
            .await
            .expect("search");
        assert_eq!(found.total, 1);
        assert_eq!(found.results[0].name, "Emerald Bay");
    }

    #[tokio::test]
    async fn get_location_reports_drill_down() {
        let server = loaded_server().await;
        let Json(detail) = server
            .get_location(Parameters(GetLocationParams {
                location_id: "1".to_string(),
            }))
            .await
            .expect("get");
        assert_eq!(detail.location.url.as_deref(), Some("https://example.com/emerald"));
        assert_eq!(detail.drill_down.category.as_deref(), Some("Hiking"));
        assert_eq!(detail.drill_down.subcategory.as_deref(), Some("Day Hikes"));

        let wire = serde_json::to_value(&detail).expect("json");
        assert_eq!(wire["location"]["id"], "1");
        assert_eq!(wire["drill_down"]["category"], "Hiking");

        let err = server
            .get_location(Parameters(GetLocationParams {
                location_id: "3".to_string(),
            }))
            .await
            .err()
            .expect("row 3 was dropped");
        assert!(err.contains("not found"));
    }

    #[tokio::test]
    async fn map_markers_select_and_center() {
        let server = loaded_server().await;
        let Json(all) = server
            .map_markers(Parameters(MapMarkersParams::default()))
            .await
            .expect("markers");
        assert_eq!(all.markers.len(), 2);
        assert_eq!(all.zoom, 8);

        let Json(camping) = server
            .map_markers(Parameters(MapMarkersParams {
                categories: Some(vec!["Camping".to_string()]),
                center_on: Some("2".to_string()),
            }))
            .await
            .expect("markers");
        assert_eq!(camping.markers.len(), 1);
        assert_eq!(camping.markers[0].color, "#28a745");
        assert_eq!(camping.zoom, 12);
        assert_eq!(camping.center_latitude, 38.72);
    }

    #[tokio::test]
    async fn reload_feed_fetches_and_reports() {
        let host = spawn_feed(StatusCode::OK, SAMPLE_CSV).await;
        let server =
            LocationExplorerServer::new(Arc::new(FeedStore::new()), Arc::new(loader_for(&host)));

        let Json(first) = server.reload_feed().await.expect("reload");
        assert!(first.installed && first.changed);
        assert_eq!(first.location_count, 2);

        let Json(second) = server.reload_feed().await.expect("reload");
        assert!(second.installed);
        assert!(!second.changed);
        assert_eq!(second.generation, 2);
        assert_eq!(second.revision, first.revision);
    }

    #[tokio::test]
    async fn reload_feed_surfaces_unavailable_feed() {
        let host = spawn_feed(StatusCode::NOT_FOUND, "gone").await;
        let server =
            LocationExplorerServer::new(Arc::new(FeedStore::new()), Arc::new(loader_for(&host)));
        let err = server.reload_feed().await.err().expect("must fail");
        assert!(err.contains("status 404"), "{err}");
    }
}
