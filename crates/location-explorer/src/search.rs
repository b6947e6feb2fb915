/// Pure query functions shared by every view: category filtering, free-text
/// search, id lookup, and the drill-down target for a location.
use explorer_common::mcp_api::FilterInfo;

use crate::model::Entity;

/// Category/subcategory selection. `None` matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

impl CategoryFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            subcategory: None,
        }
    }

    pub fn subcategory(category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            subcategory: Some(subcategory.into()),
        }
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| entity.category == c);
        let subcategory_ok = self
            .subcategory
            .as_deref()
            .map_or(true, |s| entity.subcategory.as_deref() == Some(s));
        category_ok && subcategory_ok
    }
}

impl From<CategoryFilter> for FilterInfo {
    fn from(filter: CategoryFilter) -> Self {
        FilterInfo {
            category: filter.category,
            subcategory: filter.subcategory,
        }
    }
}

pub fn filter(entities: &[Entity], filter: &CategoryFilter) -> Vec<Entity> {
    entities.iter().filter(|e| filter.matches(e)).cloned().collect()
}

/// Case-insensitive substring match over name, description, category and
/// subcategory. A blank term matches nothing.
pub fn search(entities: &[Entity], term: &str) -> Vec<Entity> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    entities
        .iter()
        .filter(|e| {
            e.name.to_lowercase().contains(&needle)
                || e.description.to_lowercase().contains(&needle)
                || e.category.to_lowercase().contains(&needle)
                || e
                    .subcategory
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// First entity with `id`; duplicate ids resolve to feed order.
pub fn find_by_id<'a>(entities: &'a [Entity], id: &str) -> Option<&'a Entity> {
    entities.iter().find(|e| e.id == id)
}

/// The category table a location belongs to: its subcategory table when it
/// has one, otherwise the whole category.
pub fn drill_down_target(entity: &Entity) -> CategoryFilter {
    match &entity.subcategory {
        Some(sub) => CategoryFilter::subcategory(&entity.category, sub),
        None => CategoryFilter::category(&entity.category),
    }
}
