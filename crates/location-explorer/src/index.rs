/// Category → subcategory grouping over the canonical entity list.
///
/// Keys compare by exact string equality, so "Hiking" and "hiking " are
/// separate groups. `BTreeMap` keeps both levels in alphabetical order.
use std::collections::BTreeMap;

use explorer_common::mcp_api::{CategoryInfo, SubcategoryInfo};

use crate::model::Entity;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryGroup {
    /// Every entity in the category, in feed order.
    pub items: Vec<Entity>,
    pub subcategories: BTreeMap<String, Vec<Entity>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryIndex {
    groups: BTreeMap<String, CategoryGroup>,
}

pub fn build_index(entities: &[Entity]) -> CategoryIndex {
    let mut groups: BTreeMap<String, CategoryGroup> = BTreeMap::new();

    for entity in entities {
        let group = groups.entry(entity.category.clone()).or_default();
        group.items.push(entity.clone());
        if let Some(sub) = &entity.subcategory {
            group
                .subcategories
                .entry(sub.clone())
                .or_default()
                .push(entity.clone());
        }
    }

    CategoryIndex { groups }
}

impl CategoryIndex {
    pub fn get(&self, category: &str) -> Option<&CategoryGroup> {
        self.groups.get(category)
    }

    /// Items of one category, or of one subcategory within it. Unknown names
    /// yield an empty slice.
    pub fn items(&self, category: &str, subcategory: Option<&str>) -> &[Entity] {
        let Some(group) = self.get(category) else {
            return &[];
        };
        match subcategory {
            None => &group.items,
            Some(sub) => group.subcategories.get(sub).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Navigation-menu view: counts only, both levels sorted.
    pub fn summaries(&self) -> Vec<CategoryInfo> {
        self.groups
            .iter()
            .map(|(name, group)| CategoryInfo {
                name: name.clone(),
                location_count: group.items.len(),
                subcategories: group
                    .subcategories
                    .iter()
                    .map(|(sub, items)| SubcategoryInfo {
                        name: sub.clone(),
                        location_count: items.len(),
                    })
                    .collect(),
            })
            .collect()
    }
}
