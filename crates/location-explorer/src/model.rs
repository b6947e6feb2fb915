use std::fmt;

use explorer_common::mcp_api::LocationInfo;

/// A materialized cell: numeric when the text is an unambiguous number.
///
/// Numbers keep the cell text they were read from, so rendering one back as
/// a string returns exactly what the sheet held.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number { value: f64, raw: String },
    Text(String),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number { value, .. } => Some(*value),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number { raw, .. } | FieldValue::Text(raw) => f.write_str(raw),
        }
    }
}

/// Header-keyed row, in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Insert or overwrite; an overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub subcategory: Option<String>,
    pub url: Option<String>,
}

impl From<&Entity> for LocationInfo {
    fn from(entity: &Entity) -> Self {
        LocationInfo {
            id: entity.id.clone(),
            name: entity.name.clone(),
            description: entity.description.clone(),
            latitude: entity.latitude,
            longitude: entity.longitude,
            category: entity.category.clone(),
            subcategory: entity.subcategory.clone(),
            url: entity.url.clone(),
        }
    }
}
