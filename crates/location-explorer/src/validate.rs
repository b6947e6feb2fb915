/// Schema validation: materialized records in, canonical entity list out.
///
/// Rows failing the required-field contract are dropped whole. Nothing is
/// defaulted or repaired.
use tracing::{debug, info};

use crate::error::AppError;
use crate::model::{Entity, FieldValue, Record};

pub const REQUIRED_FIELDS: [&str; 6] = ["id", "name", "description", "latitude", "longitude", "category"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Missing(&'static str),
    NotNumeric(&'static str),
}

pub fn validate(records: &[Record]) -> Result<Vec<Entity>, AppError> {
    let mut entities = Vec::with_capacity(records.len());
    let mut rejected = 0usize;

    for (index, record) in records.iter().enumerate() {
        match to_entity(record) {
            Ok(entity) => entities.push(entity),
            Err(reason) => {
                rejected += 1;
                // +2: one for the header line, one for 1-based numbering
                debug!(row = index + 2, ?reason, "dropping invalid row");
            }
        }
    }

    info!(valid = entities.len(), rejected, "validated feed rows");

    if entities.is_empty() {
        return Err(AppError::NoValidRecords);
    }
    Ok(entities)
}

pub fn to_entity(record: &Record) -> Result<Entity, Rejection> {
    if let Some(missing) = REQUIRED_FIELDS
        .iter()
        .find(|field| record.get(field).map_or(true, FieldValue::is_empty))
    {
        return Err(Rejection::Missing(*missing));
    }

    Ok(Entity {
        id: required_text(record, "id")?,
        name: required_text(record, "name")?,
        description: required_text(record, "description")?,
        latitude: required_number(record, "latitude")?,
        longitude: required_number(record, "longitude")?,
        category: required_text(record, "category")?,
        subcategory: optional_text(record, "subcategory"),
        url: optional_text(record, "url"),
    })
}

fn required_text(record: &Record, field: &'static str) -> Result<String, Rejection> {
    record
        .get(field)
        .map(ToString::to_string)
        .ok_or(Rejection::Missing(field))
}

fn required_number(record: &Record, field: &'static str) -> Result<f64, Rejection> {
    record
        .get(field)
        .ok_or(Rejection::Missing(field))?
        .as_number()
        .ok_or(Rejection::NotNumeric(field))
}

fn optional_text(record: &Record, field: &str) -> Option<String> {
    record
        .get(field)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_records;

    const HEADER: &str = "id,name,description,latitude,longitude,category,subcategory,url";

    fn entities(rows: &[&str]) -> Result<Vec<Entity>, AppError> {
        let csv = format!("{HEADER}\n{}", rows.join("\n"));
        validate(&parse_records(&csv).expect("parse"))
    }

    #[test]
    fn keeps_complete_rows_in_order() {
        let list = entities(&[
            "b,Beta,Second,1,2,Hiking,,",
            "a,Alpha,First,3,4,Camping,Group,https://example.com",
        ])
        .expect("valid");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "b");
        assert_eq!(list[0].subcategory, None);
        assert_eq!(list[0].url, None);
        assert_eq!(list[1].subcategory.as_deref(), Some("Group"));
        assert_eq!(list[1].url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn empty_latitude_is_dropped_but_zero_is_kept() {
        let list = entities(&[
            "empty,Empty,Row,,4,Hiking",
            "zero,Zero,Row,0,4,Hiking",
        ])
        .expect("valid");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "zero");
        assert_eq!(list[0].latitude, 0.0);
    }

    #[test]
    fn missing_latitude_column_drops_row() {
        let csv = "id,name,description,longitude,category\n1,A,B,2,Hiking";
        let records = parse_records(csv).expect("parse");
        assert_eq!(to_entity(&records[0]), Err(Rejection::Missing("latitude")));
    }

    #[test]
    fn non_numeric_coordinate_drops_row() {
        let records = parse_records(&format!("{HEADER}\n1,A,B,north,2,Hiking")).expect("parse");
        assert_eq!(to_entity(&records[0]), Err(Rejection::NotNumeric("latitude")));
    }

    #[test]
    fn numeric_text_fields_render_as_text() {
        let list = entities(&["42,1999,Opened in,1,2,7"]).expect("valid");
        assert_eq!(list[0].id, "42");
        assert_eq!(list[0].name, "1999");
        assert_eq!(list[0].category, "7");
    }

    #[test]
    fn numeric_looking_text_is_kept_verbatim() {
        let list = entities(&[
            "007,1.50,Opened 1e3,1,2,Hiking",
            "12345678901234567891,Ridge,Desc,3,4,0010",
            "12345678901234567892,Ridge,Desc,3.50,4,10",
        ])
        .expect("valid");
        assert_eq!(list[0].id, "007");
        assert_eq!(list[0].name, "1.50");
        assert_eq!(list[1].id, "12345678901234567891");
        assert_ne!(list[1].id, list[2].id);
        assert_eq!(list[1].category, "0010");
        assert_ne!(list[1].category, list[2].category);
        assert_eq!(list[2].latitude, 3.5);
    }

    #[test]
    fn duplicates_are_kept() {
        let list = entities(&["1,A,B,1,2,Hiking", "1,A,B,1,2,Hiking"]).expect("valid");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], list[1]);
    }

    #[test]
    fn all_rows_missing_category_is_an_error() {
        let err = entities(&["1,A,B,1,2,,", "2,C,D,3,4,,"]).expect_err("must fail");
        assert!(matches!(err, AppError::NoValidRecords));
    }
}
