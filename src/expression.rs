//! Generation of backend query clauses from parsed search parameters.
//!
//! For every mapped field, the parameters matching the field's type category
//! are rendered into engine clauses: numeric fields take numeric parameters,
//! date fields take date parameters, text and keyword fields take literal
//! text parameters. Fields of any other type are skipped with a warning.
//!
//! Text matching semantics follow the engine's text analysis: against a
//! `keyword` field a text parameter is an exact, case-insensitive term;
//! against an analyzed `text` field it is a case-insensitive containment
//! wildcard. Generated clauses are always scored; unscored clauses only ever
//! come from named filters.

use serde_json::{Value, json};
use tracing::warn;

use crate::mapping::{FieldCategory, IndexMapping};
use crate::query::datetime::{BACKEND_DATE_FORMATS, format_date_time};
use crate::query::{Bound, SearchQuery, SearchQueryParam};

/// Categorize the mapped fields, skipping unsupported types with a warning.
fn categorized_fields(mapping: &IndexMapping) -> Vec<(&str, FieldCategory)> {
    mapping
        .properties
        .iter()
        .filter_map(|prop| match FieldCategory::of(&prop.field_type) {
            Some(category) => Some((prop.name.as_str(), category)),
            None => {
                warn!(
                    property_name = %prop.name,
                    property_type = %prop.field_type,
                    "met unsupported property type"
                );
                None
            }
        })
        .collect()
}

/// Render all applicable (parameter, field) clause pairs, in mapping order.
pub fn build_expressions(query: &SearchQuery, mapping: &IndexMapping) -> Vec<Value> {
    let fields = categorized_fields(mapping);
    let mut expressions = Vec::new();

    for (name, category) in fields {
        let params: Vec<&SearchQueryParam> = match category {
            FieldCategory::Numeric => query.numeric_params().collect(),
            FieldCategory::Date => query.date_params().collect(),
            FieldCategory::Text | FieldCategory::Keyword => query.text_params().collect(),
        };

        expressions.extend(
            params
                .into_iter()
                .filter_map(|param| render(param, name, category)),
        );
    }

    expressions
}

/// Render the clauses of each parsed word as one group, in word order.
///
/// A word's group holds its clauses against every applicable field; a hit
/// satisfies the word when any one of them matches. Words that render no
/// clause at all are dropped. Used by the Must strategy, where every word
/// must match somewhere but not necessarily on the same field.
pub fn build_expression_groups(query: &SearchQuery, mapping: &IndexMapping) -> Vec<Vec<Value>> {
    let fields = categorized_fields(mapping);

    query
        .params()
        .iter()
        .map(|param| {
            fields
                .iter()
                .filter_map(|(name, category)| render(param, name, *category))
                .collect::<Vec<Value>>()
        })
        .filter(|group| !group.is_empty())
        .collect()
}

/// Render one parameter against one field, `None` when the parameter kind
/// does not apply to the field's category.
fn render(param: &SearchQueryParam, field: &str, category: FieldCategory) -> Option<Value> {
    match (category, param) {
        (FieldCategory::Numeric, SearchQueryParam::NumericExact { value, .. }) => {
            Some(json!({"term": {field: value}}))
        }
        (FieldCategory::Numeric, SearchQueryParam::NumericRange { lower, upper, .. }) => {
            let mut body = serde_json::Map::new();
            match lower {
                Bound::Included(v) => {
                    body.insert("gte".to_string(), json!(v));
                }
                Bound::Excluded(v) => {
                    body.insert("gt".to_string(), json!(v));
                }
                Bound::Unbounded => {}
            }
            match upper {
                Bound::Included(v) => {
                    body.insert("lte".to_string(), json!(v));
                }
                Bound::Excluded(v) => {
                    body.insert("lt".to_string(), json!(v));
                }
                Bound::Unbounded => {}
            }
            if body.is_empty() {
                return None;
            }
            Some(json!({"range": {field: body}}))
        }
        (FieldCategory::Date, SearchQueryParam::DateExact { value, .. }) => {
            // Day-precision bounds; the engine rounds `lte` up to the end
            // of the day, so this covers entries at any time-of-day.
            let day = value.format("%d.%m.%Y").to_string();
            Some(json!({
                "range": {field: {"gte": day, "lte": day, "format": BACKEND_DATE_FORMATS}}
            }))
        }
        (FieldCategory::Date, SearchQueryParam::DateRange { lower, upper, .. }) => {
            let mut body = serde_json::Map::new();
            match lower {
                Bound::Included(v) => {
                    body.insert("gte".to_string(), json!(format_date_time(v)));
                }
                Bound::Excluded(v) => {
                    body.insert("gt".to_string(), json!(format_date_time(v)));
                }
                Bound::Unbounded => {}
            }
            match upper {
                Bound::Included(v) => {
                    body.insert("lte".to_string(), json!(format_date_time(v)));
                }
                Bound::Excluded(v) => {
                    body.insert("lt".to_string(), json!(format_date_time(v)));
                }
                Bound::Unbounded => {}
            }
            if body.is_empty() {
                return None;
            }
            body.insert("format".to_string(), json!(BACKEND_DATE_FORMATS));
            Some(json!({"range": {field: body}}))
        }
        (FieldCategory::Keyword, SearchQueryParam::Text { value, .. }) => Some(json!({
            "term": {field: {"value": value, "case_insensitive": true}}
        })),
        (FieldCategory::Text, SearchQueryParam::Text { value, .. }) => Some(json!({
            "wildcard": {field: {
                "value": format!("*{}*", value.to_lowercase()),
                "case_insensitive": true
            }}
        })),
        _ => None,
    }
}
