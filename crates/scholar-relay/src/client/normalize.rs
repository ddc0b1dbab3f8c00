//! Shape checks that turn raw API JSON into typed payloads.
//!
//! The API echoes every requested top-level field (null when unknown), so a
//! missing key means the body is not what the operation expects.

use serde_json::{Map, Value};

use crate::config::fields::EDGE_ATTRIBUTES;
use crate::error::{ClientError, ClientResult};
use crate::models::{CitationEdge, EdgeDirection, EdgePage, PaperPage, PaperRecord};

/// Top-level keys a field selector string asks for.
///
/// `authors.name,year` yields `["authors", "year"]`.
#[must_use]
pub fn top_level_fields(fields: &str) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for field in fields.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        let top = field.split('.').next().unwrap_or(field);
        if !out.contains(&top) {
            out.push(top);
        }
    }
    out
}

/// Validate a paper detail body.
pub fn paper_record(body: Value, fields: &str) -> ClientResult<PaperRecord> {
    let map = into_object(body, "paper")?;
    let wanted = top_level_fields(fields);
    check_fields(&map, &wanted, "paper")?;
    Ok(PaperRecord::new(map))
}

/// Validate a search or author-papers body.
pub fn paper_page(body: Value, fields: &str) -> ClientResult<PaperPage> {
    let mut map = into_object(body, "paper list")?;
    let total = cursor(&map, "total")?;
    let offset = cursor(&map, "offset")?;
    let next = cursor(&map, "next")?;

    // Search omits `data` entirely when nothing matched.
    let entries = match map.remove("data") {
        Some(data) => into_array(data, "paper list")?,
        None if total == Some(0) => Vec::new(),
        None => return Err(ClientError::malformed("paper list: missing 'data'")),
    };

    let wanted = top_level_fields(fields);
    let data = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let context = format!("paper list entry {i}");
            let map = into_object(entry, &context)?;
            check_fields(&map, &wanted, &context)?;
            Ok(PaperRecord::new(map))
        })
        .collect::<ClientResult<Vec<_>>>()?;

    Ok(PaperPage { total, offset, next, data })
}

/// Validate a citations or references body.
pub fn edge_page(body: Value, direction: EdgeDirection, fields: &str) -> ClientResult<EdgePage> {
    let label = direction.label();
    let mut map = into_object(body, label)?;
    let offset = cursor(&map, "offset")?;
    let next = cursor(&map, "next")?;

    let entries = match map.remove("data") {
        Some(data) => into_array(data, label)?,
        None => return Err(ClientError::malformed(format!("{label}: missing 'data'"))),
    };

    let (edge_fields, paper_fields): (Vec<&str>, Vec<&str>) =
        top_level_fields(fields).into_iter().partition(|f| EDGE_ATTRIBUTES.contains(f));

    let key = direction.paper_key();
    let data = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let context = format!("{label} entry {i}");
            let mut attributes = into_object(entry, &context)?;
            check_fields(&attributes, &edge_fields, &context)?;

            let paper = attributes
                .remove(key)
                .ok_or_else(|| ClientError::malformed(format!("{context}: missing '{key}'")))?;
            let paper_context = format!("{context} {key}");
            let paper = into_object(paper, &paper_context)?;
            check_fields(&paper, &paper_fields, &paper_context)?;

            Ok(CitationEdge { direction, paper: PaperRecord::new(paper), attributes })
        })
        .collect::<ClientResult<Vec<_>>>()?;

    Ok(EdgePage { offset, next, data })
}

fn into_object(value: Value, context: &str) -> ClientResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ClientError::malformed(format!(
            "{context}: expected an object, got {}",
            type_name(&other)
        ))),
    }
}

fn into_array(value: Value, context: &str) -> ClientResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(ClientError::malformed(format!(
            "{context}: 'data' should be an array, got {}",
            type_name(&other)
        ))),
    }
}

fn check_fields(map: &Map<String, Value>, wanted: &[&str], context: &str) -> ClientResult<()> {
    let missing: Vec<&str> = wanted.iter().copied().filter(|f| !map.contains_key(*f)).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ClientError::malformed(format!(
            "{context}: missing field(s) {}",
            missing.join(", ")
        )))
    }
}

fn cursor(map: &Map<String, Value>, key: &str) -> ClientResult<Option<u64>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| ClientError::malformed(format!("'{key}' is not a non-negative integer"))),
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
