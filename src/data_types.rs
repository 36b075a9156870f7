// src/data_types.rs
use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::PayloadError;

/// Opaque token naming a spreadsheet on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpreadsheetId(String);

impl SpreadsheetId {
    pub fn new(id: impl Into<String>) -> Self {
        SpreadsheetId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpreadsheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpreadsheetId {
    fn from(id: &str) -> Self {
        SpreadsheetId::new(id)
    }
}

impl From<String> for SpreadsheetId {
    fn from(id: String) -> Self {
        SpreadsheetId(id)
    }
}

/// A single scalar cell, kept exactly as the service sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// Ordered rows of ordered scalar cells, plus column labels when the
/// service sent rows as objects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularPayload {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<CellValue>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RowShape {
    Positional,
    Labelled,
}

impl TabularPayload {
    pub fn empty() -> Self {
        TabularPayload {
            headers: None,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        TabularPayload {
            headers: None,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row, or the number of labels if that is larger.
    pub fn column_count(&self) -> usize {
        let widest = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let labelled = self.headers.as_ref().map_or(0, Vec::len);
        widest.max(labelled)
    }

    /// Decodes a response body. A blank body means "no rows".
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PayloadError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::empty());
        }
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_json(value)
    }

    /// Accepts `null`, an array of scalar arrays, or an array of objects
    /// (plain or wrapped as `{"id", "data": {...}, "created_at"}` records).
    /// Row indices in errors are zero-based.
    pub fn from_json(value: Value) -> Result<Self, PayloadError> {
        let rows = match value {
            Value::Null => return Ok(Self::empty()),
            Value::Array(rows) => rows,
            other => return Err(PayloadError::NotARowList(json_kind(&other))),
        };

        let mut shape = None;
        for (i, row) in rows.iter().enumerate() {
            let this = match row {
                Value::Array(_) => RowShape::Positional,
                Value::Object(_) => RowShape::Labelled,
                Value::Null => continue,
                other => {
                    return Err(PayloadError::InvalidRow {
                        row: i,
                        found: json_kind(other),
                    })
                }
            };
            match shape {
                None => shape = Some(this),
                Some(seen) if seen != this => return Err(PayloadError::MixedRowShapes { row: i }),
                Some(_) => {}
            }
        }

        match shape {
            Some(RowShape::Labelled) => Self::decode_labelled(rows),
            _ => Self::decode_positional(rows),
        }
    }

    fn decode_positional(rows: Vec<Value>) -> Result<Self, PayloadError> {
        let mut decoded = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            match row {
                Value::Array(cells) => {
                    let cells = cells
                        .into_iter()
                        .enumerate()
                        .map(|(c, value)| decode_cell(i, c, value))
                        .collect::<Result<Vec<_>, _>>()?;
                    decoded.push(cells);
                }
                Value::Null => decoded.push(Vec::new()),
                other => {
                    return Err(PayloadError::InvalidRow {
                        row: i,
                        found: json_kind(&other),
                    })
                }
            }
        }
        Ok(Self::from_rows(decoded))
    }

    fn decode_labelled(rows: Vec<Value>) -> Result<Self, PayloadError> {
        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            match row {
                Value::Object(map) => records.push(unwrap_record(map)),
                Value::Null => records.push(Map::new()),
                other => {
                    return Err(PayloadError::InvalidRow {
                        row: i,
                        found: json_kind(&other),
                    })
                }
            }
        }

        // Columns appear in the order their keys are first seen.
        let mut labels: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for record in &records {
            for key in record.keys() {
                if !positions.contains_key(key) {
                    positions.insert(key.clone(), labels.len());
                    labels.push(key.clone());
                }
            }
        }

        let mut decoded = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let mut cells = vec![CellValue::Empty; labels.len()];
            for (key, value) in record {
                let column = positions[&key];
                cells[column] = decode_cell(i, column, value)?;
            }
            decoded.push(cells);
        }

        Ok(TabularPayload {
            headers: Some(labels),
            rows: decoded,
        })
    }
}

/// A record envelope contributes its `data` object; anything else is the row itself.
fn unwrap_record(mut map: Map<String, Value>) -> Map<String, Value> {
    if matches!(map.get("data"), Some(Value::Object(_))) {
        if let Some(Value::Object(data)) = map.remove("data") {
            return data;
        }
    }
    map
}

fn decode_cell(row: usize, column: usize, value: Value) -> Result<CellValue, PayloadError> {
    if value.is_array() || value.is_object() {
        return Err(PayloadError::NestedCell {
            row,
            column,
            found: json_kind(&value),
        });
    }
    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn positional_rows_keep_their_order() {
        let payload = TabularPayload::from_json(json!([["a", "b"], ["c", "d"]])).unwrap();
        assert_eq!(payload.headers, None);
        assert_eq!(
            payload.rows,
            vec![vec![text("a"), text("b")], vec![text("c"), text("d")]]
        );
    }

    #[test]
    fn scalars_are_not_coerced() {
        let payload = TabularPayload::from_json(json!([[1, 2.5, null, true, "7"]])).unwrap();
        let row = &payload.rows[0];
        assert_eq!(row[0].to_string(), "1");
        assert_eq!(row[1].to_string(), "2.5");
        assert_eq!(row[2], CellValue::Empty);
        assert_eq!(row[3], CellValue::Bool(true));
        assert_eq!(row[4], text("7"));
    }

    #[test]
    fn empty_and_missing_payloads_have_no_rows() {
        assert!(TabularPayload::from_json(json!([])).unwrap().is_empty());
        assert!(TabularPayload::from_json(Value::Null).unwrap().is_empty());
        assert!(TabularPayload::from_slice(b"").unwrap().is_empty());
        assert!(TabularPayload::from_slice(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn ragged_rows_are_left_ragged() {
        let payload = TabularPayload::from_json(json!([["a"], ["b", "c", "d"], null])).unwrap();
        assert_eq!(payload.rows[0].len(), 1);
        assert_eq!(payload.rows[1].len(), 3);
        assert!(payload.rows[2].is_empty());
        assert_eq!(payload.column_count(), 3);
    }

    #[test]
    fn object_rows_take_labels_in_first_seen_order() {
        let payload = TabularPayload::from_json(json!([
            {"name": "Ann", "age": 31},
            {"age": 40, "city": "Oulu"},
        ]))
        .unwrap();
        assert_eq!(
            payload.headers,
            Some(vec!["name".to_string(), "age".to_string(), "city".to_string()])
        );
        assert_eq!(payload.rows[0][2], CellValue::Empty);
        assert_eq!(payload.rows[1][0], CellValue::Empty);
        assert_eq!(payload.rows[1][2], text("Oulu"));
    }

    #[test]
    fn record_envelopes_contribute_their_data() {
        let payload = TabularPayload::from_json(json!([
            {"id": 1, "data": {"first_name": "Ann", "club": "OK"}, "created_at": "2025-01-01T00:00:00"},
            {"id": 2, "data": {"first_name": "Bo"}, "created_at": "2025-01-02T00:00:00"},
        ]))
        .unwrap();
        assert_eq!(
            payload.headers,
            Some(vec!["first_name".to_string(), "club".to_string()])
        );
        assert_eq!(payload.rows[1], vec![text("Bo"), CellValue::Empty]);
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert_eq!(
            TabularPayload::from_json(json!({"rows": []})),
            Err(PayloadError::NotARowList("an object"))
        );
        assert_eq!(
            TabularPayload::from_json(json!([["a"], 3])),
            Err(PayloadError::InvalidRow { row: 1, found: "a number" })
        );
        assert_eq!(
            TabularPayload::from_json(json!([["a", ["b"]]])),
            Err(PayloadError::NestedCell { row: 0, column: 1, found: "an array" })
        );
        assert_eq!(
            TabularPayload::from_json(json!([["a"], {"b": 1}])),
            Err(PayloadError::MixedRowShapes { row: 1 })
        );
        assert!(matches!(
            TabularPayload::from_slice(b"[[\"a\""),
            Err(PayloadError::Json(_))
        ));
    }
}
