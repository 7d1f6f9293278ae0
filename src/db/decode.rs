//! Normalization of pipeline results into plain values.
//!
//! Depending on the server version a cell is either a bare JSON scalar or a
//! tagged `{"type": .., "value": ..}` object, and numbers frequently arrive
//! as text. [`decode`] removes the envelope; the typed accessors on [`Row`]
//! apply per-field coercion and report anything they cannot convert as a
//! protocol error instead of guessing.

use serde_json::Value;

use crate::db::client::DbError;

/// Strip the `{type, value}` envelope from a cell, if there is one.
pub fn decode(cell: &Value) -> Value {
    match cell {
        Value::Object(map) => match map.get("value") {
            Some(value) => value.clone(),
            None if map.get("type").and_then(Value::as_str) == Some("null") => Value::Null,
            None => cell.clone(),
        },
        _ => cell.clone(),
    }
}

/// Types that can be built from one named-column result row.
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> Result<Self, DbError>;
}

#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    affected_row_count: u64,
    last_insert_rowid: Option<i64>,
}

impl ResultSet {
    pub fn new(
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
        affected_row_count: u64,
        last_insert_rowid: Option<i64>,
    ) -> Self {
        Self {
            columns,
            rows,
            affected_row_count,
            last_insert_rowid,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn affected_row_count(&self) -> u64 {
        self.affected_row_count
    }

    pub fn last_insert_rowid(&self) -> Option<i64> {
        self.last_insert_rowid
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    pub fn decode_all<T: FromRow>(&self) -> Result<Vec<T>, DbError> {
        self.rows().map(|row| T::from_row(&row)).collect()
    }

    pub fn decode_first<T: FromRow>(&self) -> Result<Option<T>, DbError> {
        self.rows().next().map(|row| T::from_row(&row)).transpose()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    cells: &'a [Value],
}

impl<'a> Row<'a> {
    /// The decoded value of `column`.
    pub fn value(&self, column: &str) -> Result<Value, DbError> {
        let index = self
            .columns
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| DbError::Protocol(format!("missing column `{}`", column)))?;
        self.cells
            .get(index)
            .map(decode)
            .ok_or_else(|| DbError::Protocol(format!("row has no cell for column `{}`", column)))
    }

    pub fn get_i64(&self, column: &str) -> Result<i64, DbError> {
        self.get_opt_i64(column)?
            .ok_or_else(|| unexpected_null(column))
    }

    pub fn get_opt_i64(&self, column: &str) -> Result<Option<i64>, DbError> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(Some)
                .ok_or_else(|| not_coercible(column, "an integer", &number.to_string())),
            Value::String(text) => text
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| not_coercible(column, "an integer", &text)),
            other => Err(not_coercible(column, "an integer", &other.to_string())),
        }
    }

    pub fn get_opt_f64(&self, column: &str) -> Result<Option<f64>, DbError> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::Number(number) => number
                .as_f64()
                .map(Some)
                .ok_or_else(|| not_coercible(column, "a float", &number.to_string())),
            Value::String(text) => text
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| not_coercible(column, "a float", &text)),
            other => Err(not_coercible(column, "a float", &other.to_string())),
        }
    }

    pub fn get_string(&self, column: &str) -> Result<String, DbError> {
        self.get_opt_string(column)?
            .ok_or_else(|| unexpected_null(column))
    }

    pub fn get_opt_string(&self, column: &str) -> Result<Option<String>, DbError> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(text)),
            Value::Number(number) => Ok(Some(number.to_string())),
            other => Err(not_coercible(column, "text", &other.to_string())),
        }
    }
}

fn unexpected_null(column: &str) -> DbError {
    DbError::Protocol(format!("column `{}` is unexpectedly null", column))
}

fn not_coercible(column: &str, expected: &str, found: &str) -> DbError {
    DbError::Protocol(format!("column `{}` is not {}: {}", column, expected, found))
}
