//! Tabular results of a filing data run.
//!
//! A [`FilingTable`] has a `date` column holding the period end date reported in
//! each instance document, followed by one column per requested tag. Rows keep
//! the order in which filings were resolved; they are not sorted by date.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use super::error::Result;

/// Name of the column holding each filing's period end date.
pub const DATE_COLUMN: &str = "date";

/// A single extracted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Null,
}

impl FieldValue {
    /// Coerces extracted text to a number when it parses as one.
    ///
    /// Surrounding whitespace is ignored for parsing, but a value that does not
    /// parse is kept exactly as extracted. A missing element becomes `Null`.
    ///
    /// ```rust
    /// use edgar_clerk::FieldValue;
    ///
    /// assert_eq!(FieldValue::parse(Some("123.45")), FieldValue::Number(123.45));
    /// assert_eq!(FieldValue::parse(Some("N/A")), FieldValue::Text("N/A".to_string()));
    /// assert_eq!(FieldValue::parse(None), FieldValue::Null);
    /// ```
    pub fn parse(text: Option<&str>) -> Self {
        match text {
            None => FieldValue::Null,
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(number) => FieldValue::Number(number),
                Err(_) => FieldValue::Text(raw.to_string()),
            },
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// Values extracted from one filing's instance document.
#[derive(Debug, Clone, PartialEq)]
pub struct FilingRecord {
    /// Text of `dei:DocumentPeriodEndDate`
    pub date: String,
    /// One entry per requested tag, in request order
    pub values: Vec<(String, FieldValue)>,
}

impl FilingRecord {
    pub fn get(&self, tag: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, value)| value)
    }
}

impl Serialize for FilingRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry(DATE_COLUMN, &self.date)?;
        for (tag, value) in &self.values {
            map.serialize_entry(tag, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// Ordered filing records with inferred column types.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilingTable {
    columns: Vec<Column>,
    rows: Vec<FilingRecord>,
}

impl FilingTable {
    /// Assembles records into a table.
    ///
    /// A tag column is `Number` when it has at least one value and every non-null
    /// value is numeric; otherwise it is `Text`. Cells keep their own values either
    /// way, so a `Text` column may still hold numbers next to strings.
    pub fn from_records<S: AsRef<str>>(tags: &[S], rows: Vec<FilingRecord>) -> Self {
        let mut columns = vec![Column {
            name: DATE_COLUMN.to_string(),
            column_type: ColumnType::Text,
        }];

        for tag in tags.iter().map(AsRef::as_ref) {
            if columns.iter().any(|c| c.name == tag) {
                continue;
            }
            let mut values = rows
                .iter()
                .filter_map(|row| row.get(tag))
                .filter(|value| !value.is_null())
                .peekable();
            let numeric = values.peek().is_some()
                && values.all(|value| matches!(value, FieldValue::Number(_)));
            columns.push(Column {
                name: tag.to_string(),
                column_type: if numeric {
                    ColumnType::Number
                } else {
                    ColumnType::Text
                },
            });
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.column_type)
    }

    pub fn rows(&self) -> &[FilingRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Period end dates, in row order.
    pub fn dates(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.date.as_str()).collect()
    }

    /// Values of one tag column, in row order. `None` if the tag was not requested.
    pub fn column(&self, tag: &str) -> Option<Vec<&FieldValue>> {
        if tag == DATE_COLUMN || self.column_type(tag).is_none() {
            return None;
        }
        Some(self.rows.iter().filter_map(|row| row.get(tag)).collect())
    }

    /// Serializes the rows as a JSON array of objects.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.rows)?)
    }
}
