// ============================================================
// RAW RECORD
// ============================================================
// One decoded row, headers in source order

use serde::{Deserialize, Serialize};

use super::CellValue;

/// A single header/value pair from a decoded row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawField {
    /// Header exactly as the decoder produced it
    pub name: String,

    /// Cell value, `None` when blank or absent
    pub value: Option<CellValue>,
}

impl RawField {
    pub fn new(name: impl Into<String>, value: Option<CellValue>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A single row from a source table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub fields: Vec<RawField>,
}

impl RawRecord {
    pub fn new(fields: Vec<RawField>) -> Self {
        Self { fields }
    }

    /// Build a record of text cells; empty strings become absent values
    pub fn from_text_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, value)| {
                let value = if value.trim().is_empty() {
                    None
                } else {
                    Some(CellValue::text(value))
                };
                RawField::new(name, value)
            })
            .collect();

        Self { fields }
    }

    /// Value under `header`; a missing key and an explicit null both yield `None`
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .rev()
            .find(|f| f.name == header)
            .and_then(|f| f.value.as_ref())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|f| f.value.is_none())
    }
}
