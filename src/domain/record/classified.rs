// ============================================================
// CLASSIFIED RECORD
// ============================================================
// Normalized row plus completeness status

use serde::{Deserialize, Serialize};

use super::{CellValue, TargetField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Valid,
    MissingFields,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStatus::Valid => write!(f, "VALID"),
            RecordStatus::MissingFields => write!(f, "MISSING_FIELDS"),
        }
    }
}

/// A normalized record. `status` is derived from the four values and is
/// recomputed on deserialization, so a client cannot submit an
/// inconsistent tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ClassifiedRecordWire")]
pub struct ClassifiedRecord {
    #[serde(rename = "DATE")]
    pub date: Option<String>,

    #[serde(rename = "FULL NAME")]
    pub full_name: Option<String>,

    #[serde(rename = "CONTACT")]
    pub contact: Option<String>,

    #[serde(rename = "ADDRESS")]
    pub address: Option<CellValue>,

    pub status: RecordStatus,
}

impl ClassifiedRecord {
    pub fn new(
        date: Option<String>,
        full_name: Option<String>,
        contact: Option<String>,
        address: Option<CellValue>,
    ) -> Self {
        let complete =
            date.is_some() && full_name.is_some() && contact.is_some() && address.is_some();
        let status = if complete {
            RecordStatus::Valid
        } else {
            RecordStatus::MissingFields
        };

        Self {
            date,
            full_name,
            contact,
            address,
            status,
        }
    }

    /// Value of one field rendered as text, `None` when null
    pub fn field_text(&self, field: TargetField) -> Option<String> {
        match field {
            TargetField::Date => self.date.clone(),
            TargetField::FullName => self.full_name.clone(),
            TargetField::Contact => self.contact.clone(),
            TargetField::Address => self.address.as_ref().map(|a| a.to_display_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == RecordStatus::Valid
    }
}

#[derive(Deserialize)]
struct ClassifiedRecordWire {
    #[serde(rename = "DATE", default)]
    date: Option<String>,
    #[serde(rename = "FULL NAME", default)]
    full_name: Option<String>,
    #[serde(rename = "CONTACT", default)]
    contact: Option<String>,
    #[serde(rename = "ADDRESS", default)]
    address: Option<CellValue>,
}

impl From<ClassifiedRecordWire> for ClassifiedRecord {
    fn from(wire: ClassifiedRecordWire) -> Self {
        ClassifiedRecord::new(wire.date, wire.full_name, wire.contact, wire.address)
    }
}
