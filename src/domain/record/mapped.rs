// ============================================================
// MAPPED RECORD
// ============================================================
// A row reshaped onto exactly the four target fields, pre-normalization

use serde::{Deserialize, Serialize};

use super::{CellValue, TargetField};

/// Row with one slot per target field. The struct shape guarantees that
/// every field is present and no other key exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedRecord {
    pub date: Option<CellValue>,
    pub full_name: Option<CellValue>,
    pub contact: Option<CellValue>,
    pub address: Option<CellValue>,
}

impl MappedRecord {
    pub fn get(&self, field: TargetField) -> Option<&CellValue> {
        match field {
            TargetField::Date => self.date.as_ref(),
            TargetField::FullName => self.full_name.as_ref(),
            TargetField::Contact => self.contact.as_ref(),
            TargetField::Address => self.address.as_ref(),
        }
    }

    pub fn set(&mut self, field: TargetField, value: Option<CellValue>) {
        let slot = match field {
            TargetField::Date => &mut self.date,
            TargetField::FullName => &mut self.full_name,
            TargetField::Contact => &mut self.contact,
            TargetField::Address => &mut self.address,
        };
        *slot = value;
    }
}
