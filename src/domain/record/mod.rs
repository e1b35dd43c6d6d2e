// ============================================================
// RECORD DOMAIN LAYER
// ============================================================
// Target schema and the record shapes a row passes through:
// RawRecord -> MappedRecord -> ClassifiedRecord
// No I/O, no async

mod cell_value;
mod classified;
mod mapped;
mod raw_record;
mod target_field;

pub use cell_value::CellValue;
pub use classified::{ClassifiedRecord, RecordStatus};
pub use mapped::MappedRecord;
pub use raw_record::{RawField, RawRecord};
pub use target_field::TargetField;

use std::collections::HashMap;

/// Header -> target field assignment computed once per table
pub type HeaderAssignment = HashMap<String, TargetField>;
