// ============================================================
// RECORD MAPPER
// ============================================================
// Reshape a raw row onto the four target fields

use crate::domain::record::{HeaderAssignment, MappedRecord, RawRecord};

/// Copy matched headers into their target slots. Unmatched target fields
/// stay `None`. When two headers map to the same field the later header
/// in row order wins, including when its value is absent.
pub fn map_record(raw: &RawRecord, assignment: &HeaderAssignment) -> MappedRecord {
    let mut mapped = MappedRecord::default();

    for field in &raw.fields {
        if let Some(target) = assignment.get(&field.name) {
            mapped.set(*target, field.value.clone());
        }
    }

    mapped
}
