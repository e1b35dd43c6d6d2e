// ============================================================
// COMPLETENESS CLASSIFIER
// ============================================================
// Normalize a mapped row and tag it VALID or MISSING_FIELDS

use crate::application::use_cases::field_normalizer::{
    normalize_address, normalize_contact, normalize_date, normalize_name,
};
use crate::domain::record::{ClassifiedRecord, MappedRecord};

/// Apply the field normalizers, then derive the status from the
/// normalized values. Status is never computed on raw values.
pub fn classify(mapped: &MappedRecord) -> ClassifiedRecord {
    ClassifiedRecord::new(
        normalize_date(mapped.date.as_ref()),
        normalize_name(mapped.full_name.as_ref()),
        normalize_contact(mapped.contact.as_ref()),
        normalize_address(mapped.address.as_ref()),
    )
}
