// ============================================================
// DEDUPLICATOR
// ============================================================
// Collapse records sharing (FULL NAME, CONTACT, DATE), first seen wins

use std::collections::HashSet;

use crate::domain::record::ClassifiedRecord;

const KEY_SEPARATOR: &str = "-";
const NULL_KEY_PART: &str = "null";

/// Composite identity of a record. Nulls are keyed as the literal "null",
/// so records empty in all three fields collapse together.
pub fn identity_key(record: &ClassifiedRecord) -> String {
    [&record.full_name, &record.contact, &record.date]
        .iter()
        .map(|part| part.as_deref().unwrap_or(NULL_KEY_PART))
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

/// Drop every record whose key was already seen, preserving the relative
/// order of survivors. Returns the survivors and how many were removed.
pub fn dedupe(records: Vec<ClassifiedRecord>) -> (Vec<ClassifiedRecord>, usize) {
    let input_len = records.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(input_len);

    let kept: Vec<ClassifiedRecord> = records
        .into_iter()
        .filter(|record| seen.insert(identity_key(record)))
        .collect();

    let removed = input_len - kept.len();
    (kept, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::CellValue;

    fn record(name: Option<&str>, contact: Option<&str>, date: Option<&str>, address: &str) -> ClassifiedRecord {
        ClassifiedRecord::new(
            date.map(String::from),
            name.map(String::from),
            contact.map(String::from),
            Some(CellValue::text(address)),
        )
    }

    #[test]
    fn test_identity_key_shape() {
        let r = record(Some("Ann Lee"), None, Some("2020-01-05"), "x");
        assert_eq!(identity_key(&r), "Ann Lee-null-2020-01-05");
    }

    #[test]
    fn test_first_seen_is_kept_in_order() {
        let r1 = record(Some("Ann"), Some("123456"), Some("2020-01-05"), "first");
        let r2 = record(Some("Bob"), Some("654321"), None, "other");
        let r3 = record(Some("Ann"), Some("123456"), Some("2020-01-05"), "second");

        let (kept, removed) = dedupe(vec![r1.clone(), r2.clone(), r3]);
        assert_eq!(kept, vec![r1, r2]);
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_address_is_not_part_of_identity() {
        let a = record(Some("Ann"), Some("123456"), None, "1 Main St");
        let b = record(Some("Ann"), Some("123456"), None, "2 Side St");
        let (kept, removed) = dedupe(vec![a, b]);
        assert_eq!(kept.len(), 1);
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_fully_empty_records_collapse() {
        let empty = || ClassifiedRecord::new(None, None, None, None);
        let (kept, removed) = dedupe(vec![empty(), empty(), empty()]);
        assert_eq!(kept.len(), 1);
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let input = vec![
            record(Some("Ann"), Some("123456"), None, "a"),
            record(Some("Ann"), Some("123456"), None, "b"),
            record(Some("Cy"), None, None, "c"),
        ];
        let (once, _) = dedupe(input);
        let (twice, removed) = dedupe(once.clone());
        assert_eq!(once, twice);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_empty_input() {
        let (kept, removed) = dedupe(Vec::new());
        assert!(kept.is_empty());
        assert_eq!(removed, 0);
    }
}
