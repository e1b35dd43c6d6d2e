// ============================================================
// LABELED-LINE SEGMENTER
// ============================================================
// Recover records from extracted text such as
//
//   Date: 2020-01-05 | Name: Ann Lee | Phone: 555 1234
//   Address: 1 Main St
//
// Values run to the next `|` or the end of the line. Headers of the
// produced records are exactly the marker names.

use crate::domain::record::{CellValue, RawField, RawRecord};

/// Marker prefix and the header it produces, in output order
const MARKERS: [(&str, &str); 4] = [
    ("Date:", "Date"),
    ("Name:", "Name"),
    ("Phone:", "Phone"),
    ("Address:", "Address"),
];

/// Markers needed before a record is kept
const MIN_MARKERS: usize = 3;

#[derive(Default)]
struct PendingRecord {
    values: [Option<Option<String>>; 4],
}

impl PendingRecord {
    fn seen(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    fn has(&self, marker: usize) -> bool {
        self.values[marker].is_some()
    }

    fn set(&mut self, marker: usize, value: &str) {
        let value = value.trim();
        self.values[marker] = Some(if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        });
    }

    fn into_record(self) -> RawRecord {
        let fields = MARKERS
            .iter()
            .zip(self.values)
            .filter_map(|((_, header), value)| {
                value.map(|v| RawField::new(*header, v.map(CellValue::Text)))
            })
            .collect();
        RawRecord::new(fields)
    }
}

/// Split text into records. A record is emitted when all four markers are
/// held, when a marker repeats while at least three are held, or at the
/// end of the text when at least three are held. A repeat with fewer than
/// three held drops the partial record.
///
/// Three markers are enough to keep a record but not to close it: the
/// record stays open so a fourth marker on a later line still joins it.
pub fn segment_labeled_lines(text: &str) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut current = PendingRecord::default();

    for line in text.lines() {
        for segment in line.split('|') {
            let segment = segment.trim();
            let Some((marker, value)) = match_marker(segment) else {
                continue;
            };

            if current.has(marker) {
                let finished = std::mem::take(&mut current);
                if finished.seen() >= MIN_MARKERS {
                    records.push(finished.into_record());
                } else {
                    tracing::debug!(markers = finished.seen(), "dropping incomplete labeled record");
                }
            }

            current.set(marker, value);
        }

        if current.seen() == MARKERS.len() {
            records.push(std::mem::take(&mut current).into_record());
        }
    }

    if current.seen() >= MIN_MARKERS {
        records.push(current.into_record());
    }

    records
}

fn match_marker(segment: &str) -> Option<(usize, &str)> {
    MARKERS
        .iter()
        .enumerate()
        .find_map(|(idx, (prefix, _))| segment.strip_prefix(prefix).map(|rest| (idx, rest)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(record: &RawRecord, header: &str) -> Option<String> {
        record.get(header).map(|v| v.to_display_string())
    }

    #[test]
    fn test_pipe_delimited_single_line() {
        let records = segment_labeled_lines(
            "Date: 2020-01-05 | Name: Ann Lee | Phone: 555 1234 | Address: 1 Main St",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(text(&records[0], "Name").as_deref(), Some("Ann Lee"));
        assert_eq!(text(&records[0], "Address").as_deref(), Some("1 Main St"));
        let headers: Vec<_> = records[0].headers().collect();
        assert_eq!(headers, vec!["Date", "Name", "Phone", "Address"]);
    }

    #[test]
    fn test_one_marker_per_line() {
        let input = "Customer list\n\
                     Date: 2020-01-05\nName: Ann\nPhone: 5551234\nAddress: 1 Main St\n\
                     Date: 2021-02-03\nName: Bob\nPhone: 5559876\n";
        let records = segment_labeled_lines(input);
        assert_eq!(records.len(), 2);
        assert_eq!(text(&records[0], "Address").as_deref(), Some("1 Main St"));
        assert_eq!(text(&records[1], "Name").as_deref(), Some("Bob"));
        assert_eq!(records[1].get("Address"), None);
    }

    #[test]
    fn test_three_markers_then_repeat_flushes() {
        let input = "Name: Ann | Phone: 5551234 | Date: 2020-01-05\nName: Bob | Phone: 5559876 | Address: x";
        let records = segment_labeled_lines(input);
        assert_eq!(records.len(), 2);
        assert_eq!(text(&records[0], "Name").as_deref(), Some("Ann"));
        assert_eq!(text(&records[1], "Name").as_deref(), Some("Bob"));
    }

    #[test]
    fn test_three_markers_stay_open_for_a_later_fourth() {
        let input = "Date: 2020-01-05\nName: Ann\nPhone: 5551234\nnotes about the visit\nAddress: 1 Main St";
        let records = segment_labeled_lines(input);
        assert_eq!(records.len(), 1);
        assert_eq!(text(&records[0], "Address").as_deref(), Some("1 Main St"));
    }

    #[test]
    fn test_three_markers_at_end_of_text_are_kept() {
        let records = segment_labeled_lines("Name: Ann\nPhone: 5551234\nDate: 2020-01-05");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Address"), None);
    }

    #[test]
    fn test_fragments_below_three_markers_are_dropped() {
        let input = "Name: Ann\nName: Bob\nPhone: 1\n";
        assert!(segment_labeled_lines(input).is_empty());
    }

    #[test]
    fn test_empty_marker_value_is_absent() {
        let records = segment_labeled_lines("Date: | Name: Ann | Phone: 5551234 | Address: y");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Date"), None);
        assert_eq!(records[0].fields.len(), 4);
    }
}
