// ============================================================
// TARGET FIELD
// ============================================================
// The four canonical columns every input is reshaped into

use serde::{Deserialize, Serialize};

/// One column of the fixed output schema.
///
/// Declaration order is the canonical order: it breaks matching ties and
/// fixes export column order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TargetField {
    Date,
    FullName,
    Contact,
    Address,
}

impl TargetField {
    /// All fields in canonical order
    pub const ALL: [TargetField; 4] = [
        TargetField::Date,
        TargetField::FullName,
        TargetField::Contact,
        TargetField::Address,
    ];

    /// Column label used in JSON payloads and exports
    pub fn column_label(&self) -> &'static str {
        match self {
            TargetField::Date => "DATE",
            TargetField::FullName => "FULL NAME",
            TargetField::Contact => "CONTACT",
            TargetField::Address => "ADDRESS",
        }
    }

    /// Key used in configuration files
    pub fn config_key(&self) -> &'static str {
        match self {
            TargetField::Date => "date",
            TargetField::FullName => "full_name",
            TargetField::Contact => "contact",
            TargetField::Address => "address",
        }
    }
}

impl std::fmt::Display for TargetField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let labels: Vec<_> = TargetField::ALL.iter().map(|f| f.column_label()).collect();
        assert_eq!(labels, vec!["DATE", "FULL NAME", "CONTACT", "ADDRESS"]);
        assert!(TargetField::Date < TargetField::Address);
    }

    #[test]
    fn test_config_key_round_trips_through_serde() {
        for field in TargetField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.config_key()));
        }
    }
}
