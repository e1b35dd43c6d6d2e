// ============================================================
// CELL VALUE
// ============================================================
// A present scalar from a decoded table. Absence is modelled as
// `Option<CellValue>::None`, never as an empty string or zero.

use serde::{Deserialize, Serialize};

/// Scalar value of one cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Borrow the text content, `None` for numbers
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }

    /// Render as text. Integral numbers drop the fractional part so that a
    /// phone number stored as 5551234.0 renders as "5551234".
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_number_renders_without_fraction() {
        assert_eq!(CellValue::Number(5551234.0).to_display_string(), "5551234");
        assert_eq!(CellValue::Number(12.5).to_display_string(), "12.5");
    }

    #[test]
    fn test_untagged_json() {
        let text: CellValue = serde_json::from_str("\"12 Main St\"").unwrap();
        assert_eq!(text, CellValue::text("12 Main St"));

        let number: CellValue = serde_json::from_str("42").unwrap();
        assert_eq!(number, CellValue::Number(42.0));
    }
}
