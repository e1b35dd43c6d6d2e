// ============================================================
// SYNONYM DICTIONARY
// ============================================================
// Known header spellings per target field. Built once at start-up,
// read-only afterwards.

use std::collections::BTreeMap;

use super::error::{AppError, Result};
use super::record::TargetField;

/// Header synonyms per target field, held in canonical field order
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymDictionary {
    entries: Vec<(TargetField, Vec<String>)>,
}

impl SynonymDictionary {
    /// Build from configuration. Synonyms are trimmed and lowercased;
    /// every target field needs at least one non-blank synonym.
    pub fn from_map(map: &BTreeMap<TargetField, Vec<String>>) -> Result<Self> {
        let mut entries = Vec::with_capacity(TargetField::ALL.len());

        for field in TargetField::ALL {
            let raw = map.get(&field).ok_or_else(|| {
                AppError::ConfigurationError(format!(
                    "synonym dictionary has no entry for '{}'",
                    field.config_key()
                ))
            })?;

            let mut synonyms: Vec<String> = Vec::with_capacity(raw.len());
            for synonym in raw {
                let normalized = synonym.trim().to_lowercase();
                if !normalized.is_empty() && !synonyms.contains(&normalized) {
                    synonyms.push(normalized);
                }
            }

            if synonyms.is_empty() {
                return Err(AppError::ConfigurationError(format!(
                    "synonym list for '{}' is empty",
                    field.config_key()
                )));
            }

            entries.push((field, synonyms));
        }

        Ok(Self { entries })
    }

    /// Iterate fields in canonical order with their synonyms
    pub fn iter(&self) -> impl Iterator<Item = (TargetField, &[String])> {
        self.entries.iter().map(|(f, s)| (*f, s.as_slice()))
    }
}

/// Built-in dictionary used when configuration does not override it
pub fn default_synonym_map() -> BTreeMap<TargetField, Vec<String>> {
    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    let mut map = BTreeMap::new();
    map.insert(
        TargetField::Date,
        list(&[
            "date",
            "dob",
            "date of birth",
            "birth date",
            "birthdate",
            "birthday",
            "created",
            "created at",
            "timestamp",
            "day",
        ]),
    );
    map.insert(
        TargetField::FullName,
        list(&[
            "full name",
            "fullname",
            "name",
            "customer name",
            "client name",
            "person",
            "contact name",
            "customer",
        ]),
    );
    map.insert(
        TargetField::Contact,
        list(&[
            "contact",
            "phone",
            "phone number",
            "mobile",
            "mobile number",
            "telephone",
            "tel",
            "cell",
            "cell phone",
            "contact number",
        ]),
    );
    map.insert(
        TargetField::Address,
        list(&[
            "address",
            "street",
            "street address",
            "home address",
            "location",
            "residence",
            "addr",
        ]),
    );
    map
}

impl Default for SynonymDictionary {
    fn default() -> Self {
        let entries = default_synonym_map()
            .into_iter()
            .collect::<Vec<(TargetField, Vec<String>)>>();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dictionary_is_valid() {
        let built = SynonymDictionary::from_map(&default_synonym_map()).unwrap();
        assert_eq!(built, SynonymDictionary::default());
        let fields: Vec<_> = built.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, TargetField::ALL.to_vec());
    }

    #[test]
    fn test_missing_field_is_configuration_error() {
        let mut map = default_synonym_map();
        map.remove(&TargetField::Contact);
        let err = SynonymDictionary::from_map(&map).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));
    }

    #[test]
    fn test_blank_synonyms_rejected() {
        let mut map = default_synonym_map();
        map.insert(TargetField::Address, vec!["  ".to_string()]);
        assert!(SynonymDictionary::from_map(&map).is_err());
    }

    #[test]
    fn test_synonyms_normalized() {
        let mut map = default_synonym_map();
        map.insert(TargetField::Address, vec!["  Street ".to_string(), "street".to_string()]);
        let dict = SynonymDictionary::from_map(&map).unwrap();
        let address = dict.iter().find(|(f, _)| *f == TargetField::Address).unwrap().1;
        assert_eq!(address, ["street".to_string()]);
    }
}
