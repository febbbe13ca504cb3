pub mod candidate;
pub mod company;
pub mod constraint;
pub mod form_key;
pub mod hr_user;
pub mod job;
pub mod job_match;
pub mod link;

use serde::{Deserialize, Deserializer};

/// Deserializer for patch fields on nullable columns.
///
/// Plain `Option<Option<T>>` cannot tell `null` apart from an absent key;
/// both decode to outer `None`. Routed through this helper (with
/// `#[serde(default)]`), an absent key stays outer `None`, an explicit
/// `null` becomes `Some(None)` (clear the column) and a value becomes
/// `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::double_option")]
        phone: Option<Option<String>>,
    }

    #[test]
    fn test_absent_key_is_unset() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.phone, None);
    }

    #[test]
    fn test_explicit_null_clears() {
        let patch: Patch = serde_json::from_str(r#"{"phone": null}"#).unwrap();
        assert_eq!(patch.phone, Some(None));
    }

    #[test]
    fn test_value_sets() {
        let patch: Patch = serde_json::from_str(r#"{"phone": "+1-555-0100"}"#).unwrap();
        assert_eq!(patch.phone, Some(Some("+1-555-0100".to_string())));
    }
}
