use crate::quota::QuotaMap;
use pkg_constants::quota::REQUIRED_CUSTOM_RESOURCES;
use serde::{Deserialize, Serialize};

/// Result of validating a custom quota spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Structurally validate a caller-supplied quota spec.
///
/// Structural only: required resource keys must be present and every
/// supplied value must be a non-empty string. Quantity strings are NOT
/// parsed here — parsing happens lazily at read time, so a spec with an
/// odd-looking value is accepted and surfaces as a report warning later.
pub fn validate_custom_spec(spec: &QuotaMap) -> ValidationOutcome {
    let mut errors = Vec::new();

    for required in REQUIRED_CUSTOM_RESOURCES {
        if !spec.contains_key(required) {
            errors.push(format!("missing required resource '{}'", required));
        }
    }

    for (resource, value) in spec {
        if resource.trim().is_empty() {
            errors.push("empty resource name".to_string());
        }
        if value.trim().is_empty() {
            errors.push(format!("resource '{}' has an empty quantity", resource));
        }
    }

    ValidationOutcome {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(pairs: &[(&str, &str)]) -> QuotaMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn complete_spec_is_valid() {
        let outcome = validate_custom_spec(&spec(&[
            ("cpu", "4"),
            ("memory", "8Gi"),
            ("count/pods", "25"),
        ]));
        assert!(outcome.valid);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn missing_required_keys_are_reported() {
        let outcome = validate_custom_spec(&spec(&[("count/pods", "25")]));
        assert!(!outcome.valid);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].contains("cpu"));
        assert!(outcome.errors[1].contains("memory"));
    }

    #[test]
    fn empty_values_are_rejected() {
        let outcome = validate_custom_spec(&spec(&[("cpu", "4"), ("memory", "  ")]));
        assert!(!outcome.valid);
        assert!(outcome.errors.iter().any(|e| e.contains("memory")));
    }

    #[test]
    fn odd_quantity_strings_pass_structural_validation() {
        // Parsing is deferred to read time; structure is all that matters here.
        let outcome = validate_custom_spec(&spec(&[("cpu", "banana"), ("memory", "8Gi")]));
        assert!(outcome.valid);
    }
}
