use pkg_types::error::QuotaError;
use pkg_types::quota::{QuotaMap, UtilizationReport};
use tracing::warn;

use crate::quantity::{self, Dimension};

/// Percentage of a quota limit currently consumed, clamped to `[0, 100]`.
///
/// Both operands are normalized with the same dimension-specific rules, so
/// a limit of `"2"` cores and a usage of `"500m"` compare correctly. A
/// limit that normalizes to zero reports 0% used — a resource with no
/// configured limit is not "infinitely used" and must not divide by zero.
pub fn percent(dimension: Dimension, limit: &str, used: &str) -> Result<f64, QuotaError> {
    let limit_normalized = quantity::parse(dimension, limit)?;
    let used_normalized = quantity::parse(dimension, used)?;
    if limit_normalized == 0.0 {
        return Ok(0.0);
    }
    Ok((used_normalized / limit_normalized * 100.0).clamp(0.0, 100.0))
}

/// Compute the utilization report for a quota/usage pair.
///
/// Iterates the quota map only: consumption without a configured limit is
/// not reportable. A resource missing from `used` counts as `"0"`. A
/// quantity that cannot be parsed excludes that one resource from
/// `percent_used` and becomes a warning instead of failing the whole read.
pub fn report(quota: &QuotaMap, used: &QuotaMap, warn_threshold: f64) -> UtilizationReport {
    let mut out = UtilizationReport::default();

    for (resource, limit) in quota {
        let dimension = quantity::classify(resource);
        let used_raw = used.get(resource).map(String::as_str).unwrap_or("0");

        match percent(dimension, limit, used_raw) {
            Ok(pct) => {
                out.percent_used.insert(resource.clone(), pct);
                if pct >= warn_threshold {
                    out.warnings.push(format!("{}: {:.1}% used", resource, pct));
                    out.is_near_limit = true;
                }
            }
            Err(e) => {
                warn!("Skipping resource {} in utilization report: {}", resource, e);
                out.warnings
                    .push(format!("{}: unreadable quantity ({})", resource, e));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_constants::quota::DEFAULT_WARN_THRESHOLD_PERCENT;

    fn map(pairs: &[(&str, &str)]) -> QuotaMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn limit_and_used_normalize_symmetrically() {
        // 500m of 2 cores and 500m of 2000m must agree.
        assert_eq!(percent(Dimension::Cpu, "2", "500m").unwrap(), 25.0);
        assert_eq!(percent(Dimension::Cpu, "2000m", "500m").unwrap(), 25.0);
        assert_eq!(percent(Dimension::Cpu, "2", "0.5").unwrap(), 25.0);
    }

    #[test]
    fn over_quota_clamps_to_one_hundred() {
        assert_eq!(percent(Dimension::Cpu, "1", "1500m").unwrap(), 100.0);
        assert_eq!(percent(Dimension::Memory, "1Gi", "2Gi").unwrap(), 100.0);
        assert_eq!(percent(Dimension::Count, "10", "99").unwrap(), 100.0);
    }

    #[test]
    fn zero_limit_reports_zero_percent() {
        assert_eq!(percent(Dimension::Cpu, "0", "4").unwrap(), 0.0);
        assert_eq!(percent(Dimension::Memory, "0", "8Gi").unwrap(), 0.0);
        assert_eq!(percent(Dimension::Count, "0", "3").unwrap(), 0.0);
    }

    #[test]
    fn warning_fires_at_the_threshold_boundary() {
        let quota = map(&[("count/pods", "1000")]);

        let at = report(&quota, &map(&[("count/pods", "800")]), DEFAULT_WARN_THRESHOLD_PERCENT);
        assert_eq!(at.warnings, vec!["count/pods: 80.0% used"]);
        assert!(at.is_near_limit);

        // 79.999% stays quiet.
        let below = report(
            &map(&[("count/pods", "100000")]),
            &map(&[("count/pods", "79999")]),
            DEFAULT_WARN_THRESHOLD_PERCENT,
        );
        assert!(below.warnings.is_empty());
        assert!(!below.is_near_limit);
    }

    #[test]
    fn missing_usage_defaults_to_zero() {
        let r = report(&map(&[("cpu", "2"), ("memory", "4Gi")]), &QuotaMap::new(), 80.0);
        assert_eq!(r.percent_used["cpu"], 0.0);
        assert_eq!(r.percent_used["memory"], 0.0);
        assert!(!r.is_near_limit);
    }

    #[test]
    fn usage_without_a_limit_is_ignored() {
        let r = report(
            &map(&[("cpu", "2")]),
            &map(&[("cpu", "1"), ("count/pods", "7")]),
            80.0,
        );
        assert_eq!(r.percent_used.len(), 1);
        assert!(r.percent_used.contains_key("cpu"));
    }

    #[test]
    fn malformed_quantity_becomes_a_warning_not_a_failure() {
        let r = report(
            &map(&[("cpu", "garbage"), ("memory", "4Gi")]),
            &map(&[("memory", "1Gi")]),
            80.0,
        );
        assert!(!r.percent_used.contains_key("cpu"));
        assert_eq!(r.percent_used["memory"], 25.0);
        assert_eq!(r.warnings.len(), 1);
        assert!(r.warnings[0].starts_with("cpu:"));
        // An unreadable quantity is not a near-limit signal.
        assert!(!r.is_near_limit);
    }
}
