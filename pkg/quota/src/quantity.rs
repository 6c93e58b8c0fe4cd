use pkg_types::error::QuotaError;

/// Unit family a resource quantity is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// CPU, normalized to millicores (1000 = 1 core).
    Cpu,
    /// Memory, normalized to bytes.
    Memory,
    /// Object counts (pods, services, ...), unitless.
    Count,
}

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * 1024 * 1024;
const TIB: u64 = 1024 * 1024 * 1024 * 1024;

/// Binary suffixes checked before decimal ones: "1Gi" contains "G" too,
/// and Kubernetes treats `Mi` and `M` as different units (case-sensitive).
const BINARY_SUFFIXES: [(&str, u64); 4] = [("Ki", KIB), ("Mi", MIB), ("Gi", GIB), ("Ti", TIB)];
const DECIMAL_SUFFIXES: [(&str, u64); 4] = [
    ("k", 1_000),
    ("M", 1_000_000),
    ("G", 1_000_000_000),
    ("T", 1_000_000_000_000),
];

/// Classify a quota resource name into its unit family.
/// `cpu` is CPU; any name containing `memory` is memory; everything else,
/// including `count/*` keys, is a plain count.
pub fn classify(resource: &str) -> Dimension {
    if resource == "cpu" {
        Dimension::Cpu
    } else if resource.contains("memory") {
        Dimension::Memory
    } else {
        Dimension::Count
    }
}

/// Parse a Kubernetes quantity string into its canonical unit: millicores
/// for CPU, bytes for memory, the bare magnitude for counts.
///
/// The numeric magnitude is whatever remains after stripping every
/// character that is not a digit or a decimal point. Absence of a
/// recognized unit suffix is not an error — a bare CPU number is cores, a
/// bare memory number is bytes. Only a string with no numeric content at
/// all is malformed.
pub fn parse(dimension: Dimension, raw: &str) -> Result<f64, QuotaError> {
    let magnitude: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value: f64 = magnitude
        .parse()
        .map_err(|_| QuotaError::MalformedQuantity(raw.to_string()))?;

    Ok(match dimension {
        Dimension::Cpu => {
            if raw.ends_with('m') {
                value
            } else {
                value * 1000.0
            }
        }
        Dimension::Memory => value * memory_multiplier(raw) as f64,
        Dimension::Count => value,
    })
}

fn memory_multiplier(raw: &str) -> u64 {
    for (suffix, multiplier) in BINARY_SUFFIXES {
        if raw.contains(suffix) {
            return multiplier;
        }
    }
    for (suffix, multiplier) in DECIMAL_SUFFIXES {
        if raw.contains(suffix) {
            return multiplier;
        }
    }
    1
}

/// Render a normalized value back into a quantity string, picking the
/// largest unit that divides evenly: whole cores over millicores, binary
/// memory suffixes over raw bytes.
pub fn render(dimension: Dimension, value: f64) -> String {
    let whole = value.max(0.0).round() as u64;
    match dimension {
        Dimension::Cpu => {
            if whole % 1000 == 0 {
                (whole / 1000).to_string()
            } else {
                format!("{}m", whole)
            }
        }
        Dimension::Memory => {
            for (suffix, multiplier) in [("Ti", TIB), ("Gi", GIB), ("Mi", MIB), ("Ki", KIB)] {
                if whole > 0 && whole % multiplier == 0 {
                    return format!("{}{}", whole / multiplier, suffix);
                }
            }
            whole.to_string()
        }
        Dimension::Count => whole.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_cores_and_millicores_normalize_identically() {
        assert_eq!(parse(Dimension::Cpu, "2").unwrap(), 2000.0);
        assert_eq!(parse(Dimension::Cpu, "2000m").unwrap(), 2000.0);
        assert_eq!(parse(Dimension::Cpu, "500m").unwrap(), 500.0);
        assert_eq!(parse(Dimension::Cpu, "0.5").unwrap(), 500.0);
    }

    #[test]
    fn binary_and_decimal_memory_suffixes_differ() {
        assert_eq!(parse(Dimension::Memory, "1Gi").unwrap(), 1_073_741_824.0);
        assert_eq!(parse(Dimension::Memory, "1G").unwrap(), 1_000_000_000.0);
        assert_eq!(parse(Dimension::Memory, "512Mi").unwrap(), 512.0 * 1024.0 * 1024.0);
        assert_eq!(parse(Dimension::Memory, "128k").unwrap(), 128_000.0);
        assert_eq!(parse(Dimension::Memory, "134217728").unwrap(), 134_217_728.0);
        assert_eq!(parse(Dimension::Memory, "2Ti").unwrap(), 2.0 * TIB as f64);
    }

    #[test]
    fn counts_use_the_bare_magnitude() {
        assert_eq!(parse(Dimension::Count, "10").unwrap(), 10.0);
        assert_eq!(parse(Dimension::Count, "0").unwrap(), 0.0);
    }

    #[test]
    fn strings_without_digits_are_malformed() {
        assert!(matches!(
            parse(Dimension::Cpu, ""),
            Err(QuotaError::MalformedQuantity(_))
        ));
        assert!(matches!(
            parse(Dimension::Memory, "Gi"),
            Err(QuotaError::MalformedQuantity(_))
        ));
        assert!(matches!(
            parse(Dimension::Count, "lots"),
            Err(QuotaError::MalformedQuantity(_))
        ));
    }

    #[test]
    fn classify_follows_resource_names() {
        assert_eq!(classify("cpu"), Dimension::Cpu);
        assert_eq!(classify("memory"), Dimension::Memory);
        assert_eq!(classify("requests.memory"), Dimension::Memory);
        assert_eq!(classify("count/pods"), Dimension::Count);
        assert_eq!(classify("count/services"), Dimension::Count);
    }

    #[test]
    fn render_picks_the_largest_even_unit() {
        assert_eq!(render(Dimension::Cpu, 2000.0), "2");
        assert_eq!(render(Dimension::Cpu, 1500.0), "1500m");
        assert_eq!(render(Dimension::Memory, 1_073_741_824.0), "1Gi");
        assert_eq!(render(Dimension::Memory, 512.0 * 1024.0 * 1024.0), "512Mi");
        assert_eq!(render(Dimension::Memory, 1000.0), "1000");
        assert_eq!(render(Dimension::Count, 7.0), "7");
    }

    #[test]
    fn render_saturates_below_zero() {
        assert_eq!(render(Dimension::Cpu, -250.0), "0");
        assert_eq!(render(Dimension::Memory, -1.0), "0");
    }
}
