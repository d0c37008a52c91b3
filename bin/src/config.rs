//! Combiner configuration from file and flags.

use anyhow::{Context, Result};
use std::path::Path;
use tally::{CombinationMethod, VoteConfig};

/// Build the combiner configuration.
///
/// Starts from defaults, applies the TOML file if given, then explicit flags.
pub(crate) fn load(
    path: Option<&Path>,
    method: Option<&str>,
    top_range: Option<f64>,
    z: Option<f64>,
) -> Result<VoteConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            parse(&raw).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => VoteConfig::default(),
    };

    if let Some(method) = method {
        config.method = CombinationMethod::from_name(method);
    }
    if let Some(top_range) = top_range {
        config.top_range = top_range;
    }
    if let Some(z) = z {
        config.confidence_z = z;
    }

    tracing::debug!(?config, "loaded combiner configuration");
    Ok(config)
}

fn parse(raw: &str) -> Result<VoteConfig> {
    Ok(toml::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file_or_flags() {
        let config = load(None, None, None, None).unwrap();
        assert_eq!(config, VoteConfig::default());
    }

    #[test]
    fn test_parse_partial_file() {
        let config = parse("method = \"probability weighted\"\ntop_range = 3.0\n").unwrap();
        assert_eq!(config.method, CombinationMethod::ProbabilityWeighted);
        assert!((config.top_range - 3.0).abs() < 1e-12);
        assert!((config.confidence_z - VoteConfig::default().confidence_z).abs() < 1e-12);
    }

    #[test]
    fn test_flags_override_file() {
        let path = std::env::temp_dir().join(format!("tally-config-{}.toml", std::process::id()));
        std::fs::write(&path, "method = \"probability weighted\"\ntop_range = 3.0\n").unwrap();

        let config = load(Some(path.as_path()), Some("confidence_weighted"), None, Some(1.0)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.method, CombinationMethod::ConfidenceWeighted);
        assert!((config.top_range - 3.0).abs() < 1e-12);
        assert!((config.confidence_z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load(Some(Path::new("/nonexistent/tally.toml")), None, None, None);
        assert!(result.is_err());
    }
}
