use serde::{Deserialize, Serialize};

/// Server configuration file (YAML).
///
/// Example `config.yaml`:
/// ```yaml
/// port: 7070
/// data-dir: /var/lib/quotad/data
/// token: my-admin-token
/// kube-api-url: https://10.0.0.1:6443
/// kube-token: my-cluster-token
/// apply-timeout-secs: 10
/// warn-threshold-percent: 80
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfigFile {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default, alias = "data-dir")]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, alias = "kube-api-url")]
    pub kube_api_url: Option<String>,
    #[serde(default, alias = "kube-token")]
    pub kube_token: Option<String>,
    #[serde(default, alias = "apply-timeout-secs")]
    pub apply_timeout_secs: Option<u64>,
    #[serde(default, alias = "warn-threshold-percent")]
    pub warn_threshold_percent: Option<f64>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_case_aliases_parse() {
        let cfg: ServerConfigFile = serde_yaml::from_str(
            "port: 8080\ndata-dir: /tmp/q\nkube-api-url: https://k8s:6443\nwarn-threshold-percent: 75\n",
        )
        .unwrap();
        assert_eq!(cfg.port, Some(8080));
        assert_eq!(cfg.data_dir.as_deref(), Some("/tmp/q"));
        assert_eq!(cfg.kube_api_url.as_deref(), Some("https://k8s:6443"));
        assert_eq!(cfg.warn_threshold_percent, Some(75.0));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg: ServerConfigFile = load_config_file("/nonexistent/quotad.yaml").unwrap();
        assert!(cfg.port.is_none());
        assert!(cfg.token.is_none());
    }
}
