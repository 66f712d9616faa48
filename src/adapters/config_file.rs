//! Configuration loading
//!
//! Defaults, then an optional JSON file, then `LEDLINK_*` environment
//! variables. CLI flags are applied on top by the binary.

use std::path::Path;

use crate::domain::{ControllerConfig, LedError, LedResult};

pub const ENV_SERIAL_PORT: &str = "LEDLINK_SERIAL_PORT";
pub const ENV_BAUD_RATE: &str = "LEDLINK_BAUD_RATE";
pub const ENV_BIND_ADDRESS: &str = "LEDLINK_BIND_ADDRESS";
pub const ENV_AUDIT_LOG: &str = "LEDLINK_AUDIT_LOG";

/// Read a JSON config file. Fields it leaves out take their defaults.
pub fn load_file(path: &Path) -> LedResult<ControllerConfig> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| LedError::Config(format!("Failed to read config '{}': {e}", path.display())))?;
    serde_json::from_str(&json)
        .map_err(|e| LedError::Config(format!("Failed to parse config '{}': {e}", path.display())))
}

/// Defaults or `path`, with the process environment applied on top.
pub fn load(path: Option<&Path>) -> LedResult<ControllerConfig> {
    let config = match path {
        Some(p) => load_file(p)?,
        None => ControllerConfig::default(),
    };
    apply_env(config, |key| std::env::var(key).ok())
}

/// Apply `LEDLINK_*` overrides looked up through `lookup`.
pub fn apply_env(
    mut config: ControllerConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> LedResult<ControllerConfig> {
    if let Some(port) = lookup(ENV_SERIAL_PORT) {
        config.serial_port = port;
    }
    if let Some(baud) = lookup(ENV_BAUD_RATE) {
        config.baud_rate = baud
            .trim()
            .parse()
            .map_err(|e| LedError::Config(format!("{ENV_BAUD_RATE}='{baud}': {e}")))?;
    }
    if let Some(addr) = lookup(ENV_BIND_ADDRESS) {
        config.bind_address = addr;
    }
    if let Some(path) = lookup(ENV_AUDIT_LOG) {
        config.audit_log_path = path;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_file_values() {
        let config = apply_env(
            ControllerConfig::default(),
            env(&[(ENV_SERIAL_PORT, "COM3"), (ENV_BAUD_RATE, "115200")]),
        )
        .unwrap();
        assert_eq!(config.serial_port, "COM3");
        assert_eq!(config.baud_rate, 115200);
    }

    #[test]
    fn non_numeric_baud_rate_is_a_config_error() {
        let result = apply_env(ControllerConfig::default(), env(&[(ENV_BAUD_RATE, "fast")]));
        assert!(matches!(result, Err(LedError::Config(_))));
    }

    #[test]
    fn load_file_reads_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledlink.json");
        std::fs::write(&path, r#"{"serial_port":"COM4"}"#).unwrap();

        let config = load_file(&path).unwrap();
        assert_eq!(config.serial_port, "COM4");
        assert_eq!(config.baud_rate, 9600);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = load_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(LedError::Config(_))));
    }
}
