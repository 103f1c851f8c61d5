use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Contents of the optional TOML config file. Every key is optional and, when
/// present, takes precedence over the matching CLI flag.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub db_dir: Option<String>,
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub frontend_dir_path: Option<String>,
    pub read_pool_size: Option<usize>,
    pub cors_allowed_origin: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 4000\nlogging_level = \"body\"").unwrap();

        let config = FileConfig::load(file.path()).unwrap();

        assert_eq!(config.port, Some(4000));
        assert_eq!(config.logging_level.as_deref(), Some("body"));
        assert!(config.db_dir.is_none());
        assert!(config.read_pool_size.is_none());
    }

    #[test]
    fn reports_unparsable_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn reports_missing_file() {
        let err = FileConfig::load(Path::new("/nonexistent/programs.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
