mod file_config;

pub use file_config::FileConfig;

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3310;
pub const DEFAULT_METRICS_PORT: u16 = 9091;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// Server settings as given on the command line, before the config file is applied.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub read_pool_size: usize,
    pub cors_allowed_origin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub read_pool_size: usize,
    pub cors_allowed_origin: Option<String>,
}

impl AppConfig {
    /// Merges command line and config file settings; a value set in the file wins.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("No database directory: pass --db-dir or set db_dir in the config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory {:?} does not exist", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("Database directory {:?} is not a directory", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port == metrics_port && port != 0 {
            bail!("port and metrics_port must differ, both are {}", port);
        }

        let logging_level = match file.logging_level {
            Some(level) => match parse_logging_level(&level) {
                Some(level) => level,
                None => bail!("Unknown logging_level in config file: {}", level),
            },
            None => cli.logging_level.clone(),
        };

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let read_pool_size = file.read_pool_size.unwrap_or(cli.read_pool_size);
        if read_pool_size == 0 {
            bail!("read_pool_size must be at least 1");
        }

        let cors_allowed_origin = file
            .cors_allowed_origin
            .or_else(|| cli.cors_allowed_origin.clone());

        Ok(Self {
            db_dir,
            port,
            metrics_port,
            logging_level,
            frontend_dir_path,
            read_pool_size,
            cors_allowed_origin,
        })
    }

    pub fn programs_db_path(&self) -> PathBuf {
        self.db_dir.join("programs.db")
    }
}

/// Case-insensitive, same names as `--logging-level`.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli_with_db_dir(temp_dir: &TempDir) -> CliConfig {
        CliConfig {
            db_dir: Some(temp_dir.path().to_path_buf()),
            port: DEFAULT_PORT,
            metrics_port: DEFAULT_METRICS_PORT,
            read_pool_size: DEFAULT_READ_POOL_SIZE,
            ..Default::default()
        }
    }

    #[test]
    fn logging_level_names_are_case_insensitive() {
        assert!(matches!(
            parse_logging_level("none"),
            Some(RequestsLoggingLevel::None)
        ));
        assert!(matches!(
            parse_logging_level("body"),
            Some(RequestsLoggingLevel::Body)
        ));
        assert!(matches!(
            parse_logging_level("HEADERS"),
            Some(RequestsLoggingLevel::Headers)
        ));
        assert!(parse_logging_level("verbose").is_none());
    }

    #[test]
    fn command_line_alone_is_enough() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            logging_level: RequestsLoggingLevel::Headers,
            frontend_dir_path: Some("/frontend".to_string()),
            cors_allowed_origin: Some("http://localhost:3000".to_string()),
            ..cli_with_db_dir(&temp_dir)
        };

        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(config.db_dir, temp_dir.path());
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.metrics_port, DEFAULT_METRICS_PORT);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Headers);
        assert_eq!(config.frontend_dir_path, Some("/frontend".to_string()));
        assert_eq!(config.read_pool_size, DEFAULT_READ_POOL_SIZE);
        assert_eq!(
            config.cors_allowed_origin,
            Some("http://localhost:3000".to_string())
        );
    }

    #[test]
    fn file_values_win_over_command_line() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_dir: Some(PathBuf::from("/ignored/by/file")),
            ..cli_with_db_dir(&temp_dir)
        };
        let file_config = FileConfig {
            db_dir: Some(temp_dir.path().to_string_lossy().to_string()),
            port: Some(4000),
            logging_level: Some("body".to_string()),
            read_pool_size: Some(2),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();

        assert_eq!(config.db_dir, temp_dir.path());
        assert_eq!(config.port, 4000);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Body);
        assert_eq!(config.read_pool_size, 2);
        assert_eq!(config.metrics_port, DEFAULT_METRICS_PORT);
    }

    #[test]
    fn database_directory_is_required() {
        let result = AppConfig::resolve(&CliConfig::default(), None);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("No database directory"));
    }

    #[test]
    fn missing_database_directory_is_rejected() {
        let cli = CliConfig {
            db_dir: Some(PathBuf::from("/no/such/programs/dir")),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn database_directory_must_be_a_directory() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let cli = CliConfig {
            db_dir: Some(temp_file.path().to_path_buf()),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.unwrap_err().to_string().contains("not a directory"));
    }

    #[test]
    fn inconsistent_values_are_rejected() {
        let temp_dir = TempDir::new().unwrap();

        let same_ports = CliConfig {
            metrics_port: DEFAULT_PORT,
            ..cli_with_db_dir(&temp_dir)
        };
        assert!(AppConfig::resolve(&same_ports, None).is_err());

        let empty_pool = FileConfig {
            read_pool_size: Some(0),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&cli_with_db_dir(&temp_dir), Some(empty_pool)).is_err());

        let bad_level = FileConfig {
            logging_level: Some("loud".to_string()),
            ..Default::default()
        };
        let err = AppConfig::resolve(&cli_with_db_dir(&temp_dir), Some(bad_level)).unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn database_file_lives_in_db_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::resolve(&cli_with_db_dir(&temp_dir), None).unwrap();

        assert_eq!(config.programs_db_path(), temp_dir.path().join("programs.db"));
    }
}
