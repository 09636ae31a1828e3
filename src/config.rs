use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;

/// Application configuration, shared by the server, CLI and admin tool.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Port the API server listens on
    pub port: u16,
    /// Path to the SQLite database
    pub database_path: PathBuf,
    /// Browser origins allowed to call the API
    pub cors_origins: Vec<String>,
    /// Base URL the CLI sends requests to
    pub server_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_path: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("stayfinder")
                .join("stayfinder.db"),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
            server_url: format!("http://localhost:{}", DEFAULT_PORT),
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    ///
    /// The file is `config_path` if given, else `STAYFINDER_CONFIG`, else
    /// [`Config::default_config_path`]. A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("STAYFINDER_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        }

        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(port) = std::env::var("STAYFINDER_PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STAYFINDER_PORT", port))?;
        }
        if let Ok(db_path) = std::env::var("STAYFINDER_DATABASE_PATH") {
            self.database_path = PathBuf::from(db_path);
        }
        if let Ok(origins) = std::env::var("STAYFINDER_CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Ok(server_url) = std::env::var("STAYFINDER_SERVER_URL") {
            self.server_url = server_url;
        }
        Ok(())
    }

    /// Default config file path: <config dir>/stayfinder/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stayfinder")
            .join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    e
                )
            }
            ConfigError::InvalidValue(var, value) => {
                write!(f, "Invalid value for {}: '{}'", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    // Tests that touch STAYFINDER_* variables must not run concurrently.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config
            .database_path
            .to_string_lossy()
            .contains("stayfinder.db"));
        assert_eq!(config.port, 5000);
        assert_eq!(config.server_url, "http://localhost:5000");
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn test_load_no_file_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_load_from_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "database_path: /custom/path/db.sqlite").unwrap();
        writeln!(file, "port: 8088").unwrap();
        writeln!(file, "cors_origins:").unwrap();
        writeln!(file, "  - https://travel.example.com").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(
            config.database_path,
            PathBuf::from("/custom/path/db.sqlite")
        );
        assert_eq!(config.port, 8088);
        assert_eq!(config.cors_origins, vec!["https://travel.example.com"]);
        assert_eq!(config.server_url, "http://localhost:5000");
    }

    #[test]
    fn test_env_var_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "port: 8088").unwrap();

        std::env::set_var("STAYFINDER_PORT", "9090");
        std::env::set_var("STAYFINDER_CORS_ORIGINS", "http://a.test, http://b.test");

        let config = Config::load(Some(config_path));

        std::env::remove_var("STAYFINDER_PORT");
        std::env::remove_var("STAYFINDER_CORS_ORIGINS");

        let config = config.unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_invalid_port_env_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp_dir = tempdir().unwrap();

        std::env::set_var("STAYFINDER_PORT", "not-a-port");
        let result = Config::load(Some(temp_dir.path().join("none.yaml")));
        std::env::remove_var("STAYFINDER_PORT");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("STAYFINDER_PORT"));
    }

    #[test]
    fn test_invalid_yaml_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
