// Server configuration: optional quiz.toml, QUIZ_* environment, CLI flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "quiz.toml";
pub const DEFAULT_PORT: u16 = 3030;

const IN_MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("invalid database url: {raw}")]
    InvalidDbUrl { raw: String },

    #[error("failed to prepare database file {path}: {source}")]
    PrepareDb {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Fully resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub db_url: String,
    pub host: String,
    pub port: u16,
    pub color: bool,
    pub seed_defaults: bool,
    pub credits: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_url: "sqlite://quiz.sqlite3".into(),
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            color: true,
            seed_defaults: true,
            credits: vec!["Quiz console contributors".into()],
        }
    }
}

impl AppConfig {
    /// Parse a TOML document; `path` is only used in error messages.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        Self::from_toml(&text, path)
    }

    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "host".into(),
                message: "must not be empty".into(),
            });
        }
        if self.db_url.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "db_url".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// Assemble the config. Precedence: CLI flags, then environment, then the
/// config file, then defaults.
///
/// An explicitly named config file (flag or `QUIZ_CONFIG`) must exist;
/// `./quiz.toml` is only read when present.
pub fn resolve(
    cli_config: Option<PathBuf>,
    cli_db_url: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, ConfigError> {
    let explicit = cli_config.or_else(|| env("QUIZ_CONFIG").map(PathBuf::from));
    let mut config = match explicit {
        Some(path) => AppConfig::load(&path)?,
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.exists() {
                AppConfig::load(fallback)?
            } else {
                AppConfig::default()
            }
        }
    };

    if let Some(url) = env("QUIZ_DB_URL").filter(|v| !v.trim().is_empty()) {
        config.db_url = url;
    }
    if let Some(url) = cli_db_url {
        if url.trim().is_empty() {
            return Err(ConfigError::InvalidDbUrl { raw: url });
        }
        config.db_url = url;
    }

    config.validate()?;
    config.db_url = normalize_sqlite_url(config.db_url);
    Ok(config)
}

/// Turn a bare, `sqlite:` or `sqlite://` path into an absolute `sqlite://`
/// URL, resolving relative paths against the working directory. In-memory
/// URLs pass through untouched; a `?query` suffix is kept.
pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == IN_MEMORY_URL || raw.starts_with("sqlite:file:") {
        return raw;
    }

    let trimmed = raw.trim();
    let rest = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    let path = Path::new(path);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    match query {
        Some(query) => format!("sqlite://{}?{query}", absolute.display()),
        None => format!("sqlite://{}", absolute.display()),
    }
}

/// Create the database file and its parent directories so the pool can open it.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), ConfigError> {
    if db_url == IN_MEMORY_URL || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        });
    }

    let path = Path::new(path);
    let prepare_err = |source| ConfigError::PrepareDb {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(prepare_err)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(prepare_err)?;
    }
    Ok(())
}
