//! Environment profiles and their YAML configuration files.
//!
//! Each profile reads `<dir>/<environment>.yml`, falling back to
//! `<dir>/default.yml` when the profile has no file of its own. The loaded
//! [`Config`] is immutable and handed to the pipeline explicitly.

use std::{
    collections::{BTreeMap, HashSet},
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "default.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository allow-list as written in YAML: either a plain list or the
/// older `name: true` map. In the map form every key is allowed; the value
/// is ignored.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepoList {
    List(Vec<String>),
    Map(BTreeMap<String, bool>),
}

impl Default for RepoList {
    fn default() -> Self {
        RepoList::List(Vec::new())
    }
}

impl From<RepoList> for HashSet<String> {
    fn from(repos: RepoList) -> Self {
        match repos {
            RepoList::List(names) => names.into_iter().collect(),
            RepoList::Map(entries) => entries.into_keys().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    web_hook: String,
    #[serde(default)]
    repos: RepoList,
    #[serde(default)]
    countdown: BTreeMap<String, String>,
    #[serde(default)]
    channel_id: String,
    #[serde(default)]
    organization: String,
    #[serde(default)]
    report_callback: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub environment: Environment,
    pub web_hook: String,
    pub repos: HashSet<String>,
    /// ISO dates (`YYYY-MM-DD`) mapped to reminder text.
    pub countdown: BTreeMap<String, String>,
    pub channel_id: String,
    pub organization: String,
    pub report_callback: Option<String>,
}

impl Config {
    fn from_file(environment: Environment, file: ConfigFile) -> Result<Self, ConfigError> {
        let web_hook = required("web_hook", file.web_hook)?;
        Url::parse(&web_hook).map_err(|source| ConfigError::InvalidUrl {
            field: "web_hook",
            source,
        })?;

        let report_callback = file
            .report_callback
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(url) = &report_callback {
            Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
                field: "report_callback",
                source,
            })?;
        }

        Ok(Config {
            environment,
            web_hook,
            repos: file.repos.into(),
            countdown: file.countdown,
            channel_id: required("channel_id", file.channel_id)?,
            organization: required("organization", file.organization)?,
            report_callback,
        })
    }
}

fn required(field: &'static str, value: String) -> Result<String, ConfigError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ConfigError::MissingField(field));
    }
    Ok(value)
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Returns the file that configures `environment` inside `dir`.
    pub fn resolve_path(dir: &Path, environment: Environment) -> PathBuf {
        let profile = dir.join(format!("{}.yml", environment.as_str()));
        if profile.is_file() {
            profile
        } else {
            dir.join(DEFAULT_CONFIG_FILE)
        }
    }

    pub fn load(dir: impl AsRef<Path>, environment: Environment) -> Result<Config, ConfigError> {
        let path = Self::resolve_path(dir.as_ref(), environment);
        debug!(path = %path.display(), %environment, "Loading configuration");

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content, environment).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse { path, source },
            other => other,
        })
    }

    pub fn parse(content: &str, environment: Environment) -> Result<Config, ConfigError> {
        let file: ConfigFile =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: PathBuf::new(),
                source,
            })?;
        Config::from_file(environment, file)
    }
}
