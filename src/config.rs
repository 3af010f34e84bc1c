use crate::error::{PrupError, Result};
use crate::github::repo::{DEFAULT_HOST, normalize_host};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "PRUP_CONFIG";
const HOST_ENV: &str = "GH_HOST";
const API_URL_ENV: &str = "PRUP_API_URL";
const TOKEN_ENVS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];
const PROMPT_DISABLED_ENV: &str = "PRUP_PROMPT_DISABLED";

/// Contents of the optional `config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub host: Option<String>,
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub prompt: Option<bool>,
}

/// Resolved runtime settings: config file first, environment on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub prompt_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_url: None,
            token: None,
            prompt_enabled: true,
        }
    }
}

impl Settings {
    /// Load settings from the config file (if any) and the process environment.
    pub fn load() -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        let file = match config_path(&env) {
            Some(path) if path.exists() => Some(Self::read_file(&path)?),
            Some(path) if env(CONFIG_ENV).is_some() => {
                return Err(PrupError::Config(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            _ => None,
        };
        Ok(Self::resolve(file.unwrap_or_default(), env))
    }

    pub fn read_file(path: &Path) -> Result<FileSettings> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PrupError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn resolve<F>(file: FileSettings, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = env(HOST_ENV)
            .or(file.host)
            .map(|h| normalize_host(&h))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let api_url = env(API_URL_ENV).or(file.api_url);
        let token = TOKEN_ENVS.iter().find_map(|key| env(*key)).or(file.token);
        let prompt_enabled = env(PROMPT_DISABLED_ENV).is_none() && file.prompt.unwrap_or(true);

        Self {
            host,
            api_url,
            token,
            prompt_enabled,
        }
    }

    /// GraphQL endpoint for the configured host.
    pub fn graphql_endpoint(&self) -> String {
        if let Some(api_url) = &self.api_url {
            return api_url.clone();
        }
        if self.host == DEFAULT_HOST {
            "https://api.github.com/graphql".to_string()
        } else {
            format!("https://{}/api/graphql", self.host)
        }
    }
}

fn config_path<F>(env: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = env(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let base = env("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("prup").join("config.toml"))
}
