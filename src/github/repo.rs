use crate::error::{PrupError, Result};
use std::fmt;

pub const DEFAULT_HOST: &str = "github.com";

/// A repository on a GitHub host, identified by `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: normalize_host(&host.into()),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an `OWNER/REPO` or `HOST/OWNER/REPO` string.
    pub fn from_full_name(full_name: &str, default_host: &str) -> Result<Self> {
        let parts: Vec<&str> = full_name.trim().split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(default_host, *owner, *name))
            }
            [host, owner, name] if !host.is_empty() && !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(*host, *owner, *name))
            }
            _ => Err(PrupError::InvalidOptions(format!(
                "expected the \"[HOST/]OWNER/REPO\" format, got \"{}\"",
                full_name
            ))),
        }
    }

    /// Owner and name match, ignoring ASCII case.
    pub fn matches(&self, owner: &str, name: &str) -> bool {
        self.owner.eq_ignore_ascii_case(owner) && self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Lowercase the host and fold the aliases GitHub serves SSH from.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host == "ssh.github.com" {
        DEFAULT_HOST.to_string()
    } else {
        host.to_string()
    }
}
