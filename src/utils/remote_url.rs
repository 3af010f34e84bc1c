use crate::github::RepoRef;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// `[user@]host:owner/repo(.git)` as written by `git clone git@github.com:owner/repo`.
static SCP_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9._~-]+@)?([A-Za-z0-9.-]+):([^/].*)$").expect("valid regex")
});

/// Parse a git remote URL into the repository it points at.
///
/// Supports `https://`, `http://`, `ssh://`, `git://`, `git+ssh://` and scp-like
/// `git@host:owner/repo.git` forms. Local paths and anything without an
/// `owner/repo` path return `None`.
pub fn parse_remote_url(raw: &str) -> Option<RepoRef> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.contains("://") {
        let url = Url::parse(raw).ok()?;
        if !matches!(
            url.scheme(),
            "https" | "http" | "ssh" | "git" | "git+ssh" | "ssh+git"
        ) {
            return None;
        }
        return repo_from_path(url.host_str()?, url.path());
    }

    let captures = SCP_LIKE.captures(raw)?;
    repo_from_path(captures.get(1)?.as_str(), captures.get(2)?.as_str())
}

/// Parse `https://<host>/<owner>/<repo>/pull/<number>[/...]`.
pub fn parse_pull_request_url(raw: &str) -> Option<(RepoRef, u64)> {
    let url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "https" | "http") {
        return None;
    }

    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [owner, repo, "pull", number, ..] => {
            let number = number.parse::<u64>().ok()?;
            Some((RepoRef::new(url.host_str()?, *owner, *repo), number))
        }
        _ => None,
    }
}

fn repo_from_path(host: &str, path: &str) -> Option<RepoRef> {
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let name = parts.next().filter(|s| !s.is_empty())?;
    if parts.next().is_some() {
        return None;
    }
    Some(RepoRef::new(host, owner, name))
}
