use crate::error::{PrupError, Result};
use crate::github::RepoRef;
use crate::services::{LocalBranchOps, RemoteRegistry};
use crate::utils::logging::verbose;
use crate::utils::remote_url::parse_remote_url;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// A git remote and the GitHub repository its fetch URL points at, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub fetch_url: String,
    pub repo: Option<RepoRef>,
}

impl Remote {
    fn priority(&self) -> usize {
        match self.name.as_str() {
            "upstream" => 0,
            "github" => 1,
            "origin" => 2,
            _ => 3,
        }
    }
}

/// Find the remote whose repository has the given owner and name.
pub fn find_by_repo<'a>(remotes: &'a [Remote], owner: &str, name: &str) -> Result<&'a Remote> {
    remotes
        .iter()
        .find(|remote| {
            remote
                .repo
                .as_ref()
                .is_some_and(|repo| repo.matches(owner, name))
        })
        .ok_or(PrupError::RemoteNotFound)
}

/// Parse `git remote -v` output into fetch remotes, ordered upstream, github, origin, rest.
pub fn parse_remotes(output: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let url = parts.next()?;
            let kind = parts.next().unwrap_or("(fetch)");
            (kind == "(fetch)").then(|| Remote {
                name: name.to_string(),
                fetch_url: url.to_string(),
                repo: parse_remote_url(url),
            })
        })
        .collect();

    remotes.sort_by_key(Remote::priority);
    remotes.dedup_by(|a, b| a.name == b.name);
    remotes
}

/// GitClient runs git in a working copy with hardened input validation.
#[derive(Debug, Clone)]
pub struct GitClient {
    work_dir: PathBuf,
}

impl GitClient {
    pub fn new<P: AsRef<Path>>(work_dir: P) -> Result<Self> {
        let work_dir = Self::validate_work_dir(work_dir.as_ref())?;
        Ok(Self { work_dir })
    }

    fn run_git(&self, args: &[&str]) -> Result<Output> {
        verbose(format!("git {}", args.join(" ")));
        Command::new("git")
            .current_dir(&self.work_dir)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                PrupError::GitOperation(format!(
                    "Failed to execute git command '{}': {e}",
                    args.join(" ")
                ))
            })
    }

    fn ensure_success(output: &Output, command: &str) -> Result<()> {
        if output.status.success() {
            return Ok(());
        }

        Err(PrupError::GitOperation(format!(
            "{} failed: {}",
            command,
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }

    fn validate_ref_name(kind: &str, name: &str) -> Result<()> {
        if name.is_empty()
            || name.starts_with('-')
            || name.chars().any(|c| c == '\0' || c == '\n' || c == '\r' || c == ' ')
        {
            return Err(PrupError::GitOperation(format!(
                "Invalid {} name: {:?}",
                kind, name
            )));
        }
        Ok(())
    }

    fn validate_work_dir(path: &Path) -> Result<PathBuf> {
        let dangerous = ['\0', '\n', '\r'];
        let path_str = path.to_string_lossy();
        if let Some(ch) = dangerous.iter().find(|c| path_str.contains(**c)) {
            return Err(PrupError::GitOperation(format!(
                "Path contains dangerous character: {:?}",
                ch
            )));
        }

        let canonical = path.canonicalize().map_err(|e| {
            PrupError::GitOperation(format!("Invalid path '{}': {e}", path.display()))
        })?;
        if !canonical.is_dir() {
            return Err(PrupError::GitOperation(format!(
                "Path '{}' is not a directory",
                canonical.display()
            )));
        }
        Ok(canonical)
    }
}

impl LocalBranchOps for GitClient {
    fn current_branch(&self) -> Result<String> {
        let output = self
            .run_git(&["symbolic-ref", "--quiet", "--short", "HEAD"])
            .map_err(|e| PrupError::LocalState(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                "HEAD is detached".to_string()
            } else {
                stderr
            };
            return Err(PrupError::LocalState(reason));
        }

        let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if branch.is_empty() {
            return Err(PrupError::LocalState("HEAD is detached".to_string()));
        }
        Ok(branch)
    }

    fn has_local_branch(&self, name: &str) -> bool {
        if Self::validate_ref_name("branch", name).is_err() {
            return false;
        }
        let reference = format!("refs/heads/{name}");
        self.run_git(&["rev-parse", "--verify", "--quiet", &reference])
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        Self::validate_ref_name("remote", remote)?;
        Self::validate_ref_name("branch", branch)?;

        let args = ["pull", "--ff-only", remote, branch];
        verbose(format!("git {}", args.join(" ")));

        // Output goes straight to the terminal so the user sees git's progress.
        let status = Command::new("git")
            .current_dir(&self.work_dir)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                PrupError::GitOperation(format!("Failed to execute git command 'git pull': {e}"))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(PrupError::GitOperation(format!("git pull exited with {status}")))
        }
    }
}

impl RemoteRegistry for GitClient {
    fn remotes(&self) -> Result<Vec<Remote>> {
        let output = self.run_git(&["remote", "-v"])?;
        Self::ensure_success(&output, "git remote -v")?;
        Ok(parse_remotes(&String::from_utf8_lossy(&output.stdout)))
    }
}
