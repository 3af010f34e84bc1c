//! Capabilities the update orchestrator depends on.
//!
//! The orchestrator only talks to these traits, so it can run against GitHub
//! and a real git checkout or against in-memory fakes.

use crate::agents::version_control::Remote;
use crate::error::Result;
use crate::github::{FindOptions, PullRequest, RepoRef, UpdateRequest};

pub mod factory;
pub use factory::ServiceFactory;

/// Resolves a selector to a pull request and the repository it belongs to.
pub trait PullRequestFinder {
    fn find(&self, options: &FindOptions) -> Result<(PullRequest, RepoRef)>;
}

/// Updates the head branch on the remote service; returns the new head revision.
pub trait BranchUpdater {
    fn update_branch(&self, repo: &RepoRef, request: &UpdateRequest) -> Result<String>;
}

pub trait LocalBranchOps {
    fn current_branch(&self) -> Result<String>;

    /// Whether `refs/heads/<name>` exists.
    fn has_local_branch(&self, name: &str) -> bool;

    fn pull(&self, remote: &str, branch: &str) -> Result<()>;
}

pub trait RemoteRegistry {
    fn remotes(&self) -> Result<Vec<Remote>>;
}

pub trait Prompter {
    /// False when no interactive terminal is attached or prompting is disabled.
    fn can_prompt(&self) -> bool;

    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}

/// Line-oriented status output.
pub trait StatusSink {
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
    fn failure(&self, message: &str);
}
