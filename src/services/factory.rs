use crate::agents::GitClient;
use crate::agents::UpdateOrchestrator;
use crate::agents::update::{TerminalPrompter, TerminalStatus};
use crate::config::Settings;
use crate::error::Result;
use crate::github::{GitHubBranchUpdater, GitHubClient, GitHubFinder, RepoRef};
use std::path::Path;

/// The real capabilities: GitHub for the remote side, git for the checkout.
pub struct Services {
    pub finder: GitHubFinder,
    pub updater: GitHubBranchUpdater,
    pub git: GitClient,
    pub prompter: TerminalPrompter,
    pub status: TerminalStatus,
}

impl Services {
    pub fn orchestrator(&self) -> UpdateOrchestrator<'_> {
        UpdateOrchestrator::new(
            &self.finder,
            &self.updater,
            &self.git,
            &self.git,
            &self.prompter,
            &self.status,
        )
    }
}

pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create(
        settings: &Settings,
        work_dir: &Path,
        repo_override: Option<RepoRef>,
    ) -> Result<Services> {
        let client = GitHubClient::new(settings)?;
        let git = GitClient::new(work_dir)?;

        Ok(Services {
            finder: GitHubFinder::new(client.clone(), git.clone(), repo_override),
            updater: GitHubBranchUpdater::new(client),
            git,
            prompter: TerminalPrompter::new(settings.prompt_enabled),
            status: TerminalStatus,
        })
    }
}
