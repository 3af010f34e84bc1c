use crate::error::{PrupError, Result};
use crate::github::{GitHubClient, RepoRef};
use crate::services::BranchUpdater;
use crate::utils::logging::verbose;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::time::Duration;

/// Snapshot of a pull request, fetched once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PullRequest {
    pub id: String,
    pub number: u64,
    pub head_ref_name: String,
    pub head_ref_oid: String,
    pub base_ref_name: String,
    pub url: String,
}

/// Fields a finder may put into a pull request selection set.
pub const PULL_REQUEST_FIELDS: &[&str] = &[
    "id",
    "number",
    "headRefName",
    "headRefOid",
    "baseRefName",
    "url",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindOptions {
    pub selector: String,
    pub fields: Vec<String>,
}

impl FindOptions {
    pub fn new(selector: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            selector: selector.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// How the base branch is brought into the head branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateMethod {
    #[default]
    Merge,
    Rebase,
}

impl fmt::Display for UpdateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpdateMethod::Merge => "MERGE",
            UpdateMethod::Rebase => "REBASE",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub pull_request_id: String,
    pub update_method: UpdateMethod,
    /// Refuse the update if the head moved since the snapshot was taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_head_oid: Option<String>,
}

const UPDATE_BRANCH_MUTATION: &str = r#"
mutation PullRequestUpdateBranch($input: UpdatePullRequestBranchInput!) {
  updatePullRequestBranch(input: $input) {
    pullRequest {
      id
      headRefOid
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBranchData {
    update_pull_request_branch: Option<UpdateBranchPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBranchPayload {
    pull_request: Option<PullRequest>,
}

/// Sends `updatePullRequestBranch` and returns the new head revision.
pub struct GitHubBranchUpdater {
    client: GitHubClient,
}

impl GitHubBranchUpdater {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    fn spinner(repo: &RepoRef, request: &UpdateRequest) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!(
            "Updating pull request branch in {} ({})",
            repo, request.update_method
        ));
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}

impl BranchUpdater for GitHubBranchUpdater {
    fn update_branch(&self, repo: &RepoRef, request: &UpdateRequest) -> Result<String> {
        verbose(format!(
            "Updating pull request {} in {} with {}",
            request.pull_request_id, repo, request.update_method
        ));

        let pb = Self::spinner(repo, request);
        let result: Result<UpdateBranchData> = self.client.graphql(
            "PullRequestUpdateBranch",
            UPDATE_BRANCH_MUTATION,
            json!({ "input": request }),
        );
        pb.finish_and_clear();

        result?
            .update_pull_request_branch
            .and_then(|payload| payload.pull_request)
            .map(|pr| pr.head_ref_oid)
            .ok_or_else(|| {
                PrupError::Api("updatePullRequestBranch returned no pull request".to_string())
            })
    }
}
