use crate::agents::version_control::{GitClient, Remote};
use crate::error::{PrupError, Result};
use crate::github::pull_request::PULL_REQUEST_FIELDS;
use crate::github::{FindOptions, GitHubClient, PullRequest, RepoRef};
use crate::services::{LocalBranchOps, PullRequestFinder, RemoteRegistry};
use crate::utils::logging::verbose;
use crate::utils::remote_url::parse_pull_request_url;
use serde::Deserialize;
use serde_json::json;

/// The forms a user can name a pull request by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// No argument: the pull request whose head is the current branch.
    CurrentBranch,
    Number(u64),
    Url(RepoRef, u64),
    Branch(String),
}

impl Selector {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Selector::CurrentBranch);
        }

        if let Ok(number) = raw.strip_prefix('#').unwrap_or(raw).parse::<u64>() {
            return Ok(Selector::Number(number));
        }

        if raw.starts_with("https://") || raw.starts_with("http://") {
            return parse_pull_request_url(raw)
                .map(|(repo, number)| Selector::Url(repo, number))
                .ok_or_else(|| {
                    PrupError::InvalidOptions(format!("invalid pull request URL: {}", raw))
                });
        }

        // `owner:branch` as shown on the pull request page
        let branch = raw.split_once(':').map_or(raw, |(_, branch)| branch);
        Ok(Selector::Branch(branch.to_string()))
    }
}

/// First remote (already in upstream, github, origin order) pointing at `host`.
pub fn pick_base_repo(remotes: &[Remote], host: &str) -> Option<RepoRef> {
    remotes
        .iter()
        .filter_map(|remote| remote.repo.as_ref())
        .find(|repo| repo.host.eq_ignore_ascii_case(host))
        .cloned()
}

/// Build a GraphQL selection set from allow-listed field names.
pub fn selection_set(fields: &[String]) -> Result<String> {
    if let Some(unknown) = fields
        .iter()
        .find(|f| !PULL_REQUEST_FIELDS.contains(&f.as_str()))
    {
        return Err(PrupError::InvalidOptions(format!(
            "unsupported pull request field: {}",
            unknown
        )));
    }
    if fields.is_empty() {
        return Ok("id".to_string());
    }
    Ok(fields.join(" "))
}

#[derive(Debug, Deserialize)]
struct RepositoryData<T> {
    repository: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByNumber {
    pull_request: Option<PullRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByBranch {
    pull_requests: Connection,
}

#[derive(Debug, Deserialize)]
struct Connection {
    nodes: Vec<PullRequest>,
}

/// Looks pull requests up on GitHub, using the local checkout for defaults.
pub struct GitHubFinder {
    client: GitHubClient,
    git: GitClient,
    repo_override: Option<RepoRef>,
}

impl GitHubFinder {
    pub fn new(client: GitHubClient, git: GitClient, repo_override: Option<RepoRef>) -> Self {
        Self {
            client,
            git,
            repo_override,
        }
    }

    fn base_repo(&self) -> Result<RepoRef> {
        if let Some(repo) = &self.repo_override {
            return Ok(repo.clone());
        }
        let remotes = self.git.remotes()?;
        pick_base_repo(&remotes, self.client.host()).ok_or_else(|| {
            PrupError::NotFound(format!(
                "none of the git remotes point to a repository on {}; use --repo OWNER/REPO",
                self.client.host()
            ))
        })
    }

    fn find_by_number(&self, repo: &RepoRef, number: u64, selection: &str) -> Result<PullRequest> {
        let query = format!(
            "query PullRequestByNumber($owner: String!, $repo: String!, $number: Int!) {{
  repository(owner: $owner, name: $repo) {{
    pullRequest(number: $number) {{ {selection} }}
  }}
}}"
        );
        let data: RepositoryData<ByNumber> = self.client.graphql(
            "PullRequestByNumber",
            &query,
            json!({ "owner": repo.owner, "repo": repo.name, "number": number }),
        )?;

        data.repository
            .and_then(|r| r.pull_request)
            .ok_or_else(|| PrupError::NotFound(format!("no pull request #{} in {}", number, repo)))
    }

    fn find_by_branch(&self, repo: &RepoRef, branch: &str, selection: &str) -> Result<PullRequest> {
        let query = format!(
            "query PullRequestForBranch($owner: String!, $repo: String!, $headRefName: String!) {{
  repository(owner: $owner, name: $repo) {{
    pullRequests(headRefName: $headRefName, states: OPEN, first: 1) {{
      nodes {{ {selection} }}
    }}
  }}
}}"
        );
        let data: RepositoryData<ByBranch> = self.client.graphql(
            "PullRequestForBranch",
            &query,
            json!({ "owner": repo.owner, "repo": repo.name, "headRefName": branch }),
        )?;

        data.repository
            .and_then(|r| r.pull_requests.nodes.into_iter().next())
            .ok_or_else(|| {
                PrupError::NotFound(format!("no pull requests found for branch \"{}\"", branch))
            })
    }
}

impl PullRequestFinder for GitHubFinder {
    fn find(&self, options: &FindOptions) -> Result<(PullRequest, RepoRef)> {
        let selection = selection_set(&options.fields)?;
        let selector = Selector::parse(&options.selector)?;
        verbose(format!("Resolving pull request from {:?}", selector));

        let (pr, repo) = match selector {
            Selector::Url(repo, number) => {
                if !repo.host.eq_ignore_ascii_case(self.client.host()) {
                    return Err(PrupError::InvalidOptions(format!(
                        "pull request URL is on {} but the configured host is {}; set GH_HOST",
                        repo.host,
                        self.client.host()
                    )));
                }
                let pr = self.find_by_number(&repo, number, &selection)?;
                (pr, repo)
            }
            Selector::Number(number) => {
                let repo = self.base_repo()?;
                let pr = self.find_by_number(&repo, number, &selection)?;
                (pr, repo)
            }
            Selector::Branch(branch) => {
                let repo = self.base_repo()?;
                let pr = self.find_by_branch(&repo, &branch, &selection)?;
                (pr, repo)
            }
            Selector::CurrentBranch => {
                let branch = self.git.current_branch()?;
                let repo = self.base_repo()?;
                let pr = self.find_by_branch(&repo, &branch, &selection)?;
                (pr, repo)
            }
        };

        verbose(format!("Found pull request {}", describe(&pr)));
        Ok((pr, repo))
    }
}

/// One-line summary built from the fields the lookup actually selected.
fn describe(pr: &PullRequest) -> String {
    let mut parts = Vec::new();
    if pr.number > 0 {
        parts.push(format!("#{}", pr.number));
    }
    parts.push(pr.id.clone());
    if !pr.url.is_empty() {
        parts.push(pr.url.clone());
    }
    if pr.base_ref_name.is_empty() {
        parts.push(format!("head {}", pr.head_ref_name));
    } else {
        parts.push(format!("({} <- {})", pr.base_ref_name, pr.head_ref_name));
    }
    parts.join(" ")
}
