pub mod client;
pub mod finder;
pub mod pull_request;
pub mod repo;

pub use client::GitHubClient;
pub use finder::GitHubFinder;
pub use pull_request::{
    FindOptions, GitHubBranchUpdater, PullRequest, UpdateMethod, UpdateRequest,
};
pub use repo::RepoRef;
