use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrupError {
    #[error("{0}")]
    InvalidOptions(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Cannot determine current branch: {0}")]
    LocalState(String),

    #[error(
        "current branch does not track the PR branch; consider switching to the correct branch or running the command without the `--update-local` option"
    )]
    BranchMismatch,

    #[error(
        "current branch does not track the PR branch; consider setting the branch to track the PR branch or running the command without the `--update-local` option"
    )]
    NoTrackingBranch,

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GraphQL: {0}")]
    Api(String),

    #[error("no matching remote found")]
    RemoteNotFound,

    #[error("cannot update local branch; running git pull failed")]
    Pull {
        #[source]
        source: Box<PrupError>,
    },

    #[error("Git operation failed: {0}")]
    GitOperation(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PrupError>;
