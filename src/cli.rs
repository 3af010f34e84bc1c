use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "prup",
    about = "Update a pull request branch with the latest changes of its base branch",
    long_about = "Update a pull request branch with the latest changes of its base branch.\n\n\
Without an argument, the pull request that belongs to the current branch is selected.\n\n\
The default behavior is to update with a merge (merging the base branch into the PR's \
branch). Pass --rebase to rebase the PR's branch on top of the base branch instead.\n\n\
If the current local branch tracks the PR branch, prup asks whether to pull the latest \
changes. Pass --update-local or --skip-local to skip the question. In non-interactive \
sessions the local branch is left alone unless --update-local is given.",
    version
)]
pub struct Cli {
    /// Pull request number, URL or branch
    #[arg(value_name = "NUMBER|URL|BRANCH")]
    pub selector: Option<String>,

    /// Update the local branch after the PR branch is updated
    #[arg(short = 'u', long)]
    pub update_local: bool,

    /// Do not update the local branch
    #[arg(short = 's', long)]
    pub skip_local: bool,

    /// Update the PR branch by rebasing it on top of the latest base branch
    #[arg(long)]
    pub rebase: bool,

    /// Select the base repository instead of deriving it from git remotes
    #[arg(short = 'R', long, value_name = "[HOST/]OWNER/REPO")]
    pub repo: Option<String>,

    /// Path to the local checkout (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub path: String,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}
