use crate::agents::update::{SkipReason, UpdateOptions, UpdateOutcome};
use crate::config::Settings;
use crate::error::Result;
use crate::github::RepoRef;
use crate::services::ServiceFactory;
use crate::utils::logging::verbose;
use std::path::Path;

/// Flags for one `prup` invocation, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct UpdateArgs {
    pub selector: Option<String>,
    pub update_local: bool,
    pub skip_local: bool,
    pub rebase: bool,
    pub repo: Option<String>,
    pub interactive: bool,
}

/// Execute the update workflow
pub fn execute_update<P: AsRef<Path>>(project_path: P, args: UpdateArgs) -> Result<UpdateOutcome> {
    // Flag combinations are rejected before any I/O.
    let opts = UpdateOptions::from_flags(
        args.selector,
        args.interactive,
        args.update_local,
        args.skip_local,
        args.rebase,
    )?;

    let settings = Settings::load()?;
    verbose(format!(
        "host={} endpoint={} token={}",
        settings.host,
        settings.graphql_endpoint(),
        if settings.token.is_some() { "set" } else { "unset" }
    ));

    let repo_override = args
        .repo
        .as_deref()
        .map(|full_name| RepoRef::from_full_name(full_name, &settings.host))
        .transpose()?;

    let services = ServiceFactory::create(&settings, project_path.as_ref(), repo_override)?;
    let outcome = services.orchestrator().run(&opts)?;
    verbose(describe_outcome(outcome));
    Ok(outcome)
}

fn describe_outcome(outcome: UpdateOutcome) -> &'static str {
    match outcome {
        UpdateOutcome::AlreadyUpToDate => "remote branch was already up to date",
        UpdateOutcome::RebaseNeedsManualPull => "rebased remotely; local branch needs a manual pull",
        UpdateOutcome::LocalUpdated => "remote and local branches updated",
        UpdateOutcome::RemoteOnly(reason) => match reason {
            SkipReason::Rebased => "rebased remotely; no local branch to reconcile",
            SkipReason::Skipped => "local update skipped (--skip-local)",
            SkipReason::NonInteractive => "local update skipped (non-interactive session)",
            SkipReason::DifferentBranch => "local update skipped (checkout is on another branch)",
            SkipReason::CannotPrompt => "local update skipped (no terminal to prompt on)",
            SkipReason::Declined => "local update declined",
        },
    }
}
