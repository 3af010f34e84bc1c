//! Synchronizes a pull request branch with its base, then reconciles the local checkout.
//!
//! The run is an ordered pipeline. Every step either hands its result to the
//! next one or ends the run with an [`UpdateOutcome`]:
//!
//! 1. resolve the pull request and the current branch
//! 2. check `--update-local` eligibility (before any remote call)
//! 3. update the branch on the remote
//! 4. stop if nothing changed, or if the local checkout must not be touched
//! 5. ask (when allowed), find the matching remote and pull

use super::context::{LocalUpdateMode, UpdateOptions};
use crate::agents::version_control::{Remote, find_by_repo};
use crate::error::{PrupError, Result};
use crate::github::{FindOptions, PullRequest, RepoRef, UpdateMethod, UpdateRequest};
use crate::services::{
    BranchUpdater, LocalBranchOps, PullRequestFinder, Prompter, RemoteRegistry, StatusSink,
};
use crate::utils::logging::verbose;
use std::ops::ControlFlow;

const REQUIRED_FIELDS: &[&str] = &["id", "number", "headRefName", "headRefOid"];
const LOCAL_UPDATE_PROMPT: &str = "Update branch locally?";

/// Why the local checkout was left alone after a successful remote update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Rebased remotely and there is no local branch to warn about.
    Rebased,
    /// `--skip-local` was given.
    Skipped,
    NonInteractive,
    /// The checkout is on some other branch.
    DifferentBranch,
    /// Interactive session without a terminal to prompt on.
    CannotPrompt,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    AlreadyUpToDate,
    /// Rebased remotely while a local branch exists; the user has to pull by hand.
    RebaseNeedsManualPull,
    RemoteOnly(SkipReason),
    LocalUpdated,
}

type Step<T = ()> = ControlFlow<UpdateOutcome, T>;

macro_rules! proceed {
    ($step:expr) => {
        match $step {
            ControlFlow::Continue(value) => value,
            ControlFlow::Break(outcome) => return Ok(outcome),
        }
    };
}

pub struct UpdateOrchestrator<'a> {
    finder: &'a dyn PullRequestFinder,
    updater: &'a dyn BranchUpdater,
    git: &'a dyn LocalBranchOps,
    remotes: &'a dyn RemoteRegistry,
    prompter: &'a dyn Prompter,
    status: &'a dyn StatusSink,
}

impl<'a> UpdateOrchestrator<'a> {
    pub fn new(
        finder: &'a dyn PullRequestFinder,
        updater: &'a dyn BranchUpdater,
        git: &'a dyn LocalBranchOps,
        remotes: &'a dyn RemoteRegistry,
        prompter: &'a dyn Prompter,
        status: &'a dyn StatusSink,
    ) -> Self {
        Self {
            finder,
            updater,
            git,
            remotes,
            prompter,
            status,
        }
    }

    pub fn run(&self, opts: &UpdateOptions) -> Result<UpdateOutcome> {
        let (pr, repo) = self
            .finder
            .find(&FindOptions::new(opts.selector.as_str(), REQUIRED_FIELDS))?;
        let current_branch = self.current_branch()?;

        self.check_forced_update(opts, &pr, &current_branch)?;

        let request = update_request(opts, &pr);
        let new_head = self.updater.update_branch(&repo, &request)?;

        proceed!(self.compare_revisions(&pr, &new_head));
        proceed!(self.after_remote_update(opts, &pr));
        proceed!(guard_branch_match(&pr, &current_branch));
        proceed!(self.prompt_gate(opts)?);

        let remote = self.matching_remote(&repo)?;
        self.pull(&remote, &pr)?;
        Ok(UpdateOutcome::LocalUpdated)
    }

    fn current_branch(&self) -> Result<String> {
        self.git.current_branch().map_err(|err| match err {
            PrupError::LocalState(_) => err,
            other => PrupError::LocalState(other.to_string()),
        })
    }

    /// `--update-local` pulls into the checkout, so it must be on the PR branch.
    fn check_forced_update(
        &self,
        opts: &UpdateOptions,
        pr: &PullRequest,
        current_branch: &str,
    ) -> Result<()> {
        if opts.local_mode != LocalUpdateMode::Force {
            return Ok(());
        }
        if current_branch != pr.head_ref_name {
            return Err(PrupError::BranchMismatch);
        }
        if !self.git.has_local_branch(&pr.head_ref_name) {
            return Err(PrupError::NoTrackingBranch);
        }
        Ok(())
    }

    fn compare_revisions(&self, pr: &PullRequest, new_head: &str) -> Step {
        if new_head == pr.head_ref_oid {
            self.status.success("PR branch already up-to-date");
            return ControlFlow::Break(UpdateOutcome::AlreadyUpToDate);
        }
        verbose(format!("head moved {} -> {}", pr.head_ref_oid, new_head));
        self.status.success("PR branch updated");
        ControlFlow::Continue(())
    }

    /// A remote rebase rewrites history, so it is never pulled automatically.
    fn after_remote_update(&self, opts: &UpdateOptions, pr: &PullRequest) -> Step {
        if opts.method == UpdateMethod::Rebase {
            if self.git.has_local_branch(&pr.head_ref_name) {
                self.status.warning(
                    "warning: due to rebase, you need to manually pull the latest changes to the local branch",
                );
                return ControlFlow::Break(UpdateOutcome::RebaseNeedsManualPull);
            }
            return ControlFlow::Break(UpdateOutcome::RemoteOnly(SkipReason::Rebased));
        }

        match opts.local_mode {
            LocalUpdateMode::Skip => {
                ControlFlow::Break(UpdateOutcome::RemoteOnly(SkipReason::Skipped))
            }
            LocalUpdateMode::Auto if !opts.interactive => {
                ControlFlow::Break(UpdateOutcome::RemoteOnly(SkipReason::NonInteractive))
            }
            _ => ControlFlow::Continue(()),
        }
    }

    fn prompt_gate(&self, opts: &UpdateOptions) -> Result<Step> {
        if !opts.interactive || opts.local_mode != LocalUpdateMode::Auto {
            return Ok(ControlFlow::Continue(()));
        }
        if !self.prompter.can_prompt() {
            return Ok(ControlFlow::Break(UpdateOutcome::RemoteOnly(
                SkipReason::CannotPrompt,
            )));
        }
        if !self.prompter.confirm(LOCAL_UPDATE_PROMPT, true)? {
            return Ok(ControlFlow::Break(UpdateOutcome::RemoteOnly(
                SkipReason::Declined,
            )));
        }
        Ok(ControlFlow::Continue(()))
    }

    fn matching_remote(&self, repo: &RepoRef) -> Result<Remote> {
        let remotes = self.remotes.remotes()?;
        let remote = find_by_repo(&remotes, &repo.owner, &repo.name)?;
        verbose(format!("pulling from {} ({})", remote.name, remote.fetch_url));
        Ok(remote.clone())
    }

    fn pull(&self, remote: &Remote, pr: &PullRequest) -> Result<()> {
        if let Err(err) = self.git.pull(&remote.name, &pr.head_ref_name) {
            verbose(format!("pull failed: {err}"));
            self.status.failure("cannot update local branch");
            return Err(PrupError::Pull {
                source: Box::new(err),
            });
        }
        self.status.success("local branch updated");
        Ok(())
    }
}

fn update_request(opts: &UpdateOptions, pr: &PullRequest) -> UpdateRequest {
    UpdateRequest {
        pull_request_id: pr.id.clone(),
        update_method: opts.method,
        expected_head_oid: Some(pr.head_ref_oid.clone()).filter(|oid| !oid.is_empty()),
    }
}

/// Only the branch matching the pull request is ever reconciled.
fn guard_branch_match(pr: &PullRequest, current_branch: &str) -> Step {
    if current_branch != pr.head_ref_name {
        return ControlFlow::Break(UpdateOutcome::RemoteOnly(SkipReason::DifferentBranch));
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::update::status::{StatusKind, StatusLine};
    use std::cell::{Cell, RefCell};

    struct FakeFinder {
        pr: PullRequest,
        repo: RepoRef,
        found: bool,
        queries: RefCell<Vec<FindOptions>>,
    }

    impl PullRequestFinder for FakeFinder {
        fn find(&self, options: &FindOptions) -> Result<(PullRequest, RepoRef)> {
            self.queries.borrow_mut().push(options.clone());
            if !self.found {
                return Err(PrupError::NotFound(
                    "no pull requests found for branch \"pr-branch\"".into(),
                ));
            }
            Ok((self.pr.clone(), self.repo.clone()))
        }
    }

    struct FakeUpdater {
        new_head: Option<String>,
        requests: RefCell<Vec<UpdateRequest>>,
    }

    impl BranchUpdater for FakeUpdater {
        fn update_branch(&self, _repo: &RepoRef, request: &UpdateRequest) -> Result<String> {
            self.requests.borrow_mut().push(request.clone());
            self.new_head
                .clone()
                .ok_or_else(|| PrupError::Api("merge conflict between base and head".into()))
        }
    }

    struct FakeGit {
        current: Option<String>,
        local_branches: Vec<String>,
        pull_fails: bool,
        branch_checks: Cell<usize>,
        pulls: RefCell<Vec<(String, String)>>,
    }

    impl LocalBranchOps for FakeGit {
        fn current_branch(&self) -> Result<String> {
            self.current
                .clone()
                .ok_or_else(|| PrupError::GitOperation("not a git repository".into()))
        }

        fn has_local_branch(&self, name: &str) -> bool {
            self.branch_checks.set(self.branch_checks.get() + 1);
            self.local_branches.iter().any(|b| b == name)
        }

        fn pull(&self, remote: &str, branch: &str) -> Result<()> {
            self.pulls
                .borrow_mut()
                .push((remote.to_string(), branch.to_string()));
            if self.pull_fails {
                return Err(PrupError::GitOperation("git pull exited with 1".into()));
            }
            Ok(())
        }
    }

    struct FakeRemotes {
        remotes: Vec<Remote>,
    }

    impl RemoteRegistry for FakeRemotes {
        fn remotes(&self) -> Result<Vec<Remote>> {
            Ok(self.remotes.clone())
        }
    }

    struct FakePrompter {
        can_prompt: bool,
        answer: Option<bool>,
        asked: RefCell<Vec<(String, bool)>>,
    }

    impl Prompter for FakePrompter {
        fn can_prompt(&self) -> bool {
            self.can_prompt
        }

        fn confirm(&self, message: &str, default: bool) -> Result<bool> {
            self.asked.borrow_mut().push((message.to_string(), default));
            self.answer
                .ok_or_else(|| PrupError::Prompt("no answer received".into()))
        }
    }

    #[derive(Default)]
    struct RecordingStatus {
        lines: RefCell<Vec<StatusLine>>,
    }

    impl RecordingStatus {
        fn push(&self, kind: StatusKind, message: &str) {
            self.lines.borrow_mut().push(StatusLine::new(kind, message));
        }
    }

    impl StatusSink for RecordingStatus {
        fn success(&self, message: &str) {
            self.push(StatusKind::Success, message);
        }

        fn warning(&self, message: &str) {
            self.push(StatusKind::Warning, message);
        }

        fn failure(&self, message: &str) {
            self.push(StatusKind::Failure, message);
        }
    }

    struct Harness {
        finder: FakeFinder,
        updater: FakeUpdater,
        git: FakeGit,
        remotes: FakeRemotes,
        prompter: FakePrompter,
        status: RecordingStatus,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                finder: FakeFinder {
                    pr: PullRequest {
                        id: "123".into(),
                        head_ref_name: "pr-branch".into(),
                        head_ref_oid: "head-ref-oid".into(),
                        ..PullRequest::default()
                    },
                    repo: RepoRef::new("github.com", "OWNER", "REPO"),
                    found: true,
                    queries: RefCell::default(),
                },
                updater: FakeUpdater {
                    new_head: Some("new-head-ref-oid".into()),
                    requests: RefCell::default(),
                },
                git: FakeGit {
                    current: Some("pr-branch".into()),
                    local_branches: vec!["pr-branch".into()],
                    pull_fails: false,
                    branch_checks: Cell::new(0),
                    pulls: RefCell::default(),
                },
                remotes: FakeRemotes {
                    remotes: vec![Remote {
                        name: "origin".into(),
                        fetch_url: "https://github.com/OWNER/REPO.git".into(),
                        repo: Some(RepoRef::new("github.com", "OWNER", "REPO")),
                    }],
                },
                prompter: FakePrompter {
                    can_prompt: true,
                    answer: Some(true),
                    asked: RefCell::default(),
                },
                status: RecordingStatus::default(),
            }
        }

        fn unchanged_head(mut self) -> Self {
            self.updater.new_head = Some("head-ref-oid".into());
            self
        }

        fn on_branch(mut self, branch: &str) -> Self {
            self.git.current = Some(branch.into());
            self
        }

        fn run(&self, opts: &UpdateOptions) -> Result<UpdateOutcome> {
            UpdateOrchestrator::new(
                &self.finder,
                &self.updater,
                &self.git,
                &self.remotes,
                &self.prompter,
                &self.status,
            )
            .run(opts)
        }

        fn stderr(&self) -> Vec<String> {
            self.status
                .lines
                .borrow()
                .iter()
                .map(|line| line.to_string())
                .collect()
        }

        fn sent_methods(&self) -> Vec<UpdateMethod> {
            self.updater
                .requests
                .borrow()
                .iter()
                .map(|r| r.update_method)
                .collect()
        }

        fn pulls(&self) -> Vec<(String, String)> {
            self.git.pulls.borrow().clone()
        }

        fn prompts(&self) -> usize {
            self.prompter.asked.borrow().len()
        }
    }

    fn options(
        interactive: bool,
        method: UpdateMethod,
        local_mode: LocalUpdateMode,
    ) -> UpdateOptions {
        UpdateOptions {
            selector: "123".into(),
            interactive,
            method,
            local_mode,
        }
    }

    fn tty() -> UpdateOptions {
        options(true, UpdateMethod::Merge, LocalUpdateMode::Auto)
    }

    #[test]
    fn no_update_on_tty() {
        let h = Harness::new().unchanged_head();
        let outcome = h.run(&tty()).unwrap();

        assert_eq!(outcome, UpdateOutcome::AlreadyUpToDate);
        assert_eq!(h.stderr(), vec!["✓ PR branch already up-to-date"]);
        assert_eq!(h.sent_methods(), vec![UpdateMethod::Merge]);
        assert!(h.pulls().is_empty());
        assert_eq!(h.prompts(), 0);
    }

    #[test]
    fn finder_receives_selector_and_fields() {
        let h = Harness::new().unchanged_head();
        h.run(&tty()).unwrap();

        let queries = h.finder.queries.borrow();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].selector, "123");
        assert_eq!(queries[0].fields, vec!["id", "number", "headRefName", "headRefOid"]);
    }

    #[test]
    fn request_carries_id_and_expected_head() {
        let h = Harness::new();
        h.run(&tty()).unwrap();

        let requests = h.updater.requests.borrow();
        assert_eq!(
            requests[0],
            UpdateRequest {
                pull_request_id: "123".into(),
                update_method: UpdateMethod::Merge,
                expected_head_oid: Some("head-ref-oid".into()),
            }
        );
    }

    #[test]
    fn no_update_ignores_every_local_flag() {
        for local_mode in [
            LocalUpdateMode::Auto,
            LocalUpdateMode::Force,
            LocalUpdateMode::Skip,
        ] {
            for interactive in [true, false] {
                let h = Harness::new().unchanged_head();
                let outcome = h
                    .run(&options(interactive, UpdateMethod::Merge, local_mode))
                    .unwrap();
                assert_eq!(outcome, UpdateOutcome::AlreadyUpToDate);
                assert_eq!(h.stderr(), vec!["✓ PR branch already up-to-date"]);
                assert!(h.pulls().is_empty());
                assert_eq!(h.prompts(), 0);
            }
        }
    }

    #[test]
    fn no_update_on_different_local_branch() {
        let h = Harness::new().unchanged_head().on_branch("some-other-branch");
        assert_eq!(h.run(&tty()).unwrap(), UpdateOutcome::AlreadyUpToDate);
        assert_eq!(h.stderr(), vec!["✓ PR branch already up-to-date"]);
    }

    #[test]
    fn merge_update_on_different_local_branch() {
        let h = Harness::new().on_branch("some-other-branch");
        let outcome = h.run(&tty()).unwrap();

        assert_eq!(outcome, UpdateOutcome::RemoteOnly(SkipReason::DifferentBranch));
        assert_eq!(h.stderr(), vec!["✓ PR branch updated"]);
        assert_eq!(h.prompts(), 0);
        assert!(h.pulls().is_empty());
    }

    #[test]
    fn merge_update_prompt_declined() {
        let mut h = Harness::new();
        h.prompter.answer = Some(false);
        let outcome = h.run(&tty()).unwrap();

        assert_eq!(outcome, UpdateOutcome::RemoteOnly(SkipReason::Declined));
        assert_eq!(h.stderr(), vec!["✓ PR branch updated"]);
        assert_eq!(
            *h.prompter.asked.borrow(),
            vec![("Update branch locally?".to_string(), true)]
        );
        assert!(h.pulls().is_empty());
    }

    #[test]
    fn merge_update_prompt_accepted_pulls() {
        let h = Harness::new();
        let outcome = h.run(&tty()).unwrap();

        assert_eq!(outcome, UpdateOutcome::LocalUpdated);
        assert_eq!(
            h.stderr(),
            vec!["✓ PR branch updated", "✓ local branch updated"]
        );
        assert_eq!(
            h.pulls(),
            vec![("origin".to_string(), "pr-branch".to_string())]
        );
    }

    #[test]
    fn prompt_error_is_returned() {
        let mut h = Harness::new();
        h.prompter.answer = None;
        let err = h.run(&tty()).unwrap_err();

        assert!(matches!(err, PrupError::Prompt(_)));
        assert_eq!(h.stderr(), vec!["✓ PR branch updated"]);
        assert!(h.pulls().is_empty());
    }

    #[test]
    fn interactive_without_terminal_does_not_prompt() {
        let mut h = Harness::new();
        h.prompter.can_prompt = false;
        let outcome = h.run(&tty()).unwrap();

        assert_eq!(outcome, UpdateOutcome::RemoteOnly(SkipReason::CannotPrompt));
        assert_eq!(h.prompts(), 0);
        assert!(h.pulls().is_empty());
    }

    #[test]
    fn forced_update_pulls_without_prompt() {
        let h = Harness::new();
        let outcome = h
            .run(&options(true, UpdateMethod::Merge, LocalUpdateMode::Force))
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::LocalUpdated);
        assert_eq!(
            h.stderr(),
            vec!["✓ PR branch updated", "✓ local branch updated"]
        );
        assert_eq!(h.prompts(), 0);
        assert_eq!(h.pulls().len(), 1);
    }

    #[test]
    fn forced_update_pulls_in_non_interactive_session() {
        let h = Harness::new();
        let outcome = h
            .run(&options(false, UpdateMethod::Merge, LocalUpdateMode::Force))
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::LocalUpdated);
        assert_eq!(h.prompts(), 0);
        assert_eq!(h.pulls().len(), 1);
    }

    #[test]
    fn forced_update_on_different_branch_fails_before_remote_call() {
        let h = Harness::new().on_branch("some-other-branch");
        let err = h
            .run(&options(true, UpdateMethod::Merge, LocalUpdateMode::Force))
            .unwrap_err();

        assert!(matches!(err, PrupError::BranchMismatch));
        assert_eq!(
            err.to_string(),
            "current branch does not track the PR branch; consider switching to the correct branch or running the command without the `--update-local` option"
        );
        assert!(h.stderr().is_empty());
        assert!(h.updater.requests.borrow().is_empty());
        assert!(h.pulls().is_empty());
    }

    #[test]
    fn forced_update_without_local_branch_fails_before_remote_call() {
        let mut h = Harness::new();
        h.git.local_branches.clear();
        let err = h
            .run(&options(true, UpdateMethod::Merge, LocalUpdateMode::Force))
            .unwrap_err();

        assert!(matches!(err, PrupError::NoTrackingBranch));
        assert_eq!(
            err.to_string(),
            "current branch does not track the PR branch; consider setting the branch to track the PR branch or running the command without the `--update-local` option"
        );
        assert!(h.stderr().is_empty());
        assert!(h.updater.requests.borrow().is_empty());
    }

    #[test]
    fn forced_update_pull_failure_is_reported_and_returned() {
        let mut h = Harness::new();
        h.git.pull_fails = true;
        let err = h
            .run(&options(true, UpdateMethod::Merge, LocalUpdateMode::Force))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "cannot update local branch; running git pull failed"
        );
        assert!(matches!(err, PrupError::Pull { .. }));
        assert_eq!(
            h.stderr(),
            vec!["✓ PR branch updated", "X cannot update local branch"]
        );
    }

    #[test]
    fn prompted_pull_failure_is_reported_and_returned() {
        let mut h = Harness::new();
        h.git.pull_fails = true;
        let err = h.run(&tty()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "cannot update local branch; running git pull failed"
        );
        assert_eq!(
            h.stderr(),
            vec!["✓ PR branch updated", "X cannot update local branch"]
        );
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("Git operation failed: git pull exited with 1")
        );
    }

    #[test]
    fn skip_local_never_pulls() {
        let h = Harness::new();
        let outcome = h
            .run(&options(true, UpdateMethod::Merge, LocalUpdateMode::Skip))
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::RemoteOnly(SkipReason::Skipped));
        assert_eq!(h.stderr(), vec!["✓ PR branch updated"]);
        assert_eq!(h.prompts(), 0);
        assert!(h.pulls().is_empty());
    }

    #[test]
    fn non_interactive_never_prompts_or_pulls() {
        let h = Harness::new();
        let outcome = h
            .run(&options(false, UpdateMethod::Merge, LocalUpdateMode::Auto))
            .unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::RemoteOnly(SkipReason::NonInteractive)
        );
        assert_eq!(h.stderr(), vec!["✓ PR branch updated"]);
        assert_eq!(h.prompts(), 0);
        assert!(h.pulls().is_empty());
    }

    #[test]
    fn rebase_without_update_sends_rebase() {
        let h = Harness::new().unchanged_head();
        let outcome = h
            .run(&options(true, UpdateMethod::Rebase, LocalUpdateMode::Auto))
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::AlreadyUpToDate);
        assert_eq!(h.sent_methods(), vec![UpdateMethod::Rebase]);
        assert_eq!(h.stderr(), vec!["✓ PR branch already up-to-date"]);
    }

    #[test]
    fn rebase_with_local_branch_warns() {
        for (interactive, local_mode) in [
            (true, LocalUpdateMode::Auto),
            (false, LocalUpdateMode::Auto),
            (true, LocalUpdateMode::Skip),
        ] {
            let h = Harness::new();
            let outcome = h
                .run(&options(interactive, UpdateMethod::Rebase, local_mode))
                .unwrap();

            assert_eq!(outcome, UpdateOutcome::RebaseNeedsManualPull);
            assert_eq!(
                h.stderr(),
                vec![
                    "✓ PR branch updated",
                    "! warning: due to rebase, you need to manually pull the latest changes to the local branch",
                ]
            );
            assert_eq!(h.prompts(), 0);
            assert!(h.pulls().is_empty());
        }
    }

    #[test]
    fn rebase_without_local_branch_stops_quietly() {
        let mut h = Harness::new();
        h.git.local_branches.clear();
        let outcome = h
            .run(&options(true, UpdateMethod::Rebase, LocalUpdateMode::Auto))
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::RemoteOnly(SkipReason::Rebased));
        assert_eq!(h.stderr(), vec!["✓ PR branch updated"]);
        assert!(h.pulls().is_empty());
    }

    #[test]
    fn branch_existence_only_checked_when_needed() {
        let h = Harness::new();
        h.run(&tty()).unwrap();
        assert_eq!(h.git.branch_checks.get(), 0);
    }

    #[test]
    fn finder_errors_propagate_unchanged() {
        let mut h = Harness::new();
        h.finder.found = false;
        let err = h.run(&tty()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "no pull requests found for branch \"pr-branch\""
        );
        assert!(h.updater.requests.borrow().is_empty());
        assert!(h.stderr().is_empty());
    }

    #[test]
    fn unknown_current_branch_is_local_state_error() {
        let mut h = Harness::new();
        h.git.current = None;
        let err = h.run(&tty()).unwrap_err();

        assert!(matches!(err, PrupError::LocalState(_)));
        assert!(h.updater.requests.borrow().is_empty());
    }

    #[test]
    fn remote_update_errors_propagate_unchanged() {
        let mut h = Harness::new();
        h.updater.new_head = None;
        let err = h.run(&tty()).unwrap_err();

        assert_eq!(err.to_string(), "GraphQL: merge conflict between base and head");
        assert_eq!(h.updater.requests.borrow().len(), 1);
        assert!(h.stderr().is_empty());
    }

    #[test]
    fn missing_remote_for_repository_fails() {
        let mut h = Harness::new();
        h.remotes.remotes[0].repo = Some(RepoRef::new("github.com", "fork", "REPO"));
        let err = h.run(&tty()).unwrap_err();

        assert!(matches!(err, PrupError::RemoteNotFound));
        assert_eq!(h.stderr(), vec!["✓ PR branch updated"]);
        assert!(h.pulls().is_empty());
    }

    #[test]
    fn remote_lookup_ignores_case() {
        let mut h = Harness::new();
        h.remotes.remotes = vec![
            Remote {
                name: "fork".into(),
                fetch_url: "git@github.com:me/REPO.git".into(),
                repo: Some(RepoRef::new("github.com", "me", "REPO")),
            },
            Remote {
                name: "upstream".into(),
                fetch_url: "git@github.com:owner/repo.git".into(),
                repo: Some(RepoRef::new("github.com", "owner", "repo")),
            },
        ];
        h.run(&tty()).unwrap();
        assert_eq!(
            h.pulls(),
            vec![("upstream".to_string(), "pr-branch".to_string())]
        );
    }
}
