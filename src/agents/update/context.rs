use crate::error::{PrupError, Result};
use crate::github::UpdateMethod;

/// What to do with the local checkout once the remote branch moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LocalUpdateMode {
    /// Ask before pulling, and only in interactive sessions.
    #[default]
    Auto,
    /// Always pull; the checkout must be on the PR branch.
    Force,
    /// Never touch the local checkout.
    Skip,
}

/// Resolved options for one update run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// PR number, URL or branch; empty selects the PR for the current branch.
    pub selector: String,
    pub interactive: bool,
    pub method: UpdateMethod,
    pub local_mode: LocalUpdateMode,
}

impl UpdateOptions {
    /// Build options from the raw command-line flags.
    ///
    /// `update_local` excludes both `skip_local` and `rebase`.
    pub fn from_flags(
        selector: Option<String>,
        interactive: bool,
        update_local: bool,
        skip_local: bool,
        rebase: bool,
    ) -> Result<Self> {
        if skip_local && update_local {
            return Err(PrupError::InvalidOptions(
                "specify only one of `--skip-local` or `--update-local`".to_string(),
            ));
        }
        if rebase && update_local {
            return Err(PrupError::InvalidOptions(
                "specify only one of `--rebase` or `--update-local`".to_string(),
            ));
        }

        let local_mode = if update_local {
            LocalUpdateMode::Force
        } else if skip_local {
            LocalUpdateMode::Skip
        } else {
            LocalUpdateMode::Auto
        };
        let method = if rebase {
            UpdateMethod::Rebase
        } else {
            UpdateMethod::Merge
        };

        Ok(Self {
            selector: selector.unwrap_or_default(),
            interactive,
            method,
            local_mode,
        })
    }
}
