// Update module - brings a pull request branch up to date and reconciles the checkout
//
// - UpdateOptions / LocalUpdateMode: flags resolved once, before any I/O
// - UpdateOrchestrator: the ordered pipeline of guarded steps
// - TerminalPrompter: yes/no confirmation on the terminal
// - TerminalStatus: status lines with success/warning/failure icons
pub mod context;
pub mod interaction;
pub mod orchestrator;
pub mod status;

pub use context::UpdateOptions;
pub use interaction::TerminalPrompter;
pub use orchestrator::{SkipReason, UpdateOrchestrator, UpdateOutcome};
pub use status::TerminalStatus;
