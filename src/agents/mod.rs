pub mod update;
pub mod version_control;

pub use update::UpdateOrchestrator;
pub use version_control::GitClient;
