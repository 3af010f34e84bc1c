//! Opt-in diagnostics enabled by `--verbose`.

pub const VERBOSE_ENV: &str = "PRUP_VERBOSE";

pub fn is_verbose() -> bool {
    std::env::var_os(VERBOSE_ENV).is_some()
}

/// Print a `[VERBOSE]` line to stderr when verbose output is enabled.
pub fn verbose(message: impl AsRef<str>) {
    if is_verbose() {
        eprintln!("[VERBOSE] {}", message.as_ref());
    }
}
