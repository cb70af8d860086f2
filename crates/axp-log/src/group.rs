//! Scoped log groups.
//!
//! A [`LogGroup`] marks a named region of the run log. The opening marker is
//! written by [`LogGroup::begin`]; the closing marker, with elapsed time, is
//! written by `Drop`, so the group closes on every exit path including early
//! returns and unwinds.

use std::time::Instant;

use tracing::info;

fn on_github_actions() -> bool {
    std::env::var_os("GITHUB_ACTIONS").is_some()
}

/// RAII guard for one named log group.
///
/// Groups may nest; each guard owns its own start time and name.
#[must_use = "dropping the guard immediately closes the group"]
pub struct LogGroup {
    name: String,
    started: Instant,
}

impl LogGroup {
    /// Open a log group and return the guard that closes it.
    ///
    /// On GitHub Actions runners the marker uses the `::group::` workflow
    /// command so the log folds in the web UI.
    pub fn begin(name: impl Into<String>) -> Self {
        let name = name.into();
        if on_github_actions() {
            println!("::group::{name}");
        }
        info!("{:-^60}", format!(" {name} "));
        Self {
            name,
            started: Instant::now(),
        }
    }

    /// The group's name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for LogGroup {
    fn drop(&mut self) {
        info!(
            "{} completed in {:.3} secs",
            self.name,
            self.started.elapsed().as_secs_f64()
        );
        if on_github_actions() {
            println!("::endgroup::");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_closes_on_drop() {
        let group = LogGroup::begin("outer");
        assert_eq!(group.name(), "outer");
        drop(group);
    }

    #[test]
    fn groups_nest() {
        let _outer = LogGroup::begin("outer");
        let _inner = LogGroup::begin("inner");
    }

    #[test]
    fn group_closes_on_early_return() {
        fn guarded(fail: bool) -> Result<(), ()> {
            let _group = LogGroup::begin("guarded");
            if fail {
                return Err(());
            }
            Ok(())
        }
        assert!(guarded(true).is_err());
        assert!(guarded(false).is_ok());
    }
}
