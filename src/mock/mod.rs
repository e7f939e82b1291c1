//! Controller for one mock chroot.
//!
//! Resolves the chroot's root name from its config once, derives the
//! on-disk layout from it, and drives `mock`, `rpm` and `rpmlint`.

use crate::config;
use crate::error::{MockError, Result};
use crate::rpmlint::{LintErrorCheck, ScaffoldErrorScan};
use crate::sandbox::{CommandLine, CommandRunner, SystemRunner};
use crate::settings::Settings;
use parking_lot::Mutex;
use std::path::PathBuf;
use tracing::debug;

pub mod builddir;
pub mod install;
pub mod lint;

pub use builddir::{SweepEntry, SweepOutcome};

/// Build root as seen from outside the chroot (`%_topdir` inside it).
const BUILDDIR: &str = "root/builddir/build";
/// The chroot's rpm database.
const RPMDB_DIR: &str = "root/var/lib/rpm";

pub struct Mock<R: CommandRunner = SystemRunner> {
    settings: Settings,
    runner: R,
    lint_check: Box<dyn LintErrorCheck>,
    root: Mutex<Option<String>>,
}

impl Mock<SystemRunner> {
    pub fn new(settings: Settings) -> Self {
        Self::with_runner(settings, SystemRunner)
    }
}

impl<R: CommandRunner> Mock<R> {
    pub fn with_runner(settings: Settings, runner: R) -> Self {
        Self {
            settings,
            runner,
            lint_check: Box::new(ScaffoldErrorScan),
            root: Mutex::new(None),
        }
    }

    /// Replace the transcript check used by [`Mock::lint`].
    pub fn with_lint_check(mut self, check: impl LintErrorCheck + 'static) -> Self {
        self.lint_check = Box::new(check);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The chroot's root name, read from `<config_dir>/<config>.cfg` on first use.
    pub fn resolve_root(&self) -> Result<String> {
        let mut cached = self.root.lock();
        if let Some(root) = cached.as_ref() {
            return Ok(root.clone());
        }

        let path = self.settings.config_path();
        let root = config::read_root(&path, &self.settings.config_dir)?;
        debug!(config = %path.display(), root = %root, "Resolved mock root");
        *cached = Some(root.clone());
        Ok(root)
    }

    /// Forget the resolved root; the next path lookup re-reads the config.
    pub fn reset(&self) {
        *self.root.lock() = None;
    }

    /// `<state_root>/<root>[/<subdir>]`, created if missing.
    pub fn dir(&self, subdir: Option<&str>) -> Result<PathBuf> {
        let mut path = self.settings.state_root.join(self.resolve_root()?);
        if let Some(subdir) = subdir {
            path.push(subdir);
        }
        std::fs::create_dir_all(&path).map_err(|source| MockError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Mock's `%_topdir` seen from the outside, optionally joined with `subdir`.
    pub fn builddir(&self, subdir: Option<&str>) -> Result<PathBuf> {
        let top = self.dir(Some(BUILDDIR))?;
        Ok(match subdir {
            Some(subdir) => top.join(subdir),
            None => top,
        })
    }

    pub fn topdir(&self) -> Result<PathBuf> {
        self.builddir(None)
    }

    pub fn rpmdb_dir(&self) -> Result<PathBuf> {
        self.dir(Some(RPMDB_DIR))
    }

    /// Where mock leaves built rpms and logs.
    pub fn result_dir(&self) -> PathBuf {
        self.settings
            .resultdir
            .clone()
            .unwrap_or_else(|| self.settings.review_results.clone())
    }

    /// Caller's mock options with a guaranteed `--resultdir` part.
    pub fn mock_options(&self) -> String {
        let mut opt = self.settings.mock_options.clone().unwrap_or_default();
        if !opt.contains("resultdir") {
            opt.push_str(&format!(" --resultdir={} ", self.result_dir().display()));
        }
        opt
    }

    /// `mock [-r <config>] <options...>`
    fn mock_command(&self) -> CommandLine {
        let mut cmd = CommandLine::new("mock");
        if let Some(config) = &self.settings.mock_config {
            cmd = cmd.arg("-r").arg(config.as_str());
        }
        cmd.args(self.mock_options().split_whitespace())
    }
}
